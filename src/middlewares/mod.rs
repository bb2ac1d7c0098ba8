pub mod auth;
pub mod cors;

pub use auth::AuthenticatedUser;
pub use cors::create_cors;
