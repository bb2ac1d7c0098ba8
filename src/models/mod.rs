pub mod attendance;
pub mod auth;
pub mod class;
pub mod common;
pub mod exercise;
pub mod inventory;
pub mod invoice;
pub mod member;
pub mod pagination;
pub mod report;
pub mod role;
pub mod routine;

pub use attendance::*;
pub use auth::*;
pub use class::*;
pub use common::*;
pub use exercise::*;
pub use inventory::*;
pub use invoice::*;
pub use member::*;
pub use pagination::*;
pub use report::*;
pub use role::*;
pub use routine::*;
