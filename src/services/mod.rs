pub mod attendance_service;
pub mod auth_service;
pub mod class_service;
pub mod exercise_service;
pub mod inventory_service;
pub mod invoice_service;
pub mod member_service;
pub mod membership_service;
pub mod report_service;
pub mod routine_service;

pub use attendance_service::*;
pub use auth_service::*;
pub use class_service::*;
pub use exercise_service::*;
pub use inventory_service::*;
pub use invoice_service::*;
pub use member_service::*;
pub use membership_service::*;
pub use report_service::*;
pub use routine_service::*;
