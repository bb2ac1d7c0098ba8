pub mod attendance;
pub mod classes;
pub mod exercise_categories;
pub mod exercises;
pub mod inventory_items;
pub mod invoices;
pub mod members;
pub mod routine_assignments;
pub mod routine_days;
pub mod routine_exercises;
pub mod routines;

pub use attendance as attendance_entity;
pub use classes as class_entity;
pub use exercise_categories as exercise_category_entity;
pub use exercises as exercise_entity;
pub use inventory_items as inventory_item_entity;
pub use invoices as invoice_entity;
pub use members as member_entity;
pub use routine_assignments as routine_assignment_entity;
pub use routine_days as routine_day_entity;
pub use routine_exercises as routine_exercise_entity;
pub use routines as routine_entity;

pub use invoices::InvoiceStatus;
pub use routine_assignments::AssignmentStatus;
pub use routines::RoutineLevel;

pub type AttendanceRecord = attendance::Model;
pub type Exercise = exercises::Model;
pub type ExerciseCategory = exercise_categories::Model;
pub type GymClass = classes::Model;
pub type InventoryItem = inventory_items::Model;
pub type Invoice = invoices::Model;
pub type Routine = routines::Model;
pub type RoutineAssignment = routine_assignments::Model;
