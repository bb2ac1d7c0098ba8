pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_roles_and_members;
mod m20250301_000002_create_attendance;
mod m20250301_000003_create_invoices_and_inventory;
mod m20250301_000004_create_classes;
mod m20250301_000005_create_routines;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_roles_and_members::Migration),
            Box::new(m20250301_000002_create_attendance::Migration),
            Box::new(m20250301_000003_create_invoices_and_inventory::Migration),
            Box::new(m20250301_000004_create_classes::Migration),
            Box::new(m20250301_000005_create_routines::Migration),
        ]
    }
}
