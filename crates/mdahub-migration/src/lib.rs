pub use sea_orm_migration::prelude::*;

mod m20260101_000001_create_mdas;
mod m20260101_000002_create_users;
mod m20260101_000003_create_admins;
mod m20260101_000004_create_activity_log;
mod m20260101_000005_seed_superadmin;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_mdas::Migration),
            Box::new(m20260101_000002_create_users::Migration),
            Box::new(m20260101_000003_create_admins::Migration),
            Box::new(m20260101_000004_create_activity_log::Migration),
            Box::new(m20260101_000005_seed_superadmin::Migration),
        ]
    }
}
