pub use sea_orm_migration::prelude::*;

mod m20250614_000001_create_sessions;
mod m20250614_000002_create_bot_heartbeats;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250614_000001_create_sessions::Migration),
            Box::new(m20250614_000002_create_bot_heartbeats::Migration),
        ]
    }
}
