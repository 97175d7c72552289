//! Database migrations for the stack-internal tables

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_internal_config;
mod m20240101_000002_create_request_fifo;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_internal_config::Migration),
            Box::new(m20240101_000002_create_request_fifo::Migration),
        ]
    }
}
