pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260410_000001_initial_tables;
mod m20260415_000001_querystring_parameters;
mod m20260502_000001_origin_groups;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260410_000001_initial_tables::Migration),
            Box::new(m20260415_000001_querystring_parameters::Migration),
            Box::new(m20260502_000001_origin_groups::Migration),
        ]
    }
}
