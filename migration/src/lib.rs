pub use sea_orm_migration::prelude::*;

mod m20131015_000001_create_datatype_tables;
pub mod m20131120_000002_time_series_mapping_flags;


pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20131015_000001_create_datatype_tables::Migration),
            Box::new(m20131120_000002_time_series_mapping_flags::Migration),
        ]
    }
}
