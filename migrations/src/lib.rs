pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_identity_tables;
mod m20240301_000002_create_finance_tables;
mod m20240301_000003_create_procurement_tables;
mod m20240301_000004_create_project_tables;
mod m20240301_000005_create_catalog_tables;
mod m20240301_000006_create_pricing_tables;
mod m20240415_000007_add_lookup_indexes;
mod m20240502_000008_create_exchange_rates_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_identity_tables::Migration),
            Box::new(m20240301_000002_create_finance_tables::Migration),
            Box::new(m20240301_000003_create_procurement_tables::Migration),
            Box::new(m20240301_000004_create_project_tables::Migration),
            Box::new(m20240301_000005_create_catalog_tables::Migration),
            Box::new(m20240301_000006_create_pricing_tables::Migration),
            Box::new(m20240415_000007_add_lookup_indexes::Migration),
            Box::new(m20240502_000008_create_exchange_rates_table::Migration),
        ]
    }
}
