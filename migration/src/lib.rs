pub use sea_orm_migration::prelude::*;

mod m20250901_000001_initial;
mod m20250903_000002_add_carts;
mod m20250905_000003_add_site_content;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_initial::Migration),
            Box::new(m20250903_000002_add_carts::Migration),
            Box::new(m20250905_000003_add_site_content::Migration),
        ]
    }
}
