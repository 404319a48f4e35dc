pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260301_000001_visitor_stats;
mod m20260301_000002_users;
mod m20260301_000003_atrocities;
mod m20260301_000004_governance_highlights;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_visitor_stats::Migration),
            Box::new(m20260301_000002_users::Migration),
            Box::new(m20260301_000003_atrocities::Migration),
            Box::new(m20260301_000004_governance_highlights::Migration),
        ]
    }
}
