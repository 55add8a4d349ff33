pub use sea_orm_migration::prelude::*;

mod m20250301_000000_create_schema_and_base_db_setup;
mod m20250301_000001_create_enum_types;
mod m20250301_000002_create_league_reference_tables;
mod m20250301_000003_create_users_and_user_roles;
mod m20250301_000004_create_competition_tables;
mod m20250301_000005_create_stats_tables;
mod m20250301_000006_add_initial_admin_user;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000000_create_schema_and_base_db_setup::Migration),
            Box::new(m20250301_000001_create_enum_types::Migration),
            Box::new(m20250301_000002_create_league_reference_tables::Migration),
            Box::new(m20250301_000003_create_users_and_user_roles::Migration),
            Box::new(m20250301_000004_create_competition_tables::Migration),
            Box::new(m20250301_000005_create_stats_tables::Migration),
            Box::new(m20250301_000006_add_initial_admin_user::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_have_unique_names_in_order() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|migration| migration.name().to_owned())
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
    }
}
