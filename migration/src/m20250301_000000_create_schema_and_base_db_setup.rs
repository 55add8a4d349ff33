use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the platform's schema
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS floorball_platform;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("SET search_path TO floorball_platform, public;")
            .await?;

        // Give the base DB user that executes all platform queries access to the schema
        manager
            .get_connection()
            .execute_unprepared(r#"
                DO $$ BEGIN
                    GRANT ALL PRIVILEGES ON DATABASE floorball TO floorball;
                    GRANT ALL ON SCHEMA floorball_platform TO floorball;

                    ALTER DEFAULT PRIVILEGES IN SCHEMA floorball_platform GRANT ALL ON TABLES TO floorball;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA floorball_platform GRANT ALL ON SEQUENCES TO floorball;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA floorball_platform GRANT ALL ON FUNCTIONS TO floorball;
                END $$;
            "#)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(r#"
                DO $$ BEGIN
                    ALTER DEFAULT PRIVILEGES IN SCHEMA floorball_platform REVOKE ALL ON FUNCTIONS FROM floorball;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA floorball_platform REVOKE ALL ON SEQUENCES FROM floorball;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA floorball_platform REVOKE ALL ON TABLES FROM floorball;
                    REVOKE ALL ON SCHEMA floorball_platform FROM floorball;
                    REVOKE ALL PRIVILEGES ON DATABASE floorball FROM floorball;
                END $$;
            "#)
            .await?;

        // CASCADE removes every object in the schema
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS floorball_platform CASCADE;")
            .await?;

        Ok(())
    }
}
