use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.leagues (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name VARCHAR NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.clubs (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name VARCHAR NOT NULL UNIQUE,
                club_no VARCHAR,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.teams (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                league_id UUID NOT NULL,
                club_id UUID,
                name VARCHAR NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT fk_teams_league
                    FOREIGN KEY (league_id)
                    REFERENCES floorball_platform.leagues(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE,
                CONSTRAINT fk_teams_club
                    FOREIGN KEY (club_id)
                    REFERENCES floorball_platform.clubs(id)
                    ON DELETE SET NULL
                    ON UPDATE CASCADE
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS teams_league_name_unique
                ON floorball_platform.teams(league_id, name)",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.referees (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name VARCHAR NOT NULL,
                referee_no VARCHAR,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for table in ["referees", "teams", "clubs", "leagues"] {
            db.execute_unprepared(&format!(
                "DROP TABLE IF EXISTS floorball_platform.{table}"
            ))
            .await?;
        }
        Ok(())
    }
}
