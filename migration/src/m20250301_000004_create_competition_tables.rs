use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.competition_seasons (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                start_year INTEGER NOT NULL UNIQUE,
                is_current BOOLEAN NOT NULL DEFAULT false,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.competition_rows (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                season_id UUID NOT NULL,
                gender floorball_platform.gender NOT NULL,
                age_group floorball_platform.age_group NOT NULL,
                name VARCHAR NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT fk_competition_rows_season
                    FOREIGN KEY (season_id)
                    REFERENCES floorball_platform.competition_seasons(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS competition_rows_season_gender_idx
                ON floorball_platform.competition_rows(season_id, gender, age_group)",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.competition_pools (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                row_id UUID NOT NULL,
                pulje_id INTEGER NOT NULL UNIQUE,
                name VARCHAR NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT fk_competition_pools_row
                    FOREIGN KEY (row_id)
                    REFERENCES floorball_platform.competition_rows(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.competition_pool_teams (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                pool_id UUID NOT NULL,
                name VARCHAR NOT NULL,
                rank INTEGER NOT NULL,
                played INTEGER NOT NULL DEFAULT 0,
                points INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT fk_competition_pool_teams_pool
                    FOREIGN KEY (pool_id)
                    REFERENCES floorball_platform.competition_pools(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS competition_pool_teams_pool_name_unique
                ON floorball_platform.competition_pool_teams(pool_id, name)",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.competition_matches (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                pool_id UUID NOT NULL,
                match_no INTEGER NOT NULL,
                starts_at TIMESTAMPTZ,
                venue VARCHAR,
                home_team VARCHAR NOT NULL,
                away_team VARCHAR NOT NULL,
                home_score INTEGER,
                away_score INTEGER,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT fk_competition_matches_pool
                    FOREIGN KEY (pool_id)
                    REFERENCES floorball_platform.competition_pools(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS competition_matches_pool_match_no_unique
                ON floorball_platform.competition_matches(pool_id, match_no)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for table in [
            "competition_matches",
            "competition_pool_teams",
            "competition_pools",
            "competition_rows",
            "competition_seasons",
        ] {
            db.execute_unprepared(&format!(
                "DROP TABLE IF EXISTS floorball_platform.{table}"
            ))
            .await?;
        }
        Ok(())
    }
}
