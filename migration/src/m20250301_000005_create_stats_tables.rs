use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.stats_files (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                team_id UUID NOT NULL,
                uploaded_by_id UUID NOT NULL,
                kind floorball_platform.stats_kind NOT NULL,
                original_name VARCHAR NOT NULL,
                content TEXT NOT NULL,
                game_id VARCHAR,
                competition VARCHAR,
                game_date VARCHAR,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT fk_stats_files_team
                    FOREIGN KEY (team_id)
                    REFERENCES floorball_platform.teams(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE,
                CONSTRAINT fk_stats_files_uploaded_by
                    FOREIGN KEY (uploaded_by_id)
                    REFERENCES floorball_platform.users(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE
            )",
        )
        .await?;

        // Parsed rows go with the file they came from
        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.stats_events (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                file_id UUID NOT NULL,
                team_id UUID NOT NULL,
                row_no INTEGER NOT NULL,
                timestamp VARCHAR,
                event VARCHAR NOT NULL,
                team_name VARCHAR,
                period VARCHAR,
                strength VARCHAR,
                p1_no INTEGER,
                p1_name VARCHAR,
                p2_no INTEGER,
                p2_name VARCHAR,
                goalie_name VARCHAR,
                x_m DOUBLE PRECISION,
                y_m DOUBLE PRECISION,
                game_id VARCHAR,
                game_date VARCHAR,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT fk_stats_events_file
                    FOREIGN KEY (file_id)
                    REFERENCES floorball_platform.stats_files(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE,
                CONSTRAINT fk_stats_events_team
                    FOREIGN KEY (team_id)
                    REFERENCES floorball_platform.teams(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.stats_players (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                file_id UUID NOT NULL,
                team_id UUID NOT NULL,
                number INTEGER,
                name VARCHAR NOT NULL,
                line VARCHAR,
                team_name VARCHAR,
                game_id VARCHAR,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT fk_stats_players_file
                    FOREIGN KEY (file_id)
                    REFERENCES floorball_platform.stats_files(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE,
                CONSTRAINT fk_stats_players_team
                    FOREIGN KEY (team_id)
                    REFERENCES floorball_platform.teams(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE
            )",
        )
        .await?;

        for (index, table, columns) in [
            ("stats_files_team_created_idx", "stats_files", "team_id, created_at DESC"),
            ("stats_events_team_timestamp_idx", "stats_events", "team_id, timestamp DESC"),
            ("stats_players_team_number_idx", "stats_players", "team_id, number, name"),
        ] {
            db.execute_unprepared(&format!(
                "CREATE INDEX IF NOT EXISTS {index} ON floorball_platform.{table}({columns})"
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for table in ["stats_players", "stats_events", "stats_files"] {
            db.execute_unprepared(&format!(
                "DROP TABLE IF EXISTS floorball_platform.{table}"
            ))
            .await?;
        }
        Ok(())
    }
}
