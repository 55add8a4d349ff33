use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                email VARCHAR NOT NULL UNIQUE,
                username VARCHAR NOT NULL UNIQUE,
                name VARCHAR,
                password VARCHAR NOT NULL,
                global_role floorball_platform.global_role NOT NULL DEFAULT 'superuser_pending',
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .await?;

        // A membership is scoped to a club, a team, a referee or nothing (global),
        // and scope_key holds whichever of those applies
        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS floorball_platform.user_roles (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID NOT NULL,
                role floorball_platform.role NOT NULL,
                status floorball_platform.approval_status NOT NULL,
                club_id UUID,
                team_id UUID,
                referee_id UUID,
                club_leader_title floorball_platform.club_leader_title,
                scope_key VARCHAR NOT NULL,
                decided_by_id UUID,
                decided_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT fk_user_roles_user
                    FOREIGN KEY (user_id)
                    REFERENCES floorball_platform.users(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE,
                CONSTRAINT fk_user_roles_club
                    FOREIGN KEY (club_id)
                    REFERENCES floorball_platform.clubs(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE,
                CONSTRAINT fk_user_roles_team
                    FOREIGN KEY (team_id)
                    REFERENCES floorball_platform.teams(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE,
                CONSTRAINT fk_user_roles_referee
                    FOREIGN KEY (referee_id)
                    REFERENCES floorball_platform.referees(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE,
                CONSTRAINT fk_user_roles_decided_by
                    FOREIGN KEY (decided_by_id)
                    REFERENCES floorball_platform.users(id)
                    ON DELETE SET NULL
                    ON UPDATE CASCADE
            )",
        )
        .await?;

        // Only one live (pending or approved) membership per user, role and scope.
        // Rejected and withdrawn rows stay as history.
        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS user_roles_live_scope_unique
                ON floorball_platform.user_roles(user_id, role, scope_key)
                WHERE status IN ('pending_leader', 'pending_admin', 'approved')",
        )
        .await?;

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS user_roles_status_role_idx
                ON floorball_platform.user_roles(status, role)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS floorball_platform.user_roles")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS floorball_platform.users")
            .await?;
        Ok(())
    }
}
