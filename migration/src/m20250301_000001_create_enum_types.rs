use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const ENUM_TYPES: &[(&str, &[&str])] = &[
    (
        "global_role",
        &["guest", "member", "admin", "superuser_pending"],
    ),
    (
        "role",
        &[
            "admin",
            "tournament_admin",
            "ref_admin",
            "club_leader",
            "team_leader",
            "secretariat",
            "referee",
            "player",
            "supporter",
        ],
    ),
    (
        "approval_status",
        &[
            "pending_leader",
            "pending_admin",
            "approved",
            "rejected",
            "withdrawn",
        ],
    ),
    (
        "club_leader_title",
        &["formand", "kasserer", "bestyrelsesmedlem"],
    ),
    ("gender", &["men", "women"]),
    (
        "age_group",
        &[
            "oldies", "senior", "u21", "u19", "u17", "u15", "u13", "u12", "u11", "u10", "u9",
            "u8", "u7", "u5",
        ],
    ),
    ("stats_kind", &["events", "players"]),
];

fn create_type_sql(name: &str, values: &[&str]) -> String {
    let values = values
        .iter()
        .map(|value| format!("'{value}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "DO $$ BEGIN
            CREATE TYPE floorball_platform.{name} AS ENUM ({values});
        EXCEPTION
            WHEN duplicate_object THEN null;
        END $$;"
    )
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, values) in ENUM_TYPES {
            manager
                .get_connection()
                .execute_unprepared(&create_type_sql(name, values))
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, _) in ENUM_TYPES.iter().rev() {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP TYPE IF EXISTS floorball_platform.{name}"))
                .await?;
        }
        Ok(())
    }
}
