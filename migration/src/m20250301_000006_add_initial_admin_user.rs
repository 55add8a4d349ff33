use chrono::Utc;
use password_auth::generate_hash;
use sea_orm::{DbBackend, Statement, Value};
use sea_orm_migration::prelude::*;
use uuid::Uuid;

const ADMIN_EMAIL: &str = "admin@floorball.dk";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        insert_initial_admin_user(manager).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        delete_initial_admin_user(manager).await
    }
}

// Raw SQL keeps this migration independent of later entity changes.
async fn insert_initial_admin_user(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let db = manager.get_connection();
    let now = Utc::now();

    let password_hash = generate_hash("password");

    let user_sql = r#"
        INSERT INTO floorball_platform.users (
            email, username, name, password, global_role, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, 'admin', $5, $6)
        RETURNING id
    "#;
    let user_row = db
        .query_one(Statement::from_sql_and_values(
            DbBackend::Postgres,
            user_sql,
            vec![
                Value::String(Some(Box::new(ADMIN_EMAIL.to_owned()))),
                Value::String(Some(Box::new("admin".to_owned()))),
                Value::String(Some(Box::new("Admin".to_owned()))),
                Value::String(Some(Box::new(password_hash))),
                Value::ChronoDateTimeUtc(Some(Box::new(now))),
                Value::ChronoDateTimeUtc(Some(Box::new(now))),
            ],
        ))
        .await?
        .ok_or_else(|| DbErr::RecordNotInserted)?;
    let admin_user_id: Uuid = user_row.try_get("", "id")?;

    let role_sql = r#"
        INSERT INTO floorball_platform.user_roles (
            user_id, role, status, scope_key, decided_by_id, decided_at, created_at, updated_at
        ) VALUES ($1, 'admin', 'approved', 'global', $1, $2, $3, $4)
    "#;
    db.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        role_sql,
        vec![
            Value::Uuid(Some(Box::new(admin_user_id))),
            Value::ChronoDateTimeUtc(Some(Box::new(now))),
            Value::ChronoDateTimeUtc(Some(Box::new(now))),
            Value::ChronoDateTimeUtc(Some(Box::new(now))),
        ],
    ))
    .await?;

    Ok(())
}

async fn delete_initial_admin_user(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let db = manager.get_connection();

    // Memberships cascade with the user
    db.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "DELETE FROM floorball_platform.users WHERE email = $1",
        vec![Value::String(Some(Box::new(ADMIN_EMAIL.to_owned())))],
    ))
    .await?;

    Ok(())
}
