use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::stats_kind::StatsKind;
use entity::{stats_events, stats_files, stats_players, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, ConnectionTrait, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// Rows are written in batches of this size to stay below the bind parameter limit.
pub const INSERT_CHUNK_SIZE: usize = 500;

/// Stores an uploaded file together with its parsed rows in one transaction.
/// The `id`, `file_id` and `created_at` of the given rows are ignored.
pub async fn create_file(
    db: &impl TransactionTrait,
    file: stats_files::Model,
    events: Vec<stats_events::Model>,
    players: Vec<stats_players::Model>,
) -> Result<stats_files::Model, Error> {
    let txn = db.begin().await?;

    let now = Utc::now();
    let created = stats_files::ActiveModel {
        team_id: Set(file.team_id),
        uploaded_by_id: Set(file.uploaded_by_id),
        kind: Set(file.kind),
        original_name: Set(file.original_name),
        content: Set(file.content),
        game_id: Set(file.game_id),
        competition: Set(file.competition),
        game_date: Set(file.game_date),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut inserted: u64 = 0;
    for chunk in events.chunks(INSERT_CHUNK_SIZE) {
        let rows = chunk.iter().cloned().map(|event| stats_events::ActiveModel {
            file_id: Set(created.id),
            team_id: Set(created.team_id),
            row_no: Set(event.row_no),
            timestamp: Set(event.timestamp),
            event: Set(event.event),
            team_name: Set(event.team_name),
            period: Set(event.period),
            strength: Set(event.strength),
            p1_no: Set(event.p1_no),
            p1_name: Set(event.p1_name),
            p2_no: Set(event.p2_no),
            p2_name: Set(event.p2_name),
            goalie_name: Set(event.goalie_name),
            x_m: Set(event.x_m),
            y_m: Set(event.y_m),
            game_id: Set(event.game_id),
            game_date: Set(event.game_date),
            created_at: Set(now.into()),
            ..Default::default()
        });
        inserted += stats_events::Entity::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;
    }

    for chunk in players.chunks(INSERT_CHUNK_SIZE) {
        let rows = chunk
            .iter()
            .cloned()
            .map(|player| stats_players::ActiveModel {
                file_id: Set(created.id),
                team_id: Set(created.team_id),
                number: Set(player.number),
                name: Set(player.name),
                line: Set(player.line),
                team_name: Set(player.team_name),
                game_id: Set(player.game_id),
                created_at: Set(now.into()),
                ..Default::default()
            });
        inserted += stats_players::Entity::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;

    info!(
        "Stored {} stats file {} with {inserted} rows",
        created.kind, created.id
    );
    Ok(created)
}

/// Files uploaded for a team, newest first.
pub async fn find_files(
    db: &impl ConnectionTrait,
    team_id: Id,
    kind: Option<StatsKind>,
) -> Result<Vec<stats_files::Model>, Error> {
    let mut query = stats_files::Entity::find().filter(stats_files::Column::TeamId.eq(team_id));
    if let Some(kind) = kind {
        query = query.filter(stats_files::Column::Kind.eq(kind));
    }
    Ok(query
        .order_by_desc(stats_files::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn find_file_by_id(
    db: &impl ConnectionTrait,
    id: Id,
) -> Result<stats_files::Model, Error> {
    stats_files::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::new(EntityApiErrorKind::RecordNotFound))
}

/// Deletes a file; its parsed rows are removed by the cascading foreign keys.
pub async fn delete_file(db: &impl ConnectionTrait, id: Id) -> Result<(), Error> {
    stats_files::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

/// The most recent events of a team, at most `limit` of them.
pub async fn find_events(
    db: &impl ConnectionTrait,
    team_id: Id,
    limit: u64,
) -> Result<Vec<stats_events::Model>, Error> {
    Ok(stats_events::Entity::find()
        .filter(stats_events::Column::TeamId.eq(team_id))
        .order_by_desc(stats_events::Column::Timestamp)
        .order_by_desc(stats_events::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await?)
}

/// Every event of a team, in file order.
pub async fn find_all_events(
    db: &impl ConnectionTrait,
    team_id: Id,
) -> Result<Vec<stats_events::Model>, Error> {
    Ok(stats_events::Entity::find()
        .filter(stats_events::Column::TeamId.eq(team_id))
        .order_by_asc(stats_events::Column::FileId)
        .order_by_asc(stats_events::Column::RowNo)
        .all(db)
        .await?)
}

pub async fn find_players(
    db: &impl ConnectionTrait,
    team_id: Id,
) -> Result<Vec<stats_players::Model>, Error> {
    Ok(stats_players::Entity::find()
        .filter(stats_players::Column::TeamId.eq(team_id))
        .order_by_asc(stats_players::Column::Number)
        .order_by_asc(stats_players::Column::Name)
        .all(db)
        .await?)
}
