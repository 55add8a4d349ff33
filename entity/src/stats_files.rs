use crate::stats_kind::StatsKind;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An uploaded statistics CSV file. The raw content is kept alongside the
/// parsed rows so a file can be re-imported.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::stats_files::Model)]
#[sea_orm(schema_name = "floorball_platform", table_name = "stats_files")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub team_id: Id,
    #[schema(value_type = Uuid)]
    pub uploaded_by_id: Id,
    pub kind: StatsKind,
    pub original_name: String,
    #[serde(skip_serializing)]
    pub content: String,
    pub game_id: Option<String>,
    pub competition: Option<String>,
    pub game_date: Option<String>,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamId",
        to = "super::teams::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Teams,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UploadedById",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::stats_events::Entity")]
    StatsEvents,
    #[sea_orm(has_many = "super::stats_players::Entity")]
    StatsPlayers,
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teams.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::stats_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatsEvents.def()
    }
}

impl Related<super::stats_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatsPlayers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
