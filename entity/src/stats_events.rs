use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One event line of an events CSV file: goals, shots, penalties and so on.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::stats_events::Model)]
#[sea_orm(schema_name = "floorball_platform", table_name = "stats_events")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub file_id: Id,
    #[schema(value_type = Uuid)]
    pub team_id: Id,
    pub row_no: i32,
    pub timestamp: Option<String>,
    pub event: String,
    pub team_name: Option<String>,
    pub period: Option<String>,
    pub strength: Option<String>,
    pub p1_no: Option<i32>,
    pub p1_name: Option<String>,
    pub p2_no: Option<i32>,
    pub p2_name: Option<String>,
    pub goalie_name: Option<String>,
    pub x_m: Option<f64>,
    pub y_m: Option<f64>,
    pub game_id: Option<String>,
    pub game_date: Option<String>,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stats_files::Entity",
        from = "Column::FileId",
        to = "super::stats_files::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    StatsFiles,
}

impl Related<super::stats_files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatsFiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
