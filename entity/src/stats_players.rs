use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::stats_players::Model)]
#[sea_orm(schema_name = "floorball_platform", table_name = "stats_players")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub file_id: Id,
    #[schema(value_type = Uuid)]
    pub team_id: Id,
    pub number: Option<i32>,
    pub name: String,
    pub line: Option<String>,
    pub team_name: Option<String>,
    pub game_id: Option<String>,
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
