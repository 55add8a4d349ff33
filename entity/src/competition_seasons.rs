use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::competition_seasons::Model)]
#[sea_orm(schema_name = "floorball_platform", table_name = "competition_seasons")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    /// A season starting in 2025 is the 2025-2026 season
    pub start_year: i32,
    pub is_current: bool,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::competition_rows::Entity")]
    CompetitionRows,
}

impl Related<super::competition_rows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetitionRows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
