use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::competition_matches::Model)]
#[sea_orm(schema_name = "floorball_platform", table_name = "competition_matches")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub pool_id: Id,
    /// Match number from the federation match programme
    pub match_no: i32,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub starts_at: Option<DateTimeWithTimeZone>,
    pub venue: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
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
        belongs_to = "super::competition_pools::Entity",
        from = "Column::PoolId",
        to = "super::competition_pools::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    CompetitionPools,
}

impl Related<super::competition_pools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetitionPools.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
