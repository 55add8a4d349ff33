use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A standings line of a pool.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::competition_pool_teams::Model)]
#[sea_orm(schema_name = "floorball_platform", table_name = "competition_pool_teams")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub pool_id: Id,
    pub name: String,
    pub rank: i32,
    pub played: i32,
    pub points: i32,
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
