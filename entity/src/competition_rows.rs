use crate::age_group::AgeGroup;
use crate::gender::Gender;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A competition row ("række") within a season, e.g. the men's senior league.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::competition_rows::Model)]
#[sea_orm(schema_name = "floorball_platform", table_name = "competition_rows")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub season_id: Id,
    pub gender: Gender,
    pub age_group: AgeGroup,
    pub name: String,
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
        belongs_to = "super::competition_seasons::Entity",
        from = "Column::SeasonId",
        to = "super::competition_seasons::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    CompetitionSeasons,
    #[sea_orm(has_many = "super::competition_pools::Entity")]
    CompetitionPools,
}

impl Related<super::competition_seasons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetitionSeasons.def()
    }
}

impl Related<super::competition_pools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetitionPools.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
