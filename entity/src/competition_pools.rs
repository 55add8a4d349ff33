use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A pool ("pulje") of teams within a competition row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::competition_pools::Model)]
#[sea_orm(schema_name = "floorball_platform", table_name = "competition_pools")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub row_id: Id,
    /// Pool number assigned by the federation system
    pub pulje_id: i32,
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
        belongs_to = "super::competition_rows::Entity",
        from = "Column::RowId",
        to = "super::competition_rows::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    CompetitionRows,
    #[sea_orm(has_many = "super::competition_pool_teams::Entity")]
    CompetitionPoolTeams,
    #[sea_orm(has_many = "super::competition_matches::Entity")]
    CompetitionMatches,
}

impl Related<super::competition_rows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetitionRows.def()
    }
}

impl Related<super::competition_pool_teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetitionPoolTeams.def()
    }
}

impl Related<super::competition_matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetitionMatches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
