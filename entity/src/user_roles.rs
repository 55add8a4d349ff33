use crate::approval_status::ApprovalStatus;
use crate::roles::{ClubLeaderTitle, Role};
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single role membership of a user, e.g. "team leader of team X".
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::user_roles::Model)] // OpenAPI schema
#[sea_orm(schema_name = "floorball_platform", table_name = "user_roles")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub user_id: Id,
    pub role: Role,
    pub status: ApprovalStatus,
    #[schema(value_type = Option<Uuid>)]
    pub club_id: Option<Id>,
    #[schema(value_type = Option<Uuid>)]
    pub team_id: Option<Id>,
    #[schema(value_type = Option<Uuid>)]
    pub referee_id: Option<Id>,
    pub club_leader_title: Option<ClubLeaderTitle>,
    /// `club:<id>`, `team:<id>`, `referee:<id>` or `global`
    pub scope_key: String,
    #[schema(value_type = Option<Uuid>)]
    pub decided_by_id: Option<Id>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub decided_at: Option<DateTimeWithTimeZone>,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)] // Applies to OpenAPI schema
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)] // Applies to OpenAPI schema
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::clubs::Entity",
        from = "Column::ClubId",
        to = "super::clubs::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Clubs,
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamId",
        to = "super::teams::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Teams,
    #[sea_orm(
        belongs_to = "super::referees::Entity",
        from = "Column::RefereeId",
        to = "super::referees::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Referees,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::clubs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clubs.def()
    }
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teams.def()
    }
}

impl Related<super::referees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Referees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
