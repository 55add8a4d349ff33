use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The role a membership grants.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "tournament_admin")]
    TournamentAdmin,
    #[sea_orm(string_value = "ref_admin")]
    RefAdmin,
    #[sea_orm(string_value = "club_leader")]
    ClubLeader,
    #[sea_orm(string_value = "team_leader")]
    TeamLeader,
    #[sea_orm(string_value = "secretariat")]
    Secretariat,
    #[sea_orm(string_value = "referee")]
    Referee,
    #[sea_orm(string_value = "player")]
    #[default]
    Player,
    #[sea_orm(string_value = "supporter")]
    Supporter,
}

impl std::fmt::Display for Role {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(fmt, "admin"),
            Role::TournamentAdmin => write!(fmt, "tournament_admin"),
            Role::RefAdmin => write!(fmt, "ref_admin"),
            Role::ClubLeader => write!(fmt, "club_leader"),
            Role::TeamLeader => write!(fmt, "team_leader"),
            Role::Secretariat => write!(fmt, "secretariat"),
            Role::Referee => write!(fmt, "referee"),
            Role::Player => write!(fmt, "player"),
            Role::Supporter => write!(fmt, "supporter"),
        }
    }
}

/// Title a club leader holds on the club board.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "club_leader_title")]
pub enum ClubLeaderTitle {
    #[sea_orm(string_value = "formand")]
    Formand,
    #[sea_orm(string_value = "kasserer")]
    Kasserer,
    #[sea_orm(string_value = "bestyrelsesmedlem")]
    Bestyrelsesmedlem,
}
