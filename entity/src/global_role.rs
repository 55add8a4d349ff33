use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Platform-wide standing of an account, independent of its role memberships.
#[derive(
    Debug,
    Clone,
    Eq,
    PartialEq,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "global_role")]
pub enum GlobalRole {
    /// Unauthenticated visitor. Never persisted.
    #[sea_orm(string_value = "guest")]
    Guest,
    /// Registered account with at least one approved membership
    #[sea_orm(string_value = "member")]
    Member,
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Registered account whose memberships are all still awaiting a decision
    #[sea_orm(string_value = "superuser_pending")]
    #[default]
    SuperuserPending,
}

impl std::fmt::Display for GlobalRole {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlobalRole::Guest => write!(fmt, "guest"),
            GlobalRole::Member => write!(fmt, "member"),
            GlobalRole::Admin => write!(fmt, "admin"),
            GlobalRole::SuperuserPending => write!(fmt, "superuser_pending"),
        }
    }
}
