use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status of a role membership through its approval lifecycle.
#[derive(
    Debug,
    Clone,
    Copy,
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_status")]
pub enum ApprovalStatus {
    /// Waiting for a club or team leader
    #[sea_orm(string_value = "pending_leader")]
    PendingLeader,
    /// Waiting for an admin tier approver
    #[sea_orm(string_value = "pending_admin")]
    #[default]
    PendingAdmin,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Pulled back by the requesting user before a decision was made
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
}

impl ApprovalStatus {
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            ApprovalStatus::PendingLeader | ApprovalStatus::PendingAdmin
        )
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalStatus::PendingLeader => write!(fmt, "pending_leader"),
            ApprovalStatus::PendingAdmin => write!(fmt, "pending_admin"),
            ApprovalStatus::Approved => write!(fmt, "approved"),
            ApprovalStatus::Rejected => write!(fmt, "rejected"),
            ApprovalStatus::Withdrawn => write!(fmt, "withdrawn"),
        }
    }
}
