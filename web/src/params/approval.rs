use domain::{roles::Role, Id};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct PendingParams {
    /// Only show requests belonging to this club
    #[param(value_type = Option<Uuid>)]
    pub(crate) club_id: Option<Id>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct DecisionParams {
    /// `true` approves the membership, `false` rejects it
    pub(crate) approve: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct GrantParams {
    /// `tournament_admin` or `ref_admin`
    pub(crate) role: Role,
}
