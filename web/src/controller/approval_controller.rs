use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::ApprovedUser;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::params::approval::{DecisionParams, PendingParams};
use crate::{AppState, Error};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::approval::{self as ApprovalApi, PendingMembership};
use domain::{user_roles, Id};
use log::*;
use service::config::ApiVersion;

/// INDEX the pending memberships the logged-in user may decide.
#[utoipa::path(
    get,
    path = "/approvals/pending",
    params(ApiVersion, PendingParams),
    responses(
        (status = 200, description = "Successfully retrieved pending memberships", body = [PendingMembership]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Awaiting approval"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn pending(
    CompareApiVersion(_v): CompareApiVersion,
    ApprovedUser(user): ApprovedUser,
    State(app_state): State<AppState>,
    Query(params): Query<PendingParams>,
) -> Result<impl IntoResponse, Error> {
    let pending = ApprovalApi::pending_for(app_state.db_conn_ref(), &user, params.club_id).await?;
    debug!("{} pending memberships for user {}", pending.len(), user.id);

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), pending)))
}

/// Approves or rejects a pending membership.
#[utoipa::path(
    post,
    path = "/approvals/{id}/decide",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Membership id"),
    ),
    request_body = DecisionParams,
    responses(
        (status = 200, description = "Decided the membership", body = user_roles::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to decide this membership"),
        (status = 404, description = "Membership not found"),
        (status = 409, description = "Membership is no longer pending"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn decide(
    CompareApiVersion(_v): CompareApiVersion,
    ApprovedUser(user): ApprovedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<DecisionParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST decide membership {id}: approve={}", params.approve);

    let membership =
        ApprovalApi::decide(app_state.db_conn_ref(), &user, id, params.approve).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), membership)))
}
