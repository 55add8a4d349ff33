//! A user's own memberships: listing, requesting more and withdrawing pending ones.

use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::{ApprovedUser, AuthenticatedUser};
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::{AppState, Error};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::approval as ApprovalApi;
use domain::registration::{self as RegistrationApi, MembershipView, RoleRequestParams};
use domain::{user_roles, Id};
use log::*;
use service::config::ApiVersion;

/// INDEX the logged-in user's memberships, newest first.
#[utoipa::path(
    get,
    path = "/me/roles",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved the user's memberships", body = [MembershipView]),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let roles = RegistrationApi::my_roles(app_state.db_conn_ref(), &user).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), roles)))
}

/// CREATE a request for another membership.
#[utoipa::path(
    post,
    path = "/me/roles",
    params(ApiVersion),
    request_body = RoleRequestParams,
    responses(
        (status = 201, description = "Filed a pending membership", body = user_roles::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Awaiting approval"),
        (status = 409, description = "The membership already exists"),
        (status = 422, description = "Unprocessable Entity"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    ApprovedUser(user): ApprovedUser,
    State(app_state): State<AppState>,
    Json(params): Json<RoleRequestParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST request {} for user {}", params.role, user.id);

    let membership = RegistrationApi::request_role(app_state.db_conn_ref(), &user, params).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), membership)),
    ))
}

/// UPDATE a pending membership of the logged-in user to withdrawn.
#[utoipa::path(
    put,
    path = "/me/roles/{id}/withdraw",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Membership id"),
    ),
    responses(
        (status = 200, description = "Withdrew the membership", body = user_roles::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner of the membership"),
        (status = 404, description = "Membership not found"),
        (status = 409, description = "Membership is no longer pending"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn withdraw(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let membership = ApprovalApi::withdraw(app_state.db_conn_ref(), &user, id).await?;
    info!("User {} withdrew membership {}", user.id, membership.id);

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), membership)))
}
