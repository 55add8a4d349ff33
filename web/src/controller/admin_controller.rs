//! Admin-only membership maintenance. Routed behind `protect::users::admin`.

use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::params::approval::GrantParams;
use crate::{AppState, Error};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::approval as ApprovalApi;
use domain::{user_roles, Id};
use log::*;
use service::config::ApiVersion;

/// DELETE a membership of any user.
#[utoipa::path(
    delete,
    path = "/admin/memberships/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Membership id"),
    ),
    responses(
        (status = 204, description = "Removed the membership"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Membership not found"),
        (status = 409, description = "Admins cannot remove their own admin membership"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn remove_membership(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE membership {id} by admin {}", user.id);

    ApprovalApi::remove(app_state.db_conn_ref(), &user, id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}

/// CREATE an approved tournament admin or referee admin membership for a user.
#[utoipa::path(
    post,
    path = "/admin/users/{id}/grants",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "User id"),
    ),
    request_body = GrantParams,
    responses(
        (status = 201, description = "Granted the role", body = user_roles::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 409, description = "The user already holds the role"),
        (status = 422, description = "The role cannot be granted"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn grant(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<GrantParams>,
) -> Result<impl IntoResponse, Error> {
    let membership = ApprovalApi::grant(app_state.db_conn_ref(), &user, id, params.role).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), membership)),
    ))
}
