use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::{AppState, Error};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::registration::{self as RegistrationApi, RegistrationParams};
use domain::users;
use log::*;
use service::config::ApiVersion;

/// CREATE a new user awaiting approval of the requested membership.
///
/// The new account cannot use member-only endpoints until an approver accepts
/// the membership it was registered with.
#[utoipa::path(
    post,
    path = "/register",
    params(ApiVersion),
    request_body = RegistrationParams,
    responses(
        (status = 201, description = "Registered a new user", body = users::Model),
        (status = 400, description = "Bad request"),
        (status = 409, description = "Email or username already in use"),
        (status = 422, description = "Unprocessable Entity"),
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Json(params): Json<RegistrationParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Register {} as {}", params.username, params.role);

    let user = RegistrationApi::register(app_state.db_conn_ref(), params).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), user)),
    ))
}
