//! Competition browsing. Everything here reads the session's slicer
//! selection but never writes it back.

use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::extractors::session_preferences::SessionPrefs;
use crate::{AppState, Error};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::competition as CompetitionApi;
use domain::filter::CompetitionContext;
use domain::{competition_matches, competition_pool_teams, Id};
use log::*;
use service::config::ApiVersion;

/// GET the effective competition selection with the options of every slicer.
#[utoipa::path(
    get,
    path = "/competition/context",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully resolved the competition context", body = CompetitionContext),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn context(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    prefs: SessionPrefs,
) -> Result<impl IntoResponse, Error> {
    let context = CompetitionApi::context(app_state.db_conn_ref(), &prefs.prefs).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), context)))
}

/// INDEX the matches of the selected pool, or of the selected team when the
/// calendar is in team mode.
#[utoipa::path(
    get,
    path = "/competition/matches",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved matches", body = [competition_matches::Model]),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn matches(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    prefs: SessionPrefs,
) -> Result<impl IntoResponse, Error> {
    let matches = CompetitionApi::matches(app_state.db_conn_ref(), &prefs.prefs).await?;
    debug!("Found {} matches", matches.len());

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), matches)))
}

/// GET a match by id.
#[utoipa::path(
    get,
    path = "/competition/matches/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Match id"),
    ),
    responses(
        (status = 200, description = "Successfully retrieved the match", body = competition_matches::Model),
        (status = 404, description = "Match not found"),
    )
)]
pub async fn read_match(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let game = CompetitionApi::find_match(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), game)))
}

/// INDEX the standings of the selected pool. Empty for the cup.
#[utoipa::path(
    get,
    path = "/competition/standings",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved standings", body = [competition_pool_teams::Model]),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn standings(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    prefs: SessionPrefs,
) -> Result<impl IntoResponse, Error> {
    let standings = CompetitionApi::standings(app_state.db_conn_ref(), &prefs.prefs).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), standings)))
}
