use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::{AppState, Error};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::league as LeagueApi;
use domain::{clubs, leagues, referees, teams, Id};
use service::config::ApiVersion;

/// INDEX all leagues.
#[utoipa::path(
    get,
    path = "/leagues",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved all leagues", body = [leagues::Model]),
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let leagues = LeagueApi::list_leagues(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), leagues)))
}

/// INDEX the teams of a league.
#[utoipa::path(
    get,
    path = "/leagues/{id}/teams",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "League id"),
    ),
    responses(
        (status = 200, description = "Successfully retrieved the league's teams", body = [teams::Model]),
        (status = 404, description = "League not found"),
    )
)]
pub async fn teams(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let teams = LeagueApi::list_teams(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), teams)))
}

/// GET a team by id.
#[utoipa::path(
    get,
    path = "/teams/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Team id"),
    ),
    responses(
        (status = 200, description = "Successfully retrieved the team", body = teams::Model),
        (status = 404, description = "Team not found"),
    )
)]
pub async fn read_team(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let team = LeagueApi::find_team(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), team)))
}

/// INDEX all clubs.
#[utoipa::path(
    get,
    path = "/clubs",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved all clubs", body = [clubs::Model]),
    )
)]
pub async fn clubs(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let clubs = LeagueApi::list_clubs(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), clubs)))
}

/// INDEX all referees.
#[utoipa::path(
    get,
    path = "/referees",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved all referees", body = [referees::Model]),
    )
)]
pub async fn referees(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let referees = LeagueApi::list_referees(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), referees)))
}
