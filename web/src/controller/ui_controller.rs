//! Slicer endpoints. Each one validates a single selection, applies the
//! cascade to the session preferences, saves them, and answers with the
//! updated set.

use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::extractors::selection::Selection;
use crate::extractors::session_preferences::SessionPrefs;
use crate::params::preferences::*;
use crate::{AppState, Error};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::guest_defaults::{self as GuestDefaultsApi, GuestDefaults};
use domain::preferences::{self as PreferencesApi, SessionPreferences};
use log::*;
use service::config::ApiVersion;

async fn saved(prefs: SessionPrefs) -> Result<Json<ApiResponse<SessionPreferences>>, Error> {
    prefs.save().await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), prefs.prefs)))
}

/// Fills a first-time guest session with the default selection.
#[utoipa::path(
    post,
    path = "/ui/ensure_guest_defaults",
    params(ApiVersion),
    responses(
        (status = 200, description = "The session preferences, defaults applied where needed", body = SessionPreferences),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn ensure_guest_defaults(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    mut prefs: SessionPrefs,
) -> Result<impl IntoResponse, Error> {
    let defaults = GuestDefaults::from_config(&app_state.config);
    let changed =
        GuestDefaultsApi::apply(app_state.db_conn_ref(), &mut prefs.prefs, &defaults).await?;

    if changed {
        debug!("Guest defaults applied");
        prefs.save().await?;
    }
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), prefs.prefs)))
}

#[utoipa::path(
    put,
    path = "/ui/league",
    params(ApiVersion),
    request_body = LeagueSelection,
    responses(
        (status = 200, description = "Selected the league", body = SessionPreferences),
        (status = 400, description = "Unknown league"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn league(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    mut prefs: SessionPrefs,
    Selection(params): Selection<LeagueSelection>,
) -> Result<impl IntoResponse, Error> {
    PreferencesApi::select_league(app_state.db_conn_ref(), &mut prefs.prefs, &params.league_id)
        .await?;
    saved(prefs).await
}

/// Selects a team and the league it plays in.
#[utoipa::path(
    put,
    path = "/ui/team",
    params(ApiVersion),
    request_body = TeamSelection,
    responses(
        (status = 200, description = "Selected the team", body = SessionPreferences),
        (status = 400, description = "Unknown team"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn team(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    mut prefs: SessionPrefs,
    Selection(params): Selection<TeamSelection>,
) -> Result<impl IntoResponse, Error> {
    PreferencesApi::select_team(app_state.db_conn_ref(), &mut prefs.prefs, &params.team_id).await?;
    saved(prefs).await
}

#[utoipa::path(
    put,
    path = "/ui/season",
    params(ApiVersion),
    request_body = SeasonSelection,
    responses(
        (status = 200, description = "Selected the season", body = SessionPreferences),
        (status = 400, description = "Season missing, not a number or out of range"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn season(
    CompareApiVersion(_v): CompareApiVersion,
    mut prefs: SessionPrefs,
    Selection(params): Selection<SeasonSelection>,
) -> Result<impl IntoResponse, Error> {
    let start_year = PreferencesApi::parse_season_start_year(&params.start_year)?;
    prefs.prefs.set_season(start_year)?;
    saved(prefs).await
}

#[utoipa::path(
    put,
    path = "/ui/gender",
    params(ApiVersion),
    request_body = GenderSelection,
    responses(
        (status = 200, description = "Selected the gender", body = SessionPreferences),
        (status = 400, description = "Unknown gender"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn gender(
    CompareApiVersion(_v): CompareApiVersion,
    mut prefs: SessionPrefs,
    Selection(params): Selection<GenderSelection>,
) -> Result<impl IntoResponse, Error> {
    prefs.prefs.set_gender(PreferencesApi::parse_gender(&params.gender)?);
    saved(prefs).await
}

#[utoipa::path(
    put,
    path = "/ui/age_group",
    params(ApiVersion),
    request_body = AgeGroupSelection,
    responses(
        (status = 200, description = "Selected the age group", body = SessionPreferences),
        (status = 400, description = "Unknown age group"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn age_group(
    CompareApiVersion(_v): CompareApiVersion,
    mut prefs: SessionPrefs,
    Selection(params): Selection<AgeGroupSelection>,
) -> Result<impl IntoResponse, Error> {
    prefs.prefs.set_age_group(PreferencesApi::parse_age_group(&params.age_group)?);
    saved(prefs).await
}

/// Selects a competition row and opens it on its first pool.
#[utoipa::path(
    put,
    path = "/ui/competition_row",
    params(ApiVersion),
    request_body = CompetitionRowSelection,
    responses(
        (status = 200, description = "Selected the row", body = SessionPreferences),
        (status = 400, description = "Unknown row, or a row without pools"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn competition_row(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    mut prefs: SessionPrefs,
    Selection(params): Selection<CompetitionRowSelection>,
) -> Result<impl IntoResponse, Error> {
    PreferencesApi::select_competition_row(app_state.db_conn_ref(), &mut prefs.prefs, &params.row_id)
        .await?;
    saved(prefs).await
}

#[utoipa::path(
    put,
    path = "/ui/competition_pool",
    params(ApiVersion),
    request_body = CompetitionPoolSelection,
    responses(
        (status = 200, description = "Selected the pool", body = SessionPreferences),
        (status = 400, description = "Unknown pool"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn competition_pool(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    mut prefs: SessionPrefs,
    Selection(params): Selection<CompetitionPoolSelection>,
) -> Result<impl IntoResponse, Error> {
    PreferencesApi::select_competition_pool(
        app_state.db_conn_ref(),
        &mut prefs.prefs,
        &params.pool_id,
    )
    .await?;
    saved(prefs).await
}

#[utoipa::path(
    put,
    path = "/ui/competition_team",
    params(ApiVersion),
    request_body = CompetitionTeamSelection,
    responses(
        (status = 200, description = "Selected the team name", body = SessionPreferences),
        (status = 400, description = "Team name is missing"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn competition_team(
    CompareApiVersion(_v): CompareApiVersion,
    mut prefs: SessionPrefs,
    Selection(params): Selection<CompetitionTeamSelection>,
) -> Result<impl IntoResponse, Error> {
    prefs.prefs.set_competition_team(&params.team_name)?;
    saved(prefs).await
}

#[utoipa::path(
    put,
    path = "/ui/calendar_mode",
    params(ApiVersion),
    request_body = CalendarModeSelection,
    responses(
        (status = 200, description = "Selected the calendar mode", body = SessionPreferences),
        (status = 400, description = "Unknown calendar mode"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn calendar_mode(
    CompareApiVersion(_v): CompareApiVersion,
    mut prefs: SessionPrefs,
    Selection(params): Selection<CalendarModeSelection>,
) -> Result<impl IntoResponse, Error> {
    prefs.prefs.set_calendar_mode(PreferencesApi::parse_calendar_mode(&params.mode)?);
    saved(prefs).await
}

#[utoipa::path(
    put,
    path = "/ui/view_mode",
    params(ApiVersion),
    request_body = ViewModeSelection,
    responses(
        (status = 200, description = "Selected the view mode", body = SessionPreferences),
        (status = 400, description = "Unknown view mode"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn view_mode(
    CompareApiVersion(_v): CompareApiVersion,
    mut prefs: SessionPrefs,
    Selection(params): Selection<ViewModeSelection>,
) -> Result<impl IntoResponse, Error> {
    prefs.prefs.set_view_mode(PreferencesApi::parse_view_mode(&params.mode)?);
    saved(prefs).await
}

#[utoipa::path(
    put,
    path = "/ui/stats_aggregation_mode",
    params(ApiVersion),
    request_body = StatsAggregationModeSelection,
    responses(
        (status = 200, description = "Selected the aggregation mode", body = SessionPreferences),
        (status = 400, description = "Unknown aggregation mode"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn stats_aggregation_mode(
    CompareApiVersion(_v): CompareApiVersion,
    mut prefs: SessionPrefs,
    Selection(params): Selection<StatsAggregationModeSelection>,
) -> Result<impl IntoResponse, Error> {
    prefs.prefs
        .set_stats_aggregation_mode(PreferencesApi::parse_stats_aggregation_mode(&params.mode)?);
    saved(prefs).await
}
