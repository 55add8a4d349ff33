use crate::params::team::TeamPath;
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use domain::{league as LeagueApi, stats as StatsApi};
use log::*;

/// Checks that the authenticated user may manage the statistics files of team `id`
/// Intended to be given to axum::middleware::from_fn_with_state in the router
pub(crate) async fn staff(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(path): Path<TeamPath>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    match LeagueApi::find_team(app_state.db_conn_ref(), path.id).await {
        Ok(team) => {
            if StatsApi::can_manage_team(&user, &team) {
                next.run(request).await
            } else {
                (StatusCode::FORBIDDEN, "FORBIDDEN").into_response()
            }
        }
        Err(_) => {
            error!("Team not found with {:?}", path);

            (StatusCode::NOT_FOUND, "NOT FOUND").into_response()
        }
    }
}
