use crate::controller::ApiResponse;
use crate::extractors::session_preferences::SessionPrefs;
use crate::{AppState, Error};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::filter::AppSelection;
use domain::league as LeagueApi;
use domain::preferences::SessionPreferences;
use domain::user::AuthSession;
use domain::{user_roles, Id};
use log::*;
use serde::Serialize;
use utoipa::ToSchema;

const GUEST: &str = "guest";

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct Me {
    #[schema(value_type = Option<Uuid>)]
    id: Option<Id>,
    email: Option<String>,
    username: Option<String>,
    name: Option<String>,
    /// `guest` when nobody is logged in
    global_role: String,
    roles: Vec<user_roles::Model>,
    preferences: SessionPreferences,
    selection: AppSelection,
}

/// GET the current user, or a guest, together with the session preferences.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Successfully retrieved the current user or guest", body = Me),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn show(
    State(app_state): State<AppState>,
    auth_session: AuthSession,
    prefs: SessionPrefs,
) -> Result<impl IntoResponse, Error> {
    let selection = LeagueApi::app_selection(app_state.db_conn_ref(), &prefs.prefs).await?;

    let me = match auth_session.user {
        Some(user) => Me {
            id: Some(user.id),
            email: Some(user.email),
            username: Some(user.username),
            name: user.name,
            global_role: user.global_role.to_string(),
            roles: user.roles,
            preferences: prefs.prefs,
            selection,
        },
        None => {
            trace!("GET /me for a guest session");
            Me {
                id: None,
                email: None,
                username: None,
                name: None,
                global_role: GUEST.to_string(),
                roles: Vec::new(),
                preferences: prefs.prefs,
                selection,
            }
        }
    };

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), me)))
}
