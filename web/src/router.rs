use crate::{
    controller::health_check_controller, middleware::auth::require_auth, params, protect, AppState,
};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};

use crate::controller::{
    admin_controller, approval_controller, competition_controller, league_controller,
    me_controller, registration_controller, role_controller, stats_controller, ui_controller,
    user_session_controller,
};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Floorball Platform API"
        ),
        paths(
            health_check_controller::health_check,
            user_session_controller::login,
            user_session_controller::delete,
            registration_controller::create,
            me_controller::show,
            role_controller::index,
            role_controller::create,
            role_controller::withdraw,
            approval_controller::pending,
            approval_controller::decide,
            admin_controller::remove_membership,
            admin_controller::grant,
            league_controller::index,
            league_controller::teams,
            league_controller::read_team,
            league_controller::clubs,
            league_controller::referees,
            competition_controller::context,
            competition_controller::matches,
            competition_controller::read_match,
            competition_controller::standings,
            ui_controller::ensure_guest_defaults,
            ui_controller::league,
            ui_controller::team,
            ui_controller::season,
            ui_controller::gender,
            ui_controller::age_group,
            ui_controller::competition_row,
            ui_controller::competition_pool,
            ui_controller::competition_team,
            ui_controller::calendar_mode,
            ui_controller::view_mode,
            ui_controller::stats_aggregation_mode,
            stats_controller::upload,
            stats_controller::delete_file,
            stats_controller::files,
            stats_controller::events,
            stats_controller::players,
            stats_controller::summary,
        ),
        components(
            schemas(
                domain::users::Model,
                domain::user_roles::Model,
                domain::leagues::Model,
                domain::teams::Model,
                domain::clubs::Model,
                domain::referees::Model,
                domain::competition_matches::Model,
                domain::competition_pool_teams::Model,
                domain::stats_files::Model,
                domain::stats_events::Model,
                domain::stats_players::Model,
                domain::user::Credentials,
                domain::registration::RegistrationParams,
                domain::registration::RoleRequestParams,
                domain::registration::MembershipView,
                domain::approval::PendingMembership,
                domain::preferences::SessionPreferences,
                domain::filter::CompetitionContext,
                domain::filter::AppSelection,
                domain::stats::PlayerSummary,
                params::approval::DecisionParams,
                params::approval::GrantParams,
                params::preferences::LeagueSelection,
                params::preferences::TeamSelection,
                params::preferences::SeasonSelection,
                params::preferences::GenderSelection,
                params::preferences::AgeGroupSelection,
                params::preferences::CompetitionRowSelection,
                params::preferences::CompetitionPoolSelection,
                params::preferences::CompetitionTeamSelection,
                params::preferences::CalendarModeSelection,
                params::preferences::ViewModeSelection,
                params::preferences::StatsAggregationModeSelection,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "floorball_platform", description = "Floorball league, club and statistics API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our cookie session based authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "id",
                    "Session id value returned from successful login via Set-Cookie header",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(user_session_routes())
        .merge(user_session_protected_routes(app_state.clone()))
        .merge(registration_routes(app_state.clone()))
        .merge(me_routes(app_state.clone()))
        .merge(role_routes(app_state.clone()))
        .merge(approval_routes(app_state.clone()))
        .merge(admin_routes(app_state.clone()))
        .merge(league_routes(app_state.clone()))
        .merge(competition_routes(app_state.clone()))
        .merge(ui_routes(app_state.clone()))
        .merge(stats_routes(app_state.clone()))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

pub fn user_session_routes() -> Router {
    Router::new().route("/login", post(user_session_controller::login))
}

pub fn user_session_protected_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/delete", get(user_session_controller::delete))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn registration_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/register", post(registration_controller::create))
        .with_state(app_state)
}

// Guests get an answer here too
fn me_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/me", get(me_controller::show))
        .with_state(app_state)
}

fn role_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/me/roles", get(role_controller::index))
        .route("/me/roles", post(role_controller::create))
        .route("/me/roles/:id/withdraw", put(role_controller::withdraw))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn approval_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/approvals/pending", get(approval_controller::pending))
        .route("/approvals/:id/decide", post(approval_controller::decide))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn admin_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/admin/memberships/:id",
            delete(admin_controller::remove_membership),
        )
        .route("/admin/users/:id/grants", post(admin_controller::grant))
        .route_layer(from_fn_with_state(app_state.clone(), protect::users::admin))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn league_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/leagues", get(league_controller::index))
        .route("/leagues/:id/teams", get(league_controller::teams))
        .route("/teams/:id", get(league_controller::read_team))
        .route("/clubs", get(league_controller::clubs))
        .route("/referees", get(league_controller::referees))
        .with_state(app_state)
}

fn competition_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/competition/context", get(competition_controller::context))
        .route("/competition/matches", get(competition_controller::matches))
        .route(
            "/competition/matches/:id",
            get(competition_controller::read_match),
        )
        .route(
            "/competition/standings",
            get(competition_controller::standings),
        )
        .with_state(app_state)
}

fn ui_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/ui/ensure_guest_defaults",
            post(ui_controller::ensure_guest_defaults),
        )
        .route("/ui/league", put(ui_controller::league))
        .route("/ui/team", put(ui_controller::team))
        .route("/ui/season", put(ui_controller::season))
        .route("/ui/gender", put(ui_controller::gender))
        .route("/ui/age_group", put(ui_controller::age_group))
        .route("/ui/competition_row", put(ui_controller::competition_row))
        .route("/ui/competition_pool", put(ui_controller::competition_pool))
        .route("/ui/competition_team", put(ui_controller::competition_team))
        .route("/ui/calendar_mode", put(ui_controller::calendar_mode))
        .route("/ui/view_mode", put(ui_controller::view_mode))
        .route(
            "/ui/stats_aggregation_mode",
            put(ui_controller::stats_aggregation_mode),
        )
        .with_state(app_state)
}

fn stats_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(
            // POST /teams/:id/stats_files and DELETE /teams/:id/stats_files/:file_id
            Router::new()
                .route("/teams/:id/stats_files", post(stats_controller::upload))
                .route(
                    "/teams/:id/stats_files/:file_id",
                    delete(stats_controller::delete_file),
                )
                .route_layer(from_fn_with_state(app_state.clone(), protect::teams::staff)),
        )
        .merge(
            // GET /teams/:id/stats_files and /teams/:id/stats/*
            Router::new()
                .route("/teams/:id/stats_files", get(stats_controller::files))
                .route("/teams/:id/stats/events", get(stats_controller::events))
                .route("/teams/:id/stats/players", get(stats_controller::players))
                .route("/teams/:id/stats/summary", get(stats_controller::summary))
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::users::approved,
                )),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}
