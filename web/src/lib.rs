use axum::extract::DefaultBodyLimit;
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderName, HeaderValue, Method,
};
use axum_login::{
    tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer},
    AuthManagerLayerBuilder,
};
use domain::user::Backend;
use log::*;
use service::config::ApiVersion;
use std::error::Error as StdError;
use time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions_sqlx_store::PostgresStore;

mod controller;
mod error;
pub(crate) mod extractors;
pub(crate) mod middleware;
mod params;
pub(crate) mod protect;
mod router;

pub use error::{Error, Result};
pub use service::AppState;

/// Headroom for multipart framing on top of the largest accepted upload.
const BODY_LIMIT_SLACK_BYTES: usize = 64 * 1024;

pub async fn init_server(app_state: AppState) -> core::result::Result<(), Box<dyn StdError>> {
    info!(
        "Starting floorball platform API {} ({})",
        app_state.config.api_version(),
        app_state.config.runtime_env()
    );

    // Sessions live next to the platform's own tables
    let session_store = PostgresStore::new(
        app_state
            .db_conn_ref()
            .get_postgres_connection_pool()
            .clone(),
    )
    .with_schema_name("floorball_platform")?
    .with_table_name("authorized_sessions")?;
    session_store.migrate().await?;

    let deletion_task = tokio::task::spawn(
        session_store
            .clone()
            .continuously_delete_expired(tokio::time::Duration::from_secs(60)),
    );

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(app_state.config.is_production())
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            app_state.config.backend_session_expiry_seconds as i64,
        )));

    let backend = Backend::new(&app_state.database_connection);
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    let allowed_origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    info!("CORS allowed origins: {allowed_origins:?}");

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::DELETE, Method::GET, Method::POST, Method::PUT])
        .allow_credentials(true)
        .allow_headers([
            AUTHORIZATION,
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static("x-version"),
        ])
        .expose_headers([HeaderName::from_static("x-version")])
        .allow_origin(allowed_origins);

    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_owned());
    let server_url = format!("{interface}:{}", app_state.config.port);
    let listener = TcpListener::bind(&server_url).await?;
    info!(
        "Server listening on {server_url}, expecting {} {}",
        ApiVersion::field_name(),
        ApiVersion::default_version()
    );

    let body_limit = app_state.config.stats_upload_max_bytes + BODY_LIMIT_SLACK_BYTES;
    let app = router::define_routes(app_state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(auth_layer)
        .layer(cors_layer);

    axum::serve(listener, app.into_make_service()).await?;

    deletion_task.abort();
    Ok(())
}
