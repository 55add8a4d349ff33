use super::authenticated_user::{ApprovedUser, AuthenticatedUser};
use super::session_preferences::SessionPrefs;
use crate::error::Error;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    routing::{get, put},
    Json, Router,
};
use axum_login::{
    tower_sessions::{Expiry, MemoryStore, SessionManagerLayer},
    AuthManagerLayerBuilder,
};
use domain::preferences::{SessionPreferences, ViewMode};
use domain::user::Backend;
use sea_orm::{DatabaseBackend, MockDatabase};
use std::sync::Arc;
use time::Duration;
use tower::ServiceExt;

async fn write_preferences(mut session: SessionPrefs) -> Result<Json<SessionPreferences>, Error> {
    session.prefs.set_view_mode(ViewMode::Dark);
    session.save().await?;
    Ok(Json(session.prefs))
}

async fn read_preferences(session: SessionPrefs) -> Json<SessionPreferences> {
    Json(session.prefs)
}

async fn members_only(ApprovedUser(user): ApprovedUser) -> String {
    user.username
}

async fn users_only(AuthenticatedUser(user): AuthenticatedUser) -> String {
    user.username
}

fn test_app() -> Router {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));
    let auth_layer = AuthManagerLayerBuilder::new(Backend::new(&db), session_layer).build();

    Router::new()
        .route("/preferences", put(write_preferences))
        .route("/preferences", get(read_preferences))
        .route("/members", get(members_only))
        .route("/users", get(users_only))
        .layer(auth_layer)
}

async fn json_of(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn preferences_survive_between_requests_of_a_session() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/preferences")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .unwrap()
        .to_owned();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/preferences")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let prefs = json_of(response).await;
    assert_eq!(prefs["view_mode"], "dark");
    assert_eq!(prefs["guest_defaults_applied"], true);
    assert_eq!(prefs["user_id"], serde_json::Value::Null);
}

#[tokio::test]
async fn fresh_sessions_start_without_preferences() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/preferences")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let prefs = json_of(response).await;
    assert_eq!(prefs["league_id"], serde_json::Value::Null);
    assert_eq!(prefs["guest_defaults_applied"], false);
}

#[tokio::test]
async fn guests_are_rejected_by_user_extractors() {
    for uri in ["/members", "/users"] {
        let response = test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
