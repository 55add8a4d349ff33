use crate::protect::{authorize, Predicate, UserIsAdmin, UserIsApproved};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};

/// Lets through users with at least one approved membership.
pub(crate) async fn approved(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks = vec![Predicate::new(UserIsApproved, vec![])];
    authorize(&app_state, user, request, next, checks).await
}

pub(crate) async fn admin(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks = vec![Predicate::new(UserIsAdmin, vec![])];
    authorize(&app_state, user, request, next, checks).await
}
