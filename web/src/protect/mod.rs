//! Route guards run as axum middleware in front of the controllers.
//!
//! Rules that only look at the authenticated user are expressed as [`Check`]s
//! and combined with [`authorize`]; guards that need a resource loaded first
//! live in their own submodule.

pub(crate) mod teams;
pub(crate) mod users;

use crate::AppState;
use async_trait::async_trait;
use axum::{extract::Request, http::StatusCode, middleware::Next, response::IntoResponse};
use domain::{user as UserApi, Id};

/// Trait representing a single authorization rule.
///
/// Implementors answer **“is the authenticated user allowed to proceed?”**.
/// The rule receives:
/// * shared application state (`AppState`)
/// * the authenticated [`domain::users::Model`]
/// * any additional [`Id`] parameters supplied by the caller.
///
/// Example:
/// ```rust,ignore
/// #[async_trait]
/// impl Check for UserIsAdmin {
///     async fn eval(&self, _app: &AppState, user: &domain::users::Model, _args: Vec<Id>) -> bool {
///         UserApi::is_admin(user)
///     }
/// }
/// ```
#[async_trait]
pub trait Check: Send + Sync {
    async fn eval(&self, app: &AppState, user: &domain::users::Model, args: Vec<Id>) -> bool;
}

/// Pairs a [`Check`] implementation with the concrete arguments that the rule
/// should receive when evaluated.
///
/// Most callers will create predicates with the convenience constructor
/// [`Predicate::new`]:
/// ```rust,ignore
/// let checks = vec![
///     Predicate::new(UserIsApproved, vec![]),
///     Predicate::new(UserIsAdmin, vec![]),
/// ];
/// ```
/// The vector of predicates can then be passed to [`authorize`] middleware.
pub(crate) struct Predicate {
    predicate: Box<dyn Check>,
    args: Vec<Id>,
}

impl Predicate {
    pub(crate) fn new<C: Check + 'static>(predicate: C, args: Vec<Id>) -> Self {
        Self {
            predicate: Box::new(predicate),
            args,
        }
    }

    pub(crate) async fn check(&self, app_state: &AppState, user: &domain::users::Model) -> bool {
        self.predicate
            .eval(app_state, user, self.args.clone())
            .await
    }
}

/// Axum middleware that enforces one or more [`Predicate`]s.
///
/// Each predicate is evaluated in the order supplied; if any rule returns
/// `false` the request is aborted with **403 FORBIDDEN**.  When all rules
/// pass the wrapped handler (`next`) is executed.
///
/// Typical usage inside a helper function in the `protect` namespace:
/// ```rust,ignore
/// pub(crate) async fn admin(
///     State(app_state): State<AppState>,
///     AuthenticatedUser(user): AuthenticatedUser,
///     request: Request,
///     next: Next,
/// ) -> impl IntoResponse {
///     let checks = vec![Predicate::new(UserIsAdmin, vec![])];
///     authorize(&app_state, user, request, next, checks).await
/// }
/// ```
pub(crate) async fn authorize(
    app_state: &AppState,
    authenticated_user: domain::users::Model,
    request: Request,
    next: Next,
    checks: Vec<Predicate>,
) -> impl IntoResponse {
    for check in checks {
        if !check.check(app_state, &authenticated_user).await {
            return (StatusCode::FORBIDDEN, "FORBIDDEN").into_response();
        }
    }
    next.run(request).await
}

pub struct UserIsApproved;

#[async_trait]
impl Check for UserIsApproved {
    async fn eval(
        &self,
        _app_state: &AppState,
        authenticated_user: &domain::users::Model,
        _args: Vec<Id>,
    ) -> bool {
        UserApi::is_approved(authenticated_user)
    }
}

pub struct UserIsAdmin;

#[async_trait]
impl Check for UserIsAdmin {
    async fn eval(
        &self,
        _app_state: &AppState,
        authenticated_user: &domain::users::Model,
        _args: Vec<Id>,
    ) -> bool {
        UserApi::is_admin(authenticated_user)
    }
}
