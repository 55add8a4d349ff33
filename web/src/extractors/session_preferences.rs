use crate::error::Error;
use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use axum_login::AuthSession;
use domain::preferences::{SessionPreferences, SESSION_KEY};
use log::*;
use tower_sessions::Session;

/// The session's UI preferences, tagged with whoever is logged in.
pub(crate) struct SessionPrefs {
    session: Session,
    pub prefs: SessionPreferences,
}

impl SessionPrefs {
    pub(crate) async fn save(&self) -> Result<(), Error> {
        self.session
            .insert(SESSION_KEY, &self.prefs)
            .await
            .map_err(Error::session_store)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionPrefs
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(status, msg)| (status, msg.to_string()))?;
        let auth_session: domain::user::AuthSession =
            AuthSession::from_request_parts(parts, state)
                .await
                .map_err(|(status, msg)| (status, msg.to_string()))?;

        let mut prefs: SessionPreferences = session
            .get(SESSION_KEY)
            .await
            .map_err(|err| {
                error!("Failed to read session preferences: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Session store failure".to_string(),
                )
            })?
            .unwrap_or_default();
        prefs.user_id = auth_session.user.as_ref().map(|user| user.id);

        Ok(SessionPrefs { session, prefs })
    }
}
