use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{
    DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind, RequestErrorKind,
};
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    /// Wraps a failure of the session store, which has no domain counterpart.
    pub(crate) fn session_store(err: impl StdError + Send + Sync + 'static) -> Self {
        Self(DomainError {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "Session store failure".to_string(),
            )),
        })
    }

    pub(crate) fn unauthenticated() -> Self {
        Self(DomainError {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Unauthenticated,
            )),
        })
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                    EntityErrorKind::NotFound => {
                        (StatusCode::NOT_FOUND, "NOT FOUND").into_response()
                    }
                    EntityErrorKind::Invalid => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE ENTITY").into_response()
                    }
                    EntityErrorKind::Unauthenticated => {
                        (StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response()
                    }
                    EntityErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT").into_response(),
                    EntityErrorKind::DbTransaction | EntityErrorKind::Other(_) => {
                        error!("Entity error: {:?}", self.0.source);
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                    }
                },
                InternalErrorKind::Config | InternalErrorKind::Other(_) => {
                    error!("Internal error: {:?}", self.0.source);
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
            DomainErrorKind::Request(request_error_kind) => match request_error_kind {
                RequestErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN").into_response(),
                RequestErrorKind::Conflict(message) => {
                    (StatusCode::CONFLICT, message).into_response()
                }
                RequestErrorKind::Invalid(message) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, message).into_response()
                }
                RequestErrorKind::BadSelection(message) => {
                    (StatusCode::BAD_REQUEST, message).into_response()
                }
            },
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: DomainError) -> StatusCode {
        Error::from(err).into_response().status()
    }

    fn entity(kind: EntityErrorKind) -> DomainError {
        DomainError {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(kind)),
        }
    }

    #[test]
    fn entity_errors_map_to_their_status() {
        assert_eq!(status_of(entity(EntityErrorKind::NotFound)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(entity(EntityErrorKind::Invalid)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(entity(EntityErrorKind::Unauthenticated)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(entity(EntityErrorKind::Conflict)), StatusCode::CONFLICT);
        assert_eq!(
            status_of(entity(EntityErrorKind::DbTransaction)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn request_errors_map_to_their_status() {
        assert_eq!(status_of(DomainError::forbidden()), StatusCode::FORBIDDEN);
        assert_eq!(status_of(DomainError::conflict("taken")), StatusCode::CONFLICT);
        assert_eq!(
            status_of(DomainError::invalid("bad email")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(DomainError::bad_selection("unknown pool")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(DomainError::not_found()), StatusCode::NOT_FOUND);
    }

    #[test]
    fn session_and_login_failures_map_to_their_status() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "store down");
        assert_eq!(
            Error::session_store(io).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::unauthenticated().into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
