pub(crate) mod authenticated_user;
pub(crate) mod compare_api_version;
pub(crate) mod selection;
pub(crate) mod session_preferences;

#[cfg(test)]
#[cfg(feature = "mock")]
mod session_tests;

use axum::http::StatusCode;

type RejectionType = (StatusCode, String);
