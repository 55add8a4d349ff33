use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use log::*;
use semver::Version;
use service::config::ApiVersion;

/// Rejects requests whose `x-version` header does not name a supported API version.
pub(crate) struct CompareApiVersion(pub Version);

fn supported(version: &Version) -> bool {
    ApiVersion::versions()
        .iter()
        .filter_map(|known| Version::parse(known).ok())
        .any(|known| &known == version)
}

#[async_trait]
impl<S> FromRequestParts<S> for CompareApiVersion
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let field_name = ApiVersion::field_name();
        let header = parts.headers.get(field_name).ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                format!("Missing {field_name} header"),
            )
        })?;

        let version = header
            .to_str()
            .ok()
            .and_then(|value| Version::parse(value.trim()).ok())
            .ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Malformed {field_name} header"),
                )
            })?;

        if !supported(&version) {
            warn!("Request for unsupported API version {version}");
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Unsupported API version {version}"),
            ));
        }

        Ok(CompareApiVersion(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<CompareApiVersion, RejectionType> {
        let mut builder = Request::builder().uri("/leagues");
        if let Some(value) = header {
            builder = builder.header("x-version", value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        CompareApiVersion::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn accepts_the_current_version() {
        let CompareApiVersion(version) = extract(Some("1.0.0-beta1")).await.unwrap();
        assert_eq!(version.to_string(), "1.0.0-beta1");
    }

    #[tokio::test]
    async fn rejects_missing_malformed_and_unknown_versions() {
        for header in [None, Some("one"), Some("2.0.0")] {
            let (status, _) = extract(header).await.err().unwrap();
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }
}
