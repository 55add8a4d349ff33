use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use log::*;
use serde::de::DeserializeOwned;

/// A JSON slicer body. Unlike `Json`, a body that does not deserialize is a
/// bad selection and is answered with 400.
pub(crate) struct Selection<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Selection<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                debug!("Rejected slicer body: {}", rejection.body_text());
                (StatusCode::BAD_REQUEST, rejection.body_text())
            })?;
        Ok(Selection(body))
    }
}
