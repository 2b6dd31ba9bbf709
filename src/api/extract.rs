use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;

/// JSON request body that ignores the content type and rejects with
/// `{"message":"Body parsing error"}` on any read or decode failure.
pub struct JsonBody<T>(pub T);

fn body_parsing_error() -> AppError {
    AppError::BadRequest("Body parsing error".to_string())
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!("error reading request body: {}", e);
            body_parsing_error()
        })?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            debug!("error decoding request body: {}", e);
            body_parsing_error()
        })
    }
}
