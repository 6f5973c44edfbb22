use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use flourish_core::ApiError;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON body extractor that answers with the error envelope
///
/// An empty body reads as `{}`, so payloads whose fields are all optional
/// accept bodiless requests. The `content-type` header is not checked.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "failed to read request body");
            ApiError::bad_request("Invalid JSON body")
        })?;

        let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(raw).map(Self).map_err(|e| {
            let err = if e.is_syntax() || e.is_eof() {
                ApiError::bad_request("Invalid JSON body")
            } else {
                ApiError::bad_request(format!("Invalid request body: {e}"))
            };
            AppError(err)
        })
    }
}
