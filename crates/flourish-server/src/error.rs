use axum::Json;
use axum::response::{IntoResponse, Response};
use flourish_core::{ApiError, HttpError};
use serde_json::json;

/// Handler error rendered as the `{ ok: false, error }` envelope
#[derive(Debug)]
pub struct AppError(pub ApiError);

pub type ApiResult<T> = Result<T, AppError>;

impl<E> From<E> for AppError
where
    E: Into<ApiError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = err.status_code();

        if let ApiError::Internal(ref cause) = err {
            tracing::error!(error = ?cause, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), kind = err.error_type(), "request rejected");
        }

        let body = json!({
            "ok": false,
            "error": err.client_message(),
        });

        (status, Json(body)).into_response()
    }
}
