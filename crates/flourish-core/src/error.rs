use http::StatusCode;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. The server layer
/// converts these into actual HTTP responses, keeping domain errors
/// decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `not_found`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}

/// Errors surfaced to API callers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or invalid credentials
    #[error("You must be logged in to do that.")]
    Unauthorized,

    /// Authenticated but not allowed
    #[error("You don't have permission to do that.")]
    Forbidden,

    /// Feature gated behind a subscription
    #[error("This feature requires a Flourish Premium subscription 💎")]
    PremiumRequired,

    /// Named resource does not exist
    #[error("{0} not found.")]
    NotFound(String),

    /// Request failed validation
    #[error("{0}")]
    BadRequest(String),

    /// Request conflicts with current state
    #[error("{0}")]
    Conflict(String),

    /// Caller exceeded the request rate
    #[error("Slow down! Too many requests. Try again in a moment. 🌿")]
    RateLimited,

    /// HTTP method not supported on this path
    #[error("Method not allowed. Use {0}.")]
    MethodNotAllowed(String),

    /// Unexpected failure; details are logged, never returned
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest(detail.into())
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::Conflict(detail.into())
    }
}

impl HttpError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::PremiumRequired => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::PremiumRequired => "premium_required",
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Conflict(_) => "conflict",
            Self::RateLimited => "rate_limited",
            Self::MethodNotAllowed(_) => "method_not_allowed",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "Something went wrong. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_per_kind() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::PremiumRequired.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("Profile").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::MethodNotAllowed("GET".into()).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn client_messages() {
        assert_eq!(ApiError::not_found("Profile").client_message(), "Profile not found.");
        assert_eq!(
            ApiError::MethodNotAllowed("GET, PUT".into()).client_message(),
            "Method not allowed. Use GET, PUT."
        );
        assert_eq!(
            ApiError::bad_request("Email is required").client_message(),
            "Email is required"
        );
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = ApiError::from(anyhow::anyhow!("connection refused to 10.0.0.3"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Something went wrong. Please try again.");
        assert!(err.to_string().contains("connection refused"));
    }
}
