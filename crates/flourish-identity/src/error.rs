/// Token verification errors
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Token is malformed, expired, revoked, or unknown
    #[error("invalid ID token")]
    InvalidToken,

    /// HTTP request to the identity provider failed
    #[error("identity lookup failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Identity provider returned an unexpected response
    #[error("identity provider error ({status}): {message}")]
    Provider {
        /// HTTP status code
        status: u16,
        message: String,
    },
}
