/// Billing provider errors
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// HTTP request failed
    #[error("billing request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider returned a non-success status
    #[error("billing API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// No API key configured
    #[error("billing API key is not configured")]
    NotConfigured,
}
