/// Errors from a generative model call
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// HTTP request failed before a response arrived
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with an error status
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Provider answered without any text
    #[error("empty response: {0}")]
    Empty(String),
}

/// AI response cache errors
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Valkey connection or command error
    #[error("cache backend: {0}")]
    Backend(String),

    /// Entry could not be encoded or decoded
    #[error("serialization: {0}")]
    Serialization(String),
}
