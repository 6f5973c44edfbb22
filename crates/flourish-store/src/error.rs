use flourish_core::ApiError;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend rejected or could not perform the operation
    #[error("store backend: {0}")]
    Backend(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}
