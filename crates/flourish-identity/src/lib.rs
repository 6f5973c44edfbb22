#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod error;
mod toolkit;

use async_trait::async_trait;

pub use error::IdentityError;
pub use toolkit::IdentityToolkitVerifier;

/// Identity asserted by a verified ID token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// Provider user id
    pub uid: String,
    pub email: Option<String>,
}

/// Verifies bearer ID tokens issued by the identity provider
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<VerifiedToken, IdentityError>;
}
