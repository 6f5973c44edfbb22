//! Bearer-token authentication extractors
//!
//! [`VerifiedCaller`] only checks the token. [`AuthUser`] also resolves
//! the stored user, creating the user and an empty profile on first sight.
//! [`PremiumUser`] additionally requires an active subscription.

use axum::extract::FromRequestParts;
use flourish_core::ApiError;
use flourish_core::model::{PremiumPlan, Profile, User};
use flourish_identity::VerifiedToken;
use flourish_store::StoreError;
use http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Caller whose ID token verified, without a store lookup
#[derive(Debug, Clone)]
pub struct VerifiedCaller(pub VerifiedToken);

/// Authenticated Flourish user
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub has_premium: bool,
    pub premium_plan: PremiumPlan,
}

/// Authenticated user with premium access
#[derive(Debug, Clone)]
pub struct PremiumUser(pub AuthUser);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<AppState> for VerifiedCaller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;

        let Some(verifier) = &state.identity else {
            tracing::warn!("rejecting token, no identity provider configured");
            return Err(ApiError::Unauthorized.into());
        };

        verifier.verify(token).await.map(Self).map_err(|e| {
            tracing::warn!(error = %e, "token verification failed");
            AppError(ApiError::Unauthorized)
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let VerifiedCaller(token) = VerifiedCaller::from_request_parts(parts, state).await?;

        resolve_user(state, token).await.map_err(|e| {
            tracing::error!(error = %e, "failed to resolve authenticated user");
            AppError(ApiError::Unauthorized)
        })
    }
}

impl FromRequestParts<AppState> for PremiumUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if !user.has_premium {
            return Err(ApiError::PremiumRequired.into());
        }

        Ok(Self(user))
    }
}

/// Look up the token's user, creating it with an empty profile if missing
async fn resolve_user(state: &AppState, token: VerifiedToken) -> Result<AuthUser, StoreError> {
    let token_email = token.email.unwrap_or_default();

    if let Some(user) = state.store.get_user(&token.uid).await? {
        let email = if user.email.is_empty() { token_email } else { user.email };

        return Ok(AuthUser {
            id: token.uid,
            email,
            has_premium: user.has_premium,
            premium_plan: user.premium_plan,
        });
    }

    let now = state.now();
    tracing::info!(uid = %token.uid, "creating user on first authenticated request");

    state
        .store
        .put_user(User::new(token.uid.clone(), token_email.clone(), now))
        .await?;
    state.store.put_profile(Profile::empty(token.uid.clone(), None, now)).await?;

    Ok(AuthUser {
        id: token.uid,
        email: token_email,
        has_premium: false,
        premium_plan: PremiumPlan::Free,
    })
}
