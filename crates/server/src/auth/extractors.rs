use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use shared_types::{AppError, Principal};

use super::jwt::Claims;
use super::middleware::AuthFailure;
use crate::identity;
use crate::repo::Store;

/// Extractor that requires a verified token. Returns 401 with the precise
/// kind: `Unauthenticated` (no token), `TokenExpired` or `InvalidToken`.
pub struct AuthRequired(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(AuthFailure(err)) = parts.extensions.get::<AuthFailure>() {
            return Err(err.clone());
        }
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthRequired)
            .ok_or_else(|| AppError::unauthenticated("No token, authorization denied"))
    }
}

/// Extractor yielding the caller as a live [`Principal`].
///
/// The token's role is only a claim: the id is looked up in the identity
/// store of that role, and a missing record fails with `UserNotFound`.
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Store: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthRequired(claims) = AuthRequired::from_request_parts(parts, state).await?;
        let store = Store::from_ref(state);
        let principal = identity::resolve_principal(&store, &claims).await?;
        Ok(CurrentUser(principal))
    }
}
