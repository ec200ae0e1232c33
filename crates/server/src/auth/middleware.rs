use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use shared_types::AppError;

use super::jwt::JwtConfig;

/// Why a presented credential was refused. Stored in request extensions so
/// extractors can report the precise kind (expired vs invalid).
#[derive(Debug, Clone)]
pub struct AuthFailure(pub AppError);

/// Permissive auth middleware.
///
/// Verifies the bearer token if one is present and inserts either the
/// `Claims` or an `AuthFailure` into request extensions. Does NOT reject
/// anything: routes decide through their extractors, so public routes
/// (register, login, health) are unaffected by a stale header.
pub async fn auth_middleware(
    State(jwt): State<JwtConfig>,
    mut req: Request,
    next: Next,
) -> Response {
    match bearer_token(req.headers()) {
        Some(Ok(token)) => match jwt.validate_access_token(token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(err) => {
                tracing::debug!(kind = %err.kind, "Rejected bearer token");
                req.extensions_mut().insert(AuthFailure(err));
            }
        },
        Some(Err(err)) => {
            req.extensions_mut().insert(AuthFailure(err));
        }
        None => {}
    }

    next.run(req).await
}

/// `None` when no Authorization header is present; `Some(Err)` when it is
/// present but not a usable bearer credential.
fn bearer_token(headers: &HeaderMap) -> Option<Result<&str, AppError>> {
    let value = headers.get(header::AUTHORIZATION)?;
    let parsed = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthenticated("Malformed authorization header"));
    Some(parsed)
}
