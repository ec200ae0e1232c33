use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared_types::{AppError, Principal, Role};
use uuid::Uuid;

/// Token type discriminator. Only access tokens are issued today.
const TOKEN_TYPE_ACCESS: &str = "access";

const DEFAULT_EXPIRY_DAYS: i64 = 15;

/// JWT claims carried by an access token. `role` is a claim, not ground
/// truth: the guard re-resolves `sub` against the identity store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    /// Unique token identifier so two tokens issued in the same second differ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(default)]
    pub typ: String,
}

impl Claims {
    /// The principal this token claims to be.
    pub fn claimed_principal(&self) -> Principal {
        Principal {
            id: self.sub,
            role: self.role,
        }
    }
}

/// Signing secret and lifetime, held in `AppState`.
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    expiry_days: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("expiry_days", &self.expiry_days)
            .finish_non_exhaustive()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiry_days: i64) -> Self {
        Self {
            secret: secret.into(),
            expiry_days,
        }
    }

    /// Reads `JWT_SECRET` (required) and `JWT_EXPIRY_DAYS` (default 15).
    pub fn from_env() -> Result<Self, String> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;
        if secret.is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }
        let expiry_days = std::env::var("JWT_EXPIRY_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_EXPIRY_DAYS);
        Ok(Self::new(secret, expiry_days))
    }

    pub fn create_access_token(&self, principal: &Principal) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: principal.id,
            role: principal.role,
            iat: now.timestamp(),
            exp: (now + Duration::days(self.expiry_days)).timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
            typ: TOKEN_TYPE_ACCESS.to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            AppError::internal("Failed to issue token")
        })
    }

    /// Verify signature and expiry. Expired tokens report `TokenExpired`;
    /// every other failure is `InvalidToken`.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::token_expired("Token has expired"),
            _ => AppError::invalid_token("Token is not valid"),
        })?;
        if token_data.claims.typ != TOKEN_TYPE_ACCESS {
            return Err(AppError::invalid_token("Token is not valid"));
        }
        Ok(token_data.claims)
    }

    #[cfg(test)]
    fn sign_raw(&self, claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .unwrap()
    }
}
