use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use shared_types::AppError;
use std::sync::OnceLock;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AppError::internal("Failed to process password")
        })
}

/// False for a wrong password and for a stored digest that does not parse.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password digest is malformed");
            false
        }
    }
}

/// Digest of a throwaway secret, hashed once per process.
fn decoy_digest() -> Option<&'static str> {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    DECOY
        .get_or_init(|| hash_password("decoy-password-for-unknown-accounts").ok())
        .as_deref()
}

/// Run a full verification for a login whose account does not exist, so it
/// costs the same as a wrong password. Always false.
pub fn verify_missing_account(password: &str) -> bool {
    if let Some(digest) = decoy_digest() {
        verify_password(password, digest);
    }
    false
}
