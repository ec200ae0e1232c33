use shared_types::AppError;

/// Convert a sqlx::Error into an AppError.
///
/// Store failures never reach the caller with their detail: the cause is
/// logged here and the caller gets the generic retryable message.
pub fn sqlx_to_app_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => AppError::not_found("Resource not found"),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation (error code 23505)
            if db_err.code().as_deref() == Some("23505") {
                let detail = db_err.message();
                let friendly = if detail.contains("email") {
                    "An account with this email already exists"
                } else if detail.contains("license") {
                    "A lawyer with this license number is already registered"
                } else {
                    "A record with this value already exists"
                };
                return AppError::conflict(friendly);
            }
            tracing::error!(error = %err, code = ?db_err.code(), "Database error");
            AppError::upstream()
        }
        _ => {
            tracing::error!(error = %err, "Database error");
            AppError::upstream()
        }
    }
}

/// Extension trait providing `.into_app_error()` on sqlx::Error.
pub trait SqlxErrorExt {
    fn into_app_error(self) -> AppError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_app_error(self) -> AppError {
        sqlx_to_app_error(self)
    }
}

/// Trait for validating request DTOs before processing.
pub trait ValidateRequest {
    fn validate_request(&self) -> Result<(), AppError>;
}

impl<T: validator::Validate> ValidateRequest for T {
    fn validate_request(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}
