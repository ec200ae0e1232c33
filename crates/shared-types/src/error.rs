use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Categorization of application errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AppErrorKind {
    Unauthenticated,
    InvalidToken,
    TokenExpired,
    UserNotFound,
    Forbidden,
    NotFound,
    BadRequest,
    ValidationError,
    InvalidStateTransition,
    Conflict,
    UpstreamFailure,
    InternalError,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppErrorKind::Unauthenticated => "Unauthenticated",
            AppErrorKind::InvalidToken => "InvalidToken",
            AppErrorKind::TokenExpired => "TokenExpired",
            AppErrorKind::UserNotFound => "UserNotFound",
            AppErrorKind::Forbidden => "Forbidden",
            AppErrorKind::NotFound => "NotFound",
            AppErrorKind::BadRequest => "BadRequest",
            AppErrorKind::ValidationError => "ValidationError",
            AppErrorKind::InvalidStateTransition => "InvalidStateTransition",
            AppErrorKind::Conflict => "Conflict",
            AppErrorKind::UpstreamFailure => "UpstreamFailure",
            AppErrorKind::InternalError => "InternalError",
        };
        f.write_str(name)
    }
}

/// Structured application error returned by every layer of the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, String>,
}

/// Message returned for any storage or blob failure. Internal detail stays in the logs.
pub const UPSTREAM_FAILURE_MESSAGE: &str =
    "A storage service is temporarily unavailable. Please try again.";

impl AppError {
    fn new(kind: AppErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Unauthenticated, message)
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::InvalidToken, message)
    }

    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::TokenExpired, message)
    }

    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::UserNotFound, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::BadRequest, message)
    }

    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        Self {
            kind: AppErrorKind::ValidationError,
            message: message.into(),
            field_errors,
        }
    }

    /// Validation failure on a single field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), message.clone());
        Self::validation(message, field_errors)
    }

    /// The requested transition is not defined from `current`.
    pub fn invalid_transition(action: &str, current: impl fmt::Display) -> Self {
        Self::new(
            AppErrorKind::InvalidStateTransition,
            format!("Cannot {action}: current status is '{current}'"),
        )
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Conflict, message)
    }

    pub fn upstream() -> Self {
        Self::new(AppErrorKind::UpstreamFailure, UPSTREAM_FAILURE_MESSAGE)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::InternalError, message)
    }

    pub fn status_code_u16(&self) -> u16 {
        match self.kind {
            AppErrorKind::BadRequest
            | AppErrorKind::ValidationError
            | AppErrorKind::InvalidStateTransition => 400,
            AppErrorKind::Unauthenticated
            | AppErrorKind::InvalidToken
            | AppErrorKind::TokenExpired => 401,
            AppErrorKind::Forbidden => 403,
            AppErrorKind::NotFound | AppErrorKind::UserNotFound => 404,
            AppErrorKind::Conflict => 409,
            AppErrorKind::UpstreamFailure | AppErrorKind::InternalError => 500,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(feature = "validation")]
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = HashMap::new();
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                let msg = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                field_errors.insert(field.to_string(), msg);
            }
        }
        AppError::validation("Validation failed", field_errors)
    }
}

/// Wire shape of an error: the response envelope with `success: false`.
#[derive(Serialize)]
#[cfg_attr(not(feature = "server"), allow(dead_code))]
struct ErrorEnvelope<'a> {
    success: bool,
    #[serde(flatten)]
    error: &'a AppError,
}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code_u16())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorEnvelope {
            success: false,
            error: &self,
        };
        (status, axum::Json(&body)).into_response()
    }
}
