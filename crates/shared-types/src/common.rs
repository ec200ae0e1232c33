use serde::{Deserialize, Serialize};

/// Envelope wrapped around every successful response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A success envelope with no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Outcome of a lifecycle transition. `applied` is false when the request
/// was a replay of a transition that had already taken effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Transition<T> {
    pub applied: bool,
    pub record: T,
}

impl<T> Transition<T> {
    pub fn applied(record: T) -> Self {
        Self { applied: true, record }
    }

    pub fn replayed(record: T) -> Self {
        Self { applied: false, record }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Transition<U> {
        Transition {
            applied: self.applied,
            record: f(self.record),
        }
    }
}
