// Error codes and error types shared by the billing and admin crates.
//
// Every denial a caller can surface falls into one of three classes (see
// `Denial`), each with its own user remedy. Data errors (unknown plan or
// status) are never recoverable UI states and map to 500.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable error codes returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthenticated,
    AdminAccessRequired,
    PermissionDenied,
    ActionNotAvailable,
    UnknownPlan,
    UnknownStatus,
    InvalidConfiguration,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::AdminAccessRequired => "ADMIN_ACCESS_REQUIRED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::ActionNotAvailable => "ACTION_NOT_AVAILABLE",
            Self::UnknownPlan => "UNKNOWN_PLAN",
            Self::UnknownStatus => "UNKNOWN_STATUS",
            Self::InvalidConfiguration => "INVALID_CONFIGURATION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Unauthenticated => "Authentication required",
            Self::AdminAccessRequired => "Admin access required",
            Self::PermissionDenied => "You are not allowed to perform this operation",
            Self::ActionNotAvailable => "This action is not available for the current subscription",
            Self::UnknownPlan => "Unknown subscription plan",
            Self::UnknownStatus => "Unknown subscription status",
            Self::InvalidConfiguration => "Invalid configuration",
        };
        write!(f, "{msg}")
    }
}

/// HTTP status codes used by the API error system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpStatus {
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    Conflict = 409,
    InternalServerError = 500,
}

impl HttpStatus {
    pub fn status_code(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status_code())
    }
}

/// API error carrying an HTTP status, an error code, and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status} {code}: {message}")]
pub struct ApiError {
    pub status: HttpStatus,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: HttpStatus, code: ErrorCode) -> Self {
        Self {
            message: code.to_string(),
            status,
            code,
        }
    }

    pub fn with_message(status: HttpStatus, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(code: ErrorCode) -> Self {
        Self::new(HttpStatus::Unauthorized, code)
    }

    pub fn forbidden(code: ErrorCode) -> Self {
        Self::new(HttpStatus::Forbidden, code)
    }

    /// Build a JSON body for the error response.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code,
            "message": self.message,
        })
    }
}

/// Why an operation was refused.
///
/// The three classes need different remedies from the user, so callers must
/// never collapse them into a generic failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// No session: the user has to sign in.
    NotAuthenticated,
    /// Signed in, but the role or grants do not allow the operation.
    NotAuthorized,
    /// Allowed in principle, but the subscription is not in a state that permits it.
    InvalidState { reason: String },
}

impl Denial {
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotAuthenticated => ErrorCode::Unauthenticated,
            Self::NotAuthorized => ErrorCode::PermissionDenied,
            Self::InvalidState { .. } => ErrorCode::ActionNotAvailable,
        }
    }

    /// What the user can do about it.
    pub fn remedy(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "Sign in to continue.",
            Self::NotAuthorized => "Contact an administrator to request access.",
            Self::InvalidState { .. } => {
                "Wait for billing to recover or change the subscription first."
            }
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState { reason } => write!(f, "{}: {}", self.code(), reason),
            other => write!(f, "{}", other.code()),
        }
    }
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::NotAuthenticated => ApiError::unauthorized(ErrorCode::Unauthenticated),
            Denial::NotAuthorized => ApiError::forbidden(ErrorCode::PermissionDenied),
            Denial::InvalidState { reason } => ApiError::with_message(
                HttpStatus::Conflict,
                ErrorCode::ActionNotAvailable,
                reason,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::AdminAccessRequired).unwrap();
        assert_eq!(json, "\"ADMIN_ACCESS_REQUIRED\"");
        assert_eq!(ErrorCode::AdminAccessRequired.as_str(), "ADMIN_ACCESS_REQUIRED");
    }

    #[test]
    fn test_api_error_json() {
        let err = ApiError::forbidden(ErrorCode::AdminAccessRequired);
        let body = err.to_json();
        assert_eq!(body["code"], "ADMIN_ACCESS_REQUIRED");
        assert_eq!(body["message"], "Admin access required");
        assert_eq!(err.status.status_code(), 403);
    }

    #[test]
    fn test_denials_map_to_distinct_statuses() {
        let unauthenticated: ApiError = Denial::NotAuthenticated.into();
        let unauthorized: ApiError = Denial::NotAuthorized.into();
        let invalid: ApiError = Denial::invalid_state("subscription is canceled").into();

        assert_eq!(unauthenticated.status, HttpStatus::Unauthorized);
        assert_eq!(unauthorized.status, HttpStatus::Forbidden);
        assert_eq!(invalid.status, HttpStatus::Conflict);
        assert_eq!(invalid.message, "subscription is canceled");
    }

    #[test]
    fn test_denial_remedies_differ() {
        let remedies = [
            Denial::NotAuthenticated.remedy(),
            Denial::NotAuthorized.remedy(),
            Denial::invalid_state("x").remedy(),
        ];
        assert_ne!(remedies[0], remedies[1]);
        assert_ne!(remedies[1], remedies[2]);
        assert_ne!(remedies[0], remedies[2]);
    }

    #[test]
    fn test_denial_display() {
        assert_eq!(Denial::NotAuthenticated.to_string(), "Authentication required");
        assert_eq!(
            Denial::invalid_state("already canceling").to_string(),
            "This action is not available for the current subscription: already canceling"
        );
    }
}
