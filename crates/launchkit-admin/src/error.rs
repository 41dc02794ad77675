//! Authorization errors.

use launchkit_core::{ApiError, Denial, ErrorCode, HttpStatus};

/// Why an admin operation was refused.
///
/// `Unauthenticated` and the other variants must stay distinct: the first asks
/// the user to sign in, the others deny access outright.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("admin access required")]
    AdminAccessRequired { role: Option<String> },

    #[error("{message}")]
    PermissionDenied { message: String },

    #[error("invalid role \"{0}\"")]
    InvalidRole(String),
}

impl AuthError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthenticated => ErrorCode::Unauthenticated,
            Self::AdminAccessRequired { .. } => ErrorCode::AdminAccessRequired,
            Self::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            Self::InvalidRole(_) => ErrorCode::InvalidConfiguration,
        }
    }

    pub fn status(&self) -> HttpStatus {
        match self {
            Self::Unauthenticated => HttpStatus::Unauthorized,
            Self::AdminAccessRequired { .. } | Self::PermissionDenied { .. } => {
                HttpStatus::Forbidden
            }
            Self::InvalidRole(_) => HttpStatus::BadRequest,
        }
    }

    /// The denial class shown to the user, if this is a denial at all.
    pub fn denial(&self) -> Option<Denial> {
        match self {
            Self::Unauthenticated => Some(Denial::NotAuthenticated),
            Self::AdminAccessRequired { .. } | Self::PermissionDenied { .. } => {
                Some(Denial::NotAuthorized)
            }
            Self::InvalidRole(_) => None,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::Unauthenticated | AuthError::AdminAccessRequired { .. } => {
                ApiError::new(err.status(), err.code())
            }
            _ => ApiError::with_message(err.status(), err.code(), err.to_string()),
        }
    }
}
