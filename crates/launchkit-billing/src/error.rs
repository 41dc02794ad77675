//! Billing error codes.

use launchkit_core::{ApiError, ErrorCode, HttpStatus};

/// Data and configuration errors raised by the billing engine.
///
/// None of these are recoverable UI states: an unknown plan or status means the
/// upstream record is inconsistent and must not be rendered with a guess.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillingError {
    #[error("unknown plan id \"{0}\"")]
    UnknownPlan(String),

    #[error("unknown subscription status \"{0}\"")]
    UnknownStatus(String),

    #[error("plan catalog is empty")]
    EmptyCatalog,

    #[error("plan id \"{0}\" appears more than once in the catalog")]
    DuplicatePlan(String),

    #[error("invalid billing configuration: {0}")]
    InvalidConfig(String),
}

impl BillingError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownPlan(_) => ErrorCode::UnknownPlan,
            Self::UnknownStatus(_) => ErrorCode::UnknownStatus,
            Self::EmptyCatalog | Self::DuplicatePlan(_) | Self::InvalidConfig(_) => {
                ErrorCode::InvalidConfiguration
            }
        }
    }

    fn status(&self) -> HttpStatus {
        match self {
            Self::UnknownPlan(_) | Self::UnknownStatus(_) => HttpStatus::InternalServerError,
            Self::EmptyCatalog | Self::DuplicatePlan(_) | Self::InvalidConfig(_) => {
                HttpStatus::BadRequest
            }
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        ApiError::with_message(err.status(), err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_errors_are_internal() {
        let api: ApiError = BillingError::UnknownPlan("gold".into()).into();
        assert_eq!(api.status, HttpStatus::InternalServerError);
        assert_eq!(api.code, ErrorCode::UnknownPlan);
        assert!(api.message.contains("gold"));
    }

    #[test]
    fn test_config_errors_are_bad_request() {
        let api: ApiError = BillingError::EmptyCatalog.into();
        assert_eq!(api.status, HttpStatus::BadRequest);
        assert_eq!(api.code, ErrorCode::InvalidConfiguration);
    }
}
