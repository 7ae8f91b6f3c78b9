//! Gate outcome types
//!
//! This module defines the closed failure taxonomy of the gate and the result
//! type produced by every validation run.

use serde::Serialize;
use thiserror::Error;

use super::ValidatedSession;

/// Every reason the gate can deny a request
///
/// The set is closed: all internal failures (decode errors, JSON errors,
/// missing fields, panics) are folded into one of these kinds. The `Display`
/// text is the default client-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthValidationError {
    #[error("Authentication required")]
    NoSession,
    #[error("Invalid authentication token")]
    InvalidToken,
    #[error("Authentication token expired")]
    ExpiredToken,
    #[error("Malformed authentication token")]
    MalformedToken,
    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

impl AuthValidationError {
    /// All failure kinds, in pipeline order
    pub const ALL: [Self; 5] = [
        Self::NoSession,
        Self::InvalidToken,
        Self::ExpiredToken,
        Self::MalformedToken,
        Self::InsufficientPermissions,
    ];

    /// Stable wire code carried in the `code` field of error bodies
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NoSession => "NO_SESSION",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::ExpiredToken => "EXPIRED_TOKEN",
            Self::MalformedToken => "MALFORMED_TOKEN",
            Self::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
        }
    }
}

/// Outcome of one validation run
///
/// Built fresh for each request and never cached, since expiry has to be
/// checked against the clock every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Success(ValidatedSession),
    Failure {
        error: AuthValidationError,
        message: Option<String>,
    },
}

impl ValidationResult {
    #[must_use]
    pub fn failure(error: AuthValidationError) -> Self {
        Self::Failure {
            error,
            message: None,
        }
    }

    #[must_use]
    pub fn failure_with_message(error: AuthValidationError, message: impl Into<String>) -> Self {
        Self::Failure {
            error,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn session(&self) -> Option<&ValidatedSession> {
        match self {
            Self::Success(session) => Some(session),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<AuthValidationError> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error, .. } => Some(*error),
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { message, .. } => message.as_deref(),
        }
    }

    /// Convert into a plain `Result`, keeping the optional message
    ///
    /// # Errors
    ///
    /// Returns the failure kind and message if validation did not succeed.
    pub fn into_result(self) -> Result<ValidatedSession, (AuthValidationError, Option<String>)> {
        match self {
            Self::Success(session) => Ok(session),
            Self::Failure { error, message } => Err((error, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_default_messages() {
        let table = [
            (AuthValidationError::NoSession, "NO_SESSION", "Authentication required"),
            (AuthValidationError::InvalidToken, "INVALID_TOKEN", "Invalid authentication token"),
            (AuthValidationError::ExpiredToken, "EXPIRED_TOKEN", "Authentication token expired"),
            (
                AuthValidationError::MalformedToken,
                "MALFORMED_TOKEN",
                "Malformed authentication token",
            ),
            (
                AuthValidationError::InsufficientPermissions,
                "INSUFFICIENT_PERMISSIONS",
                "Insufficient permissions",
            ),
        ];

        for (error, code, message) in table {
            assert_eq!(error.code(), code);
            assert_eq!(error.to_string(), message);
            assert_eq!(serde_json::to_value(error).unwrap(), code);
        }
    }

    #[test]
    fn test_failure_accessors() {
        let result = ValidationResult::failure_with_message(
            AuthValidationError::ExpiredToken,
            "Token expired or invalid",
        );

        assert!(!result.is_success());
        assert!(result.session().is_none());
        assert_eq!(result.error(), Some(AuthValidationError::ExpiredToken));
        assert_eq!(result.message(), Some("Token expired or invalid"));

        let bare = ValidationResult::failure(AuthValidationError::NoSession);
        assert_eq!(bare.message(), None);
        assert_eq!(
            bare.into_result().unwrap_err(),
            (AuthValidationError::NoSession, None)
        );
    }
}
