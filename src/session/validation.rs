//! Session validation pipeline
//!
//! Runs every gate stage in order against the session attached to the current
//! request and produces a single [`ValidationResult`]. Each stage either hands
//! over to the next one or ends the run with one of the five
//! [`AuthValidationError`] kinds.
//!
//! | Stage | Check                                   | Failure                   |
//! |-------|-----------------------------------------|---------------------------|
//! | 1     | session exists                          | `NoSession`               |
//! | 2     | session has a user                      | `InvalidToken`            |
//! | 3     | user has a non-empty access token       | `InvalidToken`            |
//! | 4     | token has a valid structure             | `MalformedToken`          |
//! | 5     | token payload is valid and unexpired    | `ExpiredToken`            |
//! | 6     | user id present (if required)           | `InvalidToken`            |
//! | 7     | email present (if required)             | `InvalidToken`            |
//! | 8     | all custom scopes granted               | `InsufficientPermissions` |

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::debug;

use super::clock::{Clock, SystemClock};
use crate::models::auth::{AuthValidationError, ValidationResult};
use crate::models::{Session, ValidatedSession, ValidationConfig};
use crate::utils::logging::{token_fingerprint, AuthFailure, AuthLogger, LogAuthLogger};
use crate::validation::{check_token_payload, is_valid_jwt_structure};

/// Message returned when a stage fails unexpectedly
pub const VALIDATION_FAILED_MESSAGE: &str = "Authentication validation failed";

/// A stage's decision to deny the request
struct Denial<'a> {
    stage: &'static str,
    error: AuthValidationError,
    message: Option<String>,
    reason: String,
    token: Option<&'a str>,
}

impl<'a> Denial<'a> {
    fn new(stage: &'static str, error: AuthValidationError, reason: impl Into<String>) -> Self {
        Self {
            stage,
            error,
            message: None,
            reason: reason.into(),
            token: None,
        }
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn for_token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }
}

/// Validates sessions using an injected logger and clock
///
/// Holds no per-request state, so one instance can be shared across
/// threads and reused for every request.
#[derive(Clone)]
pub struct SessionValidator {
    logger: Arc<dyn AuthLogger>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for SessionValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionValidator").finish_non_exhaustive()
    }
}

impl Default for SessionValidator {
    fn default() -> Self {
        Self::new(Arc::new(LogAuthLogger), Arc::new(SystemClock))
    }
}

impl SessionValidator {
    #[must_use]
    pub fn new(logger: Arc<dyn AuthLogger>, clock: Arc<dyn Clock>) -> Self {
        Self { logger, clock }
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn AuthLogger>) -> Self {
        self.logger = logger;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run the full pipeline against `session`
    ///
    /// Never panics: a panic inside any stage is caught and reported as
    /// `InvalidToken` with [`VALIDATION_FAILED_MESSAGE`].
    #[must_use]
    pub fn validate(&self, session: Option<&Session>, config: &ValidationConfig) -> ValidationResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_stages(session, config)));

        let denial = match outcome {
            Ok(Ok(validated)) => return ValidationResult::Success(validated),
            Ok(Err(denial)) => denial,
            Err(_) => Denial::new(
                "internal",
                AuthValidationError::InvalidToken,
                "panic raised during validation",
            )
            .with_message(VALIDATION_FAILED_MESSAGE),
        };

        if config.log_errors {
            self.report(&denial);
        }

        ValidationResult::Failure {
            error: denial.error,
            message: denial.message,
        }
    }

    fn run_stages<'a>(
        &self,
        session: Option<&'a Session>,
        config: &ValidationConfig,
    ) -> Result<ValidatedSession, Denial<'a>> {
        use AuthValidationError::{
            ExpiredToken, InsufficientPermissions, InvalidToken, MalformedToken, NoSession,
        };

        let session = session.ok_or_else(|| Denial::new("session", NoSession, "No session found"))?;

        let user = session.user.as_ref().ok_or_else(|| {
            Denial::new("user", InvalidToken, "Session has no user")
                .with_message("No user in session")
        })?;

        let token = non_empty(user.access_token.as_deref()).ok_or_else(|| {
            Denial::new("access_token", InvalidToken, "Session user has no access token")
                .with_message("No access token in session")
        })?;

        if !is_valid_jwt_structure(token) {
            return Err(
                Denial::new("token_structure", MalformedToken, "Invalid token structure")
                    .for_token(token),
            );
        }

        let payload = check_token_payload(token, config.expected_audience.as_deref(), self.clock.now())
            .map_err(|rejection| {
                Denial::new("token_payload", ExpiredToken, rejection.to_string())
                    .with_message("Token expired or invalid")
                    .for_token(token)
            })?;

        let id = match non_empty(user.id.as_deref()) {
            Some(id) => id,
            None if config.require_user_id => {
                return Err(Denial::new("user_id", InvalidToken, "Session user has no id")
                    .with_message("User ID not found in session")
                    .for_token(token));
            }
            None => payload.sub.as_str(),
        };

        let email = match non_empty(user.email.as_deref()) {
            Some(email) => email,
            None if config.require_email => {
                return Err(Denial::new("user_email", InvalidToken, "Session user has no email")
                    .with_message("User email not found in session")
                    .for_token(token));
            }
            None => non_empty(payload.email.as_deref()).ok_or_else(|| {
                Denial::new(
                    "user_email",
                    InvalidToken,
                    "No email in session or token while email is optional",
                )
                .with_message("User email not found in session")
                .for_token(token)
            })?,
        };

        if !payload.has_scopes(&config.custom_scopes) {
            let missing: Vec<&str> = config
                .custom_scopes
                .iter()
                .map(String::as_str)
                .filter(|wanted| !payload.scopes().any(|granted| granted == *wanted))
                .collect();
            return Err(Denial::new(
                "scopes",
                InsufficientPermissions,
                format!("Missing required scopes: {}", missing.join(", ")),
            )
            .for_token(token));
        }

        debug!("Session validated for user {id}");

        ValidatedSession::new(id, email, token).ok_or_else(|| {
            Denial::new("validated_session", InvalidToken, "Validated session field was empty")
                .for_token(token)
        })
    }

    fn report(&self, denial: &Denial<'_>) {
        let failure = AuthFailure {
            stage: denial.stage,
            error: denial.error,
            reason: denial.reason.clone(),
            token_fingerprint: denial.token.map(token_fingerprint),
        };

        // A misbehaving logger must not change the outcome
        let _ = panic::catch_unwind(AssertUnwindSafe(|| self.logger.log_failure(&failure)));
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validate `session` with the default logger and the system clock
#[must_use]
pub fn validate_auth_session(session: Option<&Session>, config: &ValidationConfig) -> ValidationResult {
    SessionValidator::default().validate(session, config)
}
