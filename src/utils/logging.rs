// Logging seam for the gate's failure diagnostics
use log::warn;
use sha2::{Digest, Sha256};

use crate::models::auth::AuthValidationError;

/// One denied validation, as handed to an [`AuthLogger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    /// Pipeline stage that denied the request (e.g. `"token_structure"`)
    pub stage: &'static str,
    pub error: AuthValidationError,
    /// Internal reason; may be more specific than the client-facing message
    pub reason: String,
    /// Short fingerprint of the presented token, never the token itself
    pub token_fingerprint: Option<String>,
}

/// Sink for failure diagnostics
///
/// Only called when `log_errors` is enabled. Implementations must not affect
/// the validation outcome.
pub trait AuthLogger: Send + Sync {
    fn log_failure(&self, failure: &AuthFailure);
}

/// Forwards failures to the `log` facade at warn level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAuthLogger;

impl AuthLogger for LogAuthLogger {
    fn log_failure(&self, failure: &AuthFailure) {
        warn!(
            "Authentication denied at {} ({}): {} [token={}]",
            failure.stage,
            failure.error.code(),
            failure.reason,
            failure.token_fingerprint.as_deref().unwrap_or("none")
        );
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuthLogger;

impl AuthLogger for NoopAuthLogger {
    fn log_failure(&self, _failure: &AuthFailure) {}
}

/// First 12 hex characters of the SHA-256 of a token
///
/// Enough to correlate log lines for the same token without making the
/// token recoverable from logs.
#[must_use]
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let hex = format!("{digest:x}");
    hex[..12].to_string()
}
