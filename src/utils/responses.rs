//! HTTP responses for denied requests
//!
//! Maps each [`AuthValidationError`] to its fixed status code and default
//! message. The mapping is part of the public contract: clients may rely on
//! the status, the `code` value and the default texts verbatim.

use actix_web::{http::header, http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::auth::AuthValidationError;

// ===============================
// CACHED RESPONSES FOR PERFORMANCE
// ===============================

/// Pre-serialized default bodies, computed once and never modified
static CACHED_RESPONSES: std::sync::LazyLock<CachedResponses> =
    std::sync::LazyLock::new(CachedResponses::new);

struct CachedResponses {
    no_session: String,
    invalid_token: String,
    expired_token: String,
    malformed_token: String,
    insufficient_permissions: String,
}

impl CachedResponses {
    fn new() -> Self {
        use AuthValidationError::{
            ExpiredToken, InsufficientPermissions, InvalidToken, MalformedToken, NoSession,
        };

        Self {
            no_session: create_json(NoSession, &NoSession.to_string()),
            invalid_token: create_json(InvalidToken, &InvalidToken.to_string()),
            expired_token: create_json(ExpiredToken, &ExpiredToken.to_string()),
            malformed_token: create_json(MalformedToken, &MalformedToken.to_string()),
            insufficient_permissions: create_json(
                InsufficientPermissions,
                &InsufficientPermissions.to_string(),
            ),
        }
    }

    fn body(&self, error: AuthValidationError) -> &str {
        match error {
            AuthValidationError::NoSession => &self.no_session,
            AuthValidationError::InvalidToken => &self.invalid_token,
            AuthValidationError::ExpiredToken => &self.expired_token,
            AuthValidationError::MalformedToken => &self.malformed_token,
            AuthValidationError::InsufficientPermissions => &self.insufficient_permissions,
        }
    }
}

fn create_json(error: AuthValidationError, message: &str) -> String {
    json!({
        "error": message,
        "code": error.code(),
    })
    .to_string()
}

/// JSON body of every denial response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthErrorBody {
    pub error: String,
    pub code: String,
}

/// Status code for a failure kind
#[must_use]
pub const fn auth_error_status(error: AuthValidationError) -> StatusCode {
    match error {
        AuthValidationError::NoSession
        | AuthValidationError::InvalidToken
        | AuthValidationError::ExpiredToken => StatusCode::UNAUTHORIZED,
        AuthValidationError::MalformedToken => StatusCode::BAD_REQUEST,
        AuthValidationError::InsufficientPermissions => StatusCode::FORBIDDEN,
    }
}

/// Build the denial response for `error`
///
/// `message` replaces the default text but never the status code, which is
/// derived from the failure kind alone.
#[must_use]
pub fn create_auth_error_response(
    error: AuthValidationError,
    message: Option<&str>,
) -> HttpResponse {
    let body = match message {
        Some(message) => create_json(error, message),
        None => CACHED_RESPONSES.body(error).to_string(),
    };

    HttpResponse::build(auth_error_status(error))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .body(body)
}
