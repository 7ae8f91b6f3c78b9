// Extractor form of the authorization gate
use std::future::{ready, Ready};

use actix_web::{dev::Payload, web, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError};
use actix_web::http::StatusCode;
use thiserror::Error;

use crate::models::auth::{AuthValidationError, ValidationResult};
use crate::models::{Session, ValidatedSession, ValidationConfig};
use crate::session::SessionValidator;
use crate::utils::responses::{auth_error_status, create_auth_error_response};

/// A request whose session passed validation
///
/// Reads `web::Data<ValidationConfig>` and `web::Data<SessionValidator>` from
/// the app data, falling back to the defaults when either is missing.
///
/// ```ignore
/// async fn profile(Authenticated(session): Authenticated) -> HttpResponse {
///     HttpResponse::Ok().body(session.email().to_string())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Authenticated(pub ValidatedSession);

impl Authenticated {
    #[must_use]
    pub fn into_inner(self) -> ValidatedSession {
        self.0
    }
}

/// Rejection produced by [`Authenticated`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct AuthRejection {
    pub error: AuthValidationError,
    pub message: Option<String>,
}

impl ResponseError for AuthRejection {
    fn status_code(&self) -> StatusCode {
        auth_error_status(self.error)
    }

    fn error_response(&self) -> HttpResponse {
        create_auth_error_response(self.error, self.message.as_deref())
    }
}

impl FromRequest for Authenticated {
    type Error = AuthRejection;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let fallback_config = ValidationConfig::default();
        let config = req
            .app_data::<web::Data<ValidationConfig>>()
            .map_or(&fallback_config, |data| data.get_ref());

        let result = {
            let extensions = req.extensions();
            let session = extensions.get::<Session>();
            match req.app_data::<web::Data<SessionValidator>>() {
                Some(validator) => validator.validate(session, config),
                None => SessionValidator::default().validate(session, config),
            }
        };

        ready(match result {
            ValidationResult::Success(session) => Ok(Self(session)),
            ValidationResult::Failure { error, message } => Err(AuthRejection { error, message }),
        })
    }
}
