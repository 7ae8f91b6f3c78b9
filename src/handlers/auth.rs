//! Authorization wrapper for actix handlers
//!
//! [`with_auth`] turns a handler that needs a [`ValidatedSession`] into a
//! plain `Fn(HttpRequest)` handler. Every call validates the [`Session`]
//! found in the request extensions first; the inner handler only runs when
//! validation succeeds.

use std::future::{self, Future};
use std::pin::Pin;
use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use log::debug;

use crate::models::auth::ValidationResult;
use crate::models::{Session, ValidatedSession, ValidationConfig};
use crate::session::SessionValidator;
use crate::utils::responses::create_auth_error_response;

/// Future returned by wrapped handlers
pub type AuthFuture = Pin<Box<dyn Future<Output = HttpResponse>>>;

/// Wrap `handler` with session validation using the default validator
///
/// `None` uses [`ValidationConfig::default`]. The config is shared read-only
/// by every clone of the returned handler.
///
/// ```ignore
/// App::new().route(
///     "/api/me",
///     web::get().to(with_auth(current_user, Some(ValidationConfig::default()))),
/// )
/// ```
pub fn with_auth<H, Fut>(
    handler: H,
    config: Option<ValidationConfig>,
) -> impl Fn(HttpRequest) -> AuthFuture + Clone + 'static
where
    H: Fn(ValidatedSession, HttpRequest) -> Fut + Clone + 'static,
    Fut: Future<Output = HttpResponse> + 'static,
{
    with_auth_using(handler, config, SessionValidator::default())
}

/// Same as [`with_auth`] with an explicit validator (custom logger or clock)
pub fn with_auth_using<H, Fut>(
    handler: H,
    config: Option<ValidationConfig>,
    validator: SessionValidator,
) -> impl Fn(HttpRequest) -> AuthFuture + Clone + 'static
where
    H: Fn(ValidatedSession, HttpRequest) -> Fut + Clone + 'static,
    Fut: Future<Output = HttpResponse> + 'static,
{
    let config = Arc::new(config.unwrap_or_default());

    move |req: HttpRequest| -> AuthFuture {
        let result = {
            let extensions = req.extensions();
            validator.validate(extensions.get::<Session>(), &config)
        };

        match result {
            ValidationResult::Success(session) => Box::pin(handler(session, req)),
            ValidationResult::Failure { error, message } => {
                debug!("Rejecting {} {}: {}", req.method(), req.path(), error.code());
                Box::pin(future::ready(create_auth_error_response(
                    error,
                    message.as_deref(),
                )))
            }
        }
    }
}
