#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Stateless authorization gate for actix-web handlers
//!
//! A request passes the gate when the [`models::Session`] attached to it
//! carries a user with a well-formed, unexpired bearer token and satisfies
//! the configured [`models::ValidationConfig`]. Protected handlers receive a
//! [`models::ValidatedSession`]; every other request is answered with a JSON
//! error and the handler never runs.

/// Version of the sessiongate crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod handlers;
pub mod models;
pub mod session;
pub mod settings;
pub mod utils;
pub mod validation;

// Test utilities for unit tests and, behind the `testing` feature, integration tests
#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use handlers::{with_auth, with_auth_using, Authenticated};
pub use models::auth::{AuthValidationError, ValidationResult};
pub use models::{Session, SessionUser, ValidatedSession, ValidationConfig};
pub use session::{validate_auth_session, SessionValidator};
pub use settings::GateSettings;
pub use utils::responses::create_auth_error_response;
