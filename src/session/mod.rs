//! Session Module
//!
//! This module runs the session side of the gate: turning whatever session the
//! upstream layer attached to a request into a [`ValidationResult`].
//!
//! # Modules
//!
//! - [`validation`] - The staged validation pipeline and [`SessionValidator`]
//! - [`bearer`] - Session layer that derives a session from a bearer header
//! - [`clock`] - Clock abstraction used for expiry checks
//!
//! [`ValidationResult`]: crate::models::auth::ValidationResult

pub mod bearer;
pub mod clock;
pub mod validation;

// Re-export commonly used items for convenience
pub use bearer::{attach_bearer_session, extract_bearer_token, session_from_authorization};
pub use clock::{Clock, SystemClock};
pub use validation::{validate_auth_session, SessionValidator, VALIDATION_FAILED_MESSAGE};
