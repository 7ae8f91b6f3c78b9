pub mod logging;
pub mod responses;

pub use logging::{token_fingerprint, AuthFailure, AuthLogger, LogAuthLogger, NoopAuthLogger};
pub use responses::{auth_error_status, create_auth_error_response, AuthErrorBody};
