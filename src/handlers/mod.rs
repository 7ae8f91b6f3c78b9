// HTTP-facing side of the gate
pub mod auth;
pub mod extractor;
pub mod health;
pub mod user;

// Re-export the main entry points
pub use auth::{with_auth, with_auth_using, AuthFuture};
pub use extractor::{AuthRejection, Authenticated};
pub use health::health;
pub use user::{current_user, whoami};
