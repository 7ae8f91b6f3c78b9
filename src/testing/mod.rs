//! Testing utilities for the session gate
//!
//! Available to unit tests and, behind the `testing` feature, to the
//! integration tests under `tests/`.
//!
//! ## Organization
//!
//! - [`fixtures`] - Pre-built sessions and tokens
//! - [`builders`] - Fluent builders for tokens and sessions
//! - [`requests`] - Request builders carrying a session or bearer header
//! - [`assertions`] - Assertion helpers for results and responses
//! - [`mock`] - Recording logger, fixed clock and deliberately failing seams
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sessiongate::testing::{TestSessionBuilder, TestTokenBuilder};
//!
//! let token = TestTokenBuilder::new().with_scope("read:x").build();
//! let session = TestSessionBuilder::new().with_token(&token).build();
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod mock;
pub mod requests;

// Re-export commonly used items for convenience
pub use assertions::*;
pub use builders::*;
pub use fixtures::TestFixtures;
pub use requests::RequestBuilder;

/// Common test constants
pub mod constants {
    /// Default test user id
    pub const TEST_USER_ID: &str = "user-123";

    /// Default test email address
    pub const TEST_EMAIL: &str = "test@example.com";

    /// Test JWT signing key for HMAC (256 bits)
    pub const TEST_JWT_KEY: &[u8] = b"test_key_32_bytes_long_for_test_";

    /// Lifetime of freshly built test tokens, in seconds
    pub const TEST_TOKEN_LIFETIME: i64 = 3600;
}
