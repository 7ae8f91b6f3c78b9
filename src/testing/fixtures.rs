//! Test fixtures providing pre-built test objects

use crate::models::{Session, ValidationConfig};

use super::builders::{TestSessionBuilder, TestTokenBuilder};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// A fresh token that passes the payload checks
    #[must_use]
    pub fn valid_token() -> String {
        TestTokenBuilder::new().build()
    }

    /// A token that expired an hour ago
    #[must_use]
    pub fn expired_token() -> String {
        TestTokenBuilder::new().expires_in(-3600).build()
    }

    /// A session that passes the default policy
    #[must_use]
    pub fn valid_session() -> Session {
        TestSessionBuilder::new().build()
    }

    /// A complete session whose token has expired
    #[must_use]
    pub fn expired_session() -> Session {
        TestSessionBuilder::new()
            .with_token(&Self::expired_token())
            .build()
    }

    /// A session whose user carries no access token
    #[must_use]
    pub fn session_without_token() -> Session {
        TestSessionBuilder::new().without_token().build()
    }

    /// Default policy with failure logging turned on
    #[must_use]
    pub fn logging_config() -> ValidationConfig {
        ValidationConfig::default().log_errors(true)
    }
}
