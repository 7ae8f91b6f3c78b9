//! Fluent builders for creating customizable test objects

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::{json, Map, Value};
use sha2::Sha256;

use crate::models::{Session, SessionUser};

use super::constants::{TEST_EMAIL, TEST_JWT_KEY, TEST_TOKEN_LIFETIME, TEST_USER_ID};

/// Builder for compact HS256 tokens
///
/// Defaults to `sub = DEFAULT_SUBJECT`, issued now and valid for an hour,
/// without `aud`, `scope` or `email` claims.
#[derive(Debug, Clone)]
pub struct TestTokenBuilder {
    claims: Map<String, Value>,
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTokenBuilder {
    /// Subject of tokens built without [`Self::with_subject`]
    pub const DEFAULT_SUBJECT: &'static str = "subject-123";

    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now().timestamp();
        let mut claims = Map::new();
        claims.insert("sub".to_string(), json!(Self::DEFAULT_SUBJECT));
        claims.insert("iat".to_string(), json!(now));
        claims.insert("exp".to_string(), json!(now + TEST_TOKEN_LIFETIME));
        Self { claims }
    }

    #[must_use]
    pub fn with_subject(self, subject: &str) -> Self {
        self.with_claim("sub", json!(subject))
    }

    #[must_use]
    pub fn issued_at(self, iat: i64) -> Self {
        self.with_claim("iat", json!(iat))
    }

    #[must_use]
    pub fn expires_at(self, exp: i64) -> Self {
        self.with_claim("exp", json!(exp))
    }

    /// Expiry relative to the current time; negative values build expired tokens
    #[must_use]
    pub fn expires_in(self, seconds: i64) -> Self {
        let exp = Utc::now().timestamp() + seconds;
        self.expires_at(exp)
    }

    #[must_use]
    pub fn with_email(self, email: &str) -> Self {
        self.with_claim("email", json!(email))
    }

    /// Space separated scope claim
    #[must_use]
    pub fn with_scope(self, scope: &str) -> Self {
        self.with_claim("scope", json!(scope))
    }

    /// A single audience is written as a string, several as an array
    #[must_use]
    pub fn with_audience(self, audiences: &[&str]) -> Self {
        let aud = match audiences {
            [single] => json!(single),
            many => json!(many),
        };
        self.with_claim("aud", aud)
    }

    #[must_use]
    pub fn with_claim(mut self, name: &str, value: Value) -> Self {
        self.claims.insert(name.to_string(), value);
        self
    }

    #[must_use]
    pub fn without_claim(mut self, name: &str) -> Self {
        self.claims.remove(name);
        self
    }

    /// Encode and sign the token
    ///
    /// # Panics
    ///
    /// Panics if the claims cannot be serialized.
    #[must_use]
    pub fn build(self) -> String {
        let payload = serde_json::to_vec(&Value::Object(self.claims)).unwrap();
        Self::token_with_raw_payload(&payload)
    }

    /// Sign a token around an arbitrary payload segment
    ///
    /// # Panics
    ///
    /// Panics if the HMAC key is rejected.
    #[must_use]
    pub fn token_with_raw_payload(payload: &[u8]) -> String {
        let header = json!({"alg": "HS256", "typ": "JWT"}).to_string();
        let message = format!(
            "{}.{}",
            general_purpose::URL_SAFE_NO_PAD.encode(header.as_bytes()),
            general_purpose::URL_SAFE_NO_PAD.encode(payload)
        );

        let mut mac = Hmac::<Sha256>::new_from_slice(TEST_JWT_KEY).unwrap();
        mac.update(message.as_bytes());
        let signature = mac.finalize().into_bytes();

        format!(
            "{message}.{}",
            general_purpose::URL_SAFE_NO_PAD.encode(signature)
        )
    }
}

/// Builder for sessions as an upstream session layer would attach them
///
/// The default session is valid under the default policy: it carries an id,
/// an email and a fresh token from [`TestTokenBuilder`].
#[derive(Debug, Clone)]
pub struct TestSessionBuilder {
    id: Option<String>,
    email: Option<String>,
    access_token: Option<String>,
}

impl Default for TestSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSessionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Some(TEST_USER_ID.to_string()),
            email: Some(TEST_EMAIL.to_string()),
            access_token: Some(TestTokenBuilder::new().build()),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    #[must_use]
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    #[must_use]
    pub fn without_email(mut self) -> Self {
        self.email = None;
        self
    }

    #[must_use]
    pub fn without_token(mut self) -> Self {
        self.access_token = None;
        self
    }

    #[must_use]
    pub fn build(self) -> Session {
        Session::with_user(SessionUser {
            id: self.id,
            email: self.email,
            access_token: self.access_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenPayload;
    use crate::validation::decode_and_parse_jwt_part;

    #[test]
    fn test_token_builder_claims() {
        let token = TestTokenBuilder::new()
            .with_scope("read:x")
            .with_audience(&["a", "b"])
            .build();

        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 3);

        let payload: TokenPayload = decode_and_parse_jwt_part(segments[1], "payload").unwrap();
        assert_eq!(payload.sub, TestTokenBuilder::DEFAULT_SUBJECT);
        assert_eq!(payload.exp - payload.iat, TEST_TOKEN_LIFETIME as f64);
        assert_eq!(payload.scope.as_deref(), Some("read:x"));
        assert_eq!(payload.aud, Some(json!(["a", "b"])));
    }

    #[test]
    fn test_session_builder_defaults() {
        let user = TestSessionBuilder::new().without_email().build().user.unwrap();
        assert_eq!(user.id.as_deref(), Some(TEST_USER_ID));
        assert!(user.email.is_none());
        assert!(user.access_token.is_some());
    }
}
