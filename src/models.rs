use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub mod auth;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Session handed over by the upstream session layer
///
/// The gate never builds or mutates this itself outside of the bearer session
/// layer; it only reads it. Every field is optional so that partially
/// populated sessions can be detected instead of crashing.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    #[serde(default)]
    pub user: Option<SessionUser>,
}

/// User portion of a [`Session`]
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Session {
    #[must_use]
    pub fn with_user(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }
}

impl SessionUser {
    #[must_use]
    pub fn new(id: &str, email: &str, access_token: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            email: Some(email.to_string()),
            access_token: Some(access_token.to_string()),
        }
    }
}

/// Per-call-site policy for the gate
///
/// Constructed once (often as a shared constant) and only ever read, so a
/// single instance may back any number of concurrent validations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Reject sessions without an email (default: true)
    #[serde(default = "default_true")]
    pub require_email: bool,

    /// Reject sessions without a user id (default: true)
    #[serde(default = "default_true")]
    pub require_user_id: bool,

    /// Log a diagnostic line at the point of failure (default: false)
    #[serde(default)]
    pub log_errors: bool,

    /// Scopes that must all be present in the token's `scope` claim
    #[serde(default)]
    pub custom_scopes: Vec<String>,

    /// Audience the token must name when it carries an `aud` claim
    #[serde(default)]
    pub expected_audience: Option<String>,
}

// Helper function for serde defaults
fn default_true() -> bool {
    true
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_email: true,
            require_user_id: true,
            log_errors: false,
            custom_scopes: Vec::new(),
            expected_audience: None,
        }
    }
}

impl ValidationConfig {
    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_expected_audience(mut self, audience: &str) -> Self {
        self.expected_audience = Some(audience.to_string());
        self
    }

    #[must_use]
    pub fn require_email(mut self, required: bool) -> Self {
        self.require_email = required;
        self
    }

    #[must_use]
    pub fn require_user_id(mut self, required: bool) -> Self {
        self.require_user_id = required;
        self
    }

    #[must_use]
    pub fn log_errors(mut self, enabled: bool) -> Self {
        self.log_errors = enabled;
        self
    }
}

/// A session that passed every stage of the gate
///
/// All three fields are guaranteed to be non-empty. Instances can only be
/// created inside this crate, so a handler that receives one may use the
/// fields without further checks.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedSession {
    id: String,
    email: String,
    access_token: String,
}

impl ValidatedSession {
    /// Returns `None` if any of the fields is empty or whitespace only
    pub(crate) fn new(id: &str, email: &str, access_token: &str) -> Option<Self> {
        if [id, email, access_token]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            email: email.to_string(),
            access_token: access_token.to_string(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

/// Decoded middle segment of a bearer token
///
/// `iat` and `exp` are NumericDate values and may carry a fractional part.
/// A numeric `sub` is kept in its decimal string form.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TokenPayload {
    #[serde(deserialize_with = "deserialize_subject")]
    pub sub: String,
    pub iat: f64,
    pub exp: f64,
    /// Audience (can be string or array)
    #[serde(default)]
    pub aud: Option<Value>,
    /// Space-delimited scope string
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// String or numeric claim as a string
pub(crate) fn subject_from_claim(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn deserialize_subject<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    subject_from_claim(&value)
        .ok_or_else(|| de::Error::custom(format!("invalid type for 'sub' claim: {value}")))
}

impl TokenPayload {
    /// Iterate over the individual scopes of the `scope` claim
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.as_deref().unwrap_or("").split_whitespace()
    }

    /// Check that every required scope is granted by this token
    #[must_use]
    pub fn has_scopes<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required
            .iter()
            .all(|wanted| self.scopes().any(|granted| granted == wanted.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_with_scope(scope: Option<&str>) -> TokenPayload {
        TokenPayload {
            sub: "1".to_string(),
            iat: 0.0,
            exp: 0.0,
            aud: None,
            scope: scope.map(ToString::to_string),
            email: None,
        }
    }

    #[test]
    fn test_validated_session_rejects_empty_fields() {
        assert!(ValidatedSession::new("1", "a@b.com", "t.t.t").is_some());
        assert!(ValidatedSession::new("", "a@b.com", "t.t.t").is_none());
        assert!(ValidatedSession::new("1", "  ", "t.t.t").is_none());
        assert!(ValidatedSession::new("1", "a@b.com", "").is_none());
    }

    #[test]
    fn test_session_deserializes_camel_case() {
        let session: Session = serde_json::from_value(json!({
            "user": {"id": "1", "email": "a@b.com", "accessToken": "x.y.z"}
        }))
        .unwrap();

        assert_eq!(
            session,
            Session::with_user(SessionUser::new("1", "a@b.com", "x.y.z"))
        );

        let empty: Session = serde_json::from_value(json!({})).unwrap();
        assert!(empty.user.is_none());
    }

    #[test]
    fn test_validation_config_defaults() {
        let config = ValidationConfig::default();
        assert!(config.require_email);
        assert!(config.require_user_id);
        assert!(!config.log_errors);
        assert!(config.custom_scopes.is_empty());
        assert!(config.expected_audience.is_none());

        // Missing fields fall back to the same defaults when deserialized
        let parsed: ValidationConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(parsed, config);

        let scoped = ValidationConfig::default()
            .with_scopes(["read:x", "write:x"])
            .require_email(false);
        assert_eq!(scoped.custom_scopes, vec!["read:x", "write:x"]);
        assert!(!scoped.require_email);
    }

    #[test]
    fn test_has_scopes() {
        let payload = payload_with_scope(Some("read:y  write:z"));
        assert!(payload.has_scopes(&["read:y"]));
        assert!(payload.has_scopes(&["write:z", "read:y"]));
        assert!(!payload.has_scopes(&["read:x"]));
        assert!(payload.has_scopes::<&str>(&[]));

        // Scopes match whole words only
        assert!(!payload.has_scopes(&["read"]));

        let unscoped = payload_with_scope(None);
        assert!(!unscoped.has_scopes(&["read:y"]));
        assert!(unscoped.has_scopes::<String>(&[]));
    }
}
