//! Claim checks on the decoded payload of a bearer token
//!
//! The payload must carry `sub`, `iat` and `exp`, must not be expired and,
//! when an expected audience is configured and the token names one, must be
//! addressed to it.

use std::fmt;

use chrono::Utc;
use log::debug;

use super::core::{decode_and_parse_jwt_part, extract_audiences_from_claim, split_token};
use crate::models::TokenPayload;

/// Reason a payload was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadRejection {
    /// Token does not have three non-empty segments
    Structure,
    /// Middle segment is not base64url or not a JSON object with the required claims
    Undecodable(String),
    EmptySubject,
    Expired {
        exp: f64,
        now: i64,
    },
    AudienceMismatch {
        expected: String,
        actual: Vec<String>,
    },
}

impl fmt::Display for PayloadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure => write!(f, "Invalid token format"),
            Self::Undecodable(msg) => write!(f, "{msg}"),
            Self::EmptySubject => write!(f, "Empty 'sub' claim"),
            Self::Expired { exp, now } => write!(f, "Token expired at {exp} (now {now})"),
            Self::AudienceMismatch { expected, actual } => write!(
                f,
                "Claim 'aud' validation failed: expected '{expected}', got '{actual:?}'"
            ),
        }
    }
}

impl std::error::Error for PayloadRejection {}

/// Outcome of [`validate_token_payload`]
///
/// `payload` is present exactly when `valid` is true.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadCheck {
    pub valid: bool,
    pub payload: Option<TokenPayload>,
}

impl From<Result<TokenPayload, PayloadRejection>> for PayloadCheck {
    fn from(result: Result<TokenPayload, PayloadRejection>) -> Self {
        match result {
            Ok(payload) => Self {
                valid: true,
                payload: Some(payload),
            },
            Err(_) => Self {
                valid: false,
                payload: None,
            },
        }
    }
}

/// Validate the payload of `token` against the current system time
#[must_use]
pub fn validate_token_payload(token: &str, expected_audience: Option<&str>) -> PayloadCheck {
    validate_token_payload_at(token, expected_audience, Utc::now().timestamp())
}

/// Validate the payload of `token` against an explicit clock reading
///
/// `now` is in seconds since the Unix epoch.
#[must_use]
pub fn validate_token_payload_at(
    token: &str,
    expected_audience: Option<&str>,
    now: i64,
) -> PayloadCheck {
    let result = check_token_payload(token, expected_audience, now);
    if let Err(reason) = &result {
        debug!("Token payload rejected: {reason}");
    }
    result.into()
}

/// Validate the payload and report why it was rejected
///
/// A token whose `exp` equals `now` is still accepted; only `exp < now`
/// counts as expired.
///
/// # Errors
///
/// Returns a [`PayloadRejection`] describing the first failed check.
pub fn check_token_payload(
    token: &str,
    expected_audience: Option<&str>,
    now: i64,
) -> Result<TokenPayload, PayloadRejection> {
    let [_, payload_b64, _] = split_token(token).ok_or(PayloadRejection::Structure)?;

    let payload: TokenPayload = decode_and_parse_jwt_part(payload_b64, "payload")
        .map_err(PayloadRejection::Undecodable)?;

    if payload.sub.trim().is_empty() {
        return Err(PayloadRejection::EmptySubject);
    }

    if payload.exp < seconds_as_numeric_date(now) {
        return Err(PayloadRejection::Expired {
            exp: payload.exp,
            now,
        });
    }

    if let (Some(aud_claim), Some(expected)) = (&payload.aud, expected_audience) {
        let audiences = extract_audiences_from_claim(aud_claim);
        if !audiences.iter().any(|aud| aud == expected) {
            return Err(PayloadRejection::AudienceMismatch {
                expected: expected.to_string(),
                actual: audiences,
            });
        }
    }

    Ok(payload)
}

#[allow(clippy::cast_precision_loss)]
fn seconds_as_numeric_date(seconds: i64) -> f64 {
    seconds as f64
}
