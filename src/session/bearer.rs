//! Bearer session layer
//!
//! Builds a [`Session`] from an `Authorization: Bearer <token>` header and
//! places it into the request extensions, for deployments where no other
//! session layer runs in front of the gate. A session already present in the
//! extensions always wins.
//!
//! The user id and email are read from the token's `sub` and `email` claims
//! without any checks; the gate validates the result like any other session.

use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    middleware::Next,
    Error, HttpMessage,
};
use serde::Deserialize;

use crate::models::{subject_from_claim, Session, SessionUser};
use crate::validation::decode_and_parse_jwt_part;

#[derive(Debug, Default, Deserialize)]
struct IdentityClaims {
    #[serde(default)]
    sub: Option<serde_json::Value>,
    #[serde(default)]
    email: Option<String>,
}

/// Extract the token from an `Authorization` header value
///
/// The scheme is matched case-insensitively. Returns `None` for other
/// schemes or an empty token.
#[must_use]
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Build a session around `token`, taking identity from its claims when readable
#[must_use]
pub fn session_from_bearer_token(token: &str) -> Session {
    let identity = token
        .split('.')
        .nth(1)
        .and_then(|payload| decode_and_parse_jwt_part::<IdentityClaims>(payload, "payload").ok())
        .unwrap_or_default();

    Session::with_user(SessionUser {
        id: identity.sub.as_ref().and_then(subject_from_claim),
        email: identity.email,
        access_token: Some(token.to_string()),
    })
}

/// Build a session from an optional `Authorization` header value
#[must_use]
pub fn session_from_authorization(header_value: Option<&str>) -> Option<Session> {
    header_value
        .and_then(extract_bearer_token)
        .map(session_from_bearer_token)
}

/// Middleware attaching a bearer-derived [`Session`] to the request
///
/// Use with `actix_web::middleware::from_fn(attach_bearer_session)`.
///
/// # Errors
///
/// Only propagates errors from the inner service.
pub async fn attach_bearer_session(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let has_session = req.extensions().get::<Session>().is_some();

    if !has_session {
        let session = session_from_authorization(
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok()),
        );

        if let Some(session) = session {
            req.extensions_mut().insert(session);
        }
    }

    next.call(req).await
}
