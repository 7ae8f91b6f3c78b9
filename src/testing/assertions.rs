//! Custom assertion helpers for validation results and gate responses

use actix_web::{body::to_bytes, HttpResponse};
use serde_json::Value;

use crate::models::auth::{AuthValidationError, ValidationResult};

/// Assert that an HTTP response has the expected status code
///
/// # Panics
///
/// Panics if the response status does not match the expected status code.
pub fn assert_status(response: &HttpResponse, expected_status: u16) {
    assert_eq!(
        response.status().as_u16(),
        expected_status,
        "Expected status {expected_status}, got {}",
        response.status()
    );
}

/// Assert that a validation failed with `expected`
///
/// # Panics
///
/// Panics if the result is a success or carries a different error.
pub fn assert_failure(result: &ValidationResult, expected: AuthValidationError) {
    assert_eq!(
        result.error(),
        Some(expected),
        "Expected failure {}, got {result:?}",
        expected.code()
    );
    assert!(result.session().is_none());
}

/// Read a response body as JSON
///
/// # Panics
///
/// Panics if the body cannot be read or is not JSON.
pub async fn error_body(response: HttpResponse) -> Value {
    let bytes = to_bytes(response.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a gate denial: status, `code` and `error` text
///
/// # Panics
///
/// Panics if any of the three differs.
pub async fn assert_denied(
    response: HttpResponse,
    expected_status: u16,
    expected_code: &str,
    expected_message: &str,
) {
    assert_status(&response, expected_status);
    let body = error_body(response).await;
    assert_eq!(body["code"], expected_code);
    assert_eq!(body["error"], expected_message);
}
