// End-to-end tests: session in, handler or JSON denial out
use actix_web::{
    body::to_bytes,
    http::{header, Method, StatusCode},
    middleware::from_fn,
    test, web, App, HttpMessage, HttpRequest, HttpResponse,
};
use chrono::Utc;
use sessiongate::handlers::{current_user, health, whoami, with_auth};
use sessiongate::session::{attach_bearer_session, session_from_authorization};
use sessiongate::testing::{
    assert_denied, assert_status, error_body, RequestBuilder, TestSessionBuilder, TestTokenBuilder,
};
use sessiongate::{Session, SessionUser, ValidatedSession, ValidationConfig};

fn demo_app_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/ping", web::get().to(health))
        .route("/api/me", web::get().to(with_auth(current_user, None)))
        .route("/api/whoami", web::get().to(whoami));
}

#[actix_web::test]
async fn test_valid_session_reaches_handler() {
    let token = TestTokenBuilder::new()
        .expires_at(Utc::now().timestamp() + 3600)
        .build();
    let session = Session::with_user(SessionUser::new("1", "a@b.com", &token));

    let expected_token = token.clone();
    let protected = with_auth(
        move |session: ValidatedSession, _req: HttpRequest| {
            let expected_token = expected_token.clone();
            async move {
                assert_eq!(session.id(), "1");
                assert_eq!(session.email(), "a@b.com");
                assert_eq!(session.access_token(), expected_token);
                HttpResponse::Ok().body("handled")
            }
        },
        None,
    );

    let response = protected(RequestBuilder::new().with_session(session).build()).await;
    assert_status(&response, 200);
}

#[actix_web::test]
async fn test_malformed_token_is_rejected() {
    let session = Session::with_user(SessionUser::new("1", "a@b.com", "not-a-jwt"));
    let protected = with_auth(current_user, None);

    let response = protected(RequestBuilder::new().with_session(session).build()).await;
    assert_denied(response, 400, "MALFORMED_TOKEN", "Malformed authentication token").await;
}

#[actix_web::test]
async fn test_missing_session_is_rejected() {
    let protected = with_auth(current_user, None);

    let response = protected(RequestBuilder::new().uri("/api/me").build()).await;
    assert_denied(response, 401, "NO_SESSION", "Authentication required").await;
}

#[actix_web::test]
async fn test_stage_messages_reach_the_client() {
    let protected = with_auth(current_user, None);

    let session = TestSessionBuilder::new().without_token().build();
    let response = protected(RequestBuilder::new().with_session(session).build()).await;
    assert_denied(response, 401, "INVALID_TOKEN", "No access token in session").await;

    let session = TestSessionBuilder::new().without_email().build();
    let response = protected(RequestBuilder::new().with_session(session).build()).await;
    assert_denied(response, 401, "INVALID_TOKEN", "User email not found in session").await;

    let session = TestSessionBuilder::new()
        .with_token(&TestTokenBuilder::new().expires_in(-60).build())
        .build();
    let response = protected(RequestBuilder::new().with_session(session).build()).await;
    assert_denied(response, 401, "EXPIRED_TOKEN", "Token expired or invalid").await;
}

#[actix_web::test]
async fn test_demo_app_over_bearer_header() {
    let app = test::init_service(
        App::new()
            .wrap(from_fn(attach_bearer_session))
            .configure(demo_app_config),
    )
    .await;

    // Public route
    let req = test::TestRequest::get().uri("/ping").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // No credentials
    let req = test::TestRequest::get().uri("/api/me").to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "NO_SESSION");

    // Identity taken from the token claims
    let token = TestTokenBuilder::new()
        .with_subject("42")
        .with_email("someone@example.com")
        .build();
    for uri in ["/api/me", "/api/whoami"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, serde_json::json!({"id": "42", "email": "someone@example.com"}));
    }

    // Malformed bearer token
    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_bearer_request_without_middleware() {
    let protected = with_auth(
        |session: ValidatedSession, req: HttpRequest| async move {
            assert_eq!(req.method(), Method::POST);
            assert_eq!(req.headers().get("x-request-id").unwrap(), "req-7");
            HttpResponse::Ok().body(session.id().to_string())
        },
        None,
    );

    // Numeric subject claims come through as their decimal form
    let token = TestTokenBuilder::new()
        .with_claim("sub", serde_json::json!(42))
        .with_email("a@b.com")
        .build();
    let req = RequestBuilder::new()
        .method(Method::POST)
        .uri("/api/orders")
        .header("x-request-id", "req-7")
        .bearer(&token)
        .build();

    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let session = session_from_authorization(authorization).expect("bearer session");
    assert_eq!(session.user.as_ref().and_then(|user| user.id.as_deref()), Some("42"));

    req.extensions_mut().insert(session);
    let response = protected(req).await;
    assert_status(&response, 200);
    let body = to_bytes(response.into_body()).await.unwrap();
    assert_eq!(body, web::Bytes::from_static(b"42"));

    // Session ids win over the token subject
    let session = TestSessionBuilder::new().with_id("user-9").build();
    let response = protected(RequestBuilder::new().with_session(session).build()).await;
    let body = to_bytes(response.into_body()).await.unwrap();
    assert_eq!(body, web::Bytes::from_static(b"user-9"));
}

#[actix_web::test]
async fn test_required_scopes_and_audience() {
    let config = ValidationConfig::default()
        .with_scopes(["orders:read"])
        .with_expected_audience("orders-api");
    let protected = with_auth(current_user, Some(config));

    let granted = TestTokenBuilder::new()
        .with_scope("orders:read orders:write")
        .with_audience(&["orders-api", "billing-api"])
        .build();
    let session = TestSessionBuilder::new().with_token(&granted).build();
    let response = protected(RequestBuilder::new().with_session(session).build()).await;
    assert_status(&response, 200);

    let wrong_audience = TestTokenBuilder::new()
        .with_scope("orders:read")
        .with_audience(&["billing-api"])
        .build();
    let session = TestSessionBuilder::new().with_token(&wrong_audience).build();
    let response = protected(RequestBuilder::new().with_session(session).build()).await;
    assert_status(&response, 401);

    let missing_scope = TestTokenBuilder::new()
        .with_scope("orders:write")
        .with_audience(&["orders-api"])
        .build();
    let session = TestSessionBuilder::new().with_token(&missing_scope).build();
    let response = protected(RequestBuilder::new().with_session(session).build()).await;
    assert_status(&response, 403);
    let body = error_body(response).await;
    assert_eq!(body["code"], "INSUFFICIENT_PERMISSIONS");
}
