// Handlers that run behind the gate
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;

use super::extractor::Authenticated;
use crate::models::ValidatedSession;

#[derive(Debug, Serialize)]
struct CurrentUser<'a> {
    id: &'a str,
    email: &'a str,
}

/// Identity of the validated caller, for use with [`super::with_auth`]
#[allow(clippy::unused_async)]
pub async fn current_user(session: ValidatedSession, _req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(CurrentUser {
        id: session.id(),
        email: session.email(),
    })
}

/// Same as [`current_user`], through the [`Authenticated`] extractor
#[allow(clippy::unused_async)]
pub async fn whoami(auth: Authenticated) -> HttpResponse {
    let session = auth.into_inner();
    HttpResponse::Ok().json(CurrentUser {
        id: session.id(),
        email: session.email(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::with_auth;
    use crate::models::{Session, SessionUser};
    use crate::testing::TestFixtures;
    use actix_web::{http::StatusCode, test, HttpMessage};

    #[actix_web::test]
    async fn test_current_user_returns_identity() {
        let token = TestFixtures::valid_token();
        let req = test::TestRequest::get().uri("/api/me").to_http_request();
        req.extensions_mut()
            .insert(Session::with_user(SessionUser::new("1", "a@b.com", &token)));

        let response = with_auth(current_user, None)(req).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"id": "1", "email": "a@b.com"}));
    }
}
