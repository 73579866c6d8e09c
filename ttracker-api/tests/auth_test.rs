/// Authentication integration tests
///
/// Drive the real router with tokens signed by the fixture key and a local
/// key set server, covering each rejection gate and user provisioning.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use common::{access_claims, sign, sign_with_kid, TestContext};
use ttracker_shared::storage::UserStorage;

#[tokio::test]
async fn test_missing_authorization_header() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.request(Method::GET, "/projects", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["err"], "Missing authorization header");
    // Rejected before the key set or storage is touched
    assert_eq!(ctx.fetch_count(), 0);
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let ctx = TestContext::new().await;

    let request = Request::builder()
        .uri("/projects")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let (status, body) = ctx.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["statusCode"], 401);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let ctx = TestContext::new().await;

    let mut claims = access_claims("alice");
    claims["exp"] = (Utc::now() - Duration::minutes(5)).timestamp().into();
    let token = sign(&claims);

    let (status, body) = ctx
        .request(Method::GET, "/projects", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["err"], "Token has expired");
    assert!(!ctx.store.user_exists("alice").await.unwrap());
}

#[tokio::test]
async fn test_wrong_issuer_rejected() {
    let ctx = TestContext::new().await;

    let mut claims = access_claims("alice");
    claims["iss"] = "https://someone-else.example.com".into();
    let token = sign(&claims);

    let (status, body) = ctx
        .request(Method::GET, "/projects", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["err"].as_str().unwrap().starts_with("Invalid issuer"));
}

#[tokio::test]
async fn test_id_token_rejected() {
    let ctx = TestContext::new().await;

    let mut claims = access_claims("alice");
    claims["token_use"] = "id".into();
    let token = sign(&claims);

    let (status, body) = ctx
        .request(Method::GET, "/projects", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["err"].as_str().unwrap().contains("token use"));
    assert!(!ctx.store.user_exists("alice").await.unwrap());
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let ctx = TestContext::new().await;

    // Signature of alice's token over bob's claims
    let alice = ctx.token("alice");
    let bob = ctx.token("bob");
    let alice_parts: Vec<&str> = alice.split('.').collect();
    let bob_parts: Vec<&str> = bob.split('.').collect();
    let forged = format!("{}.{}.{}", alice_parts[0], bob_parts[1], alice_parts[2]);

    let (status, body) = ctx
        .request(Method::GET, "/projects", Some(&forged), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["statusCode"], 401);
    assert!(!ctx.store.user_exists("bob").await.unwrap());
}

#[tokio::test]
async fn test_unknown_key_id_rejected_without_refetch_storm() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx
        .request(Method::GET, "/projects", Some(&ctx.token("alice")), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.fetch_count(), 1);

    let token = sign_with_kid(&access_claims("alice"), "rotated-key");
    let (status, body) = ctx
        .request(Method::GET, "/projects", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["err"].as_str().unwrap().contains("rotated-key"));
    // The set was fetched moments ago, so no early refetch
    assert_eq!(ctx.fetch_count(), 1);
}

#[tokio::test]
async fn test_unreachable_key_set_is_server_error() {
    let ctx = TestContext::with_unreachable_jwks();

    let (status, body) = ctx
        .request(Method::GET, "/projects", Some(&ctx.token("alice")), None)
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["statusCode"], 500);
    assert_eq!(body["err"], "An internal error occurred");
}

#[tokio::test]
async fn test_first_request_provisions_user_once() {
    let ctx = TestContext::new().await;
    let token = ctx.token("alice");

    for _ in 0..3 {
        let (status, _) = ctx
            .request(Method::GET, "/projects", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let user = ctx.store.find_user("alice").await.unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.username.as_deref(), Some("alice-name"));

    // Key set cached across requests
    assert_eq!(ctx.fetch_count(), 1);
}

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.request(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_cors_preflight_needs_no_token() {
    let ctx = TestContext::new().await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/projects")
        .header(header::ORIGIN, "https://app.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .body(Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(ctx.app.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://app.example.com"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("DELETE"));
}
