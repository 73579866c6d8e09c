//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - A local key set server serving the fixture RSA public key
//! - The real router over an in-memory store
//! - Access token minting with the fixture private key
//! - Request helpers returning status and parsed JSON

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::ServiceExt;
use ttracker_api::{
    app::{build_router, AppState},
    config::{ApiConfig, AuthConfig, Config, DatabaseConfig},
};
use ttracker_shared::storage::memory::MemoryStore;

pub const ISSUER: &str = "https://cognito-idp.test.amazonaws.com/test-pool";
pub const KEY_ID: &str = "test-key-1";

const PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/test_rsa_key.pem");
const JWKS: &str = include_str!("../fixtures/test_jwks.json");

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub jwks_fetches: Arc<AtomicUsize>,
}

impl TestContext {
    /// Creates a context backed by a live local key set server
    pub async fn new() -> Self {
        let (url, fetches) = spawn_jwks_server().await;
        Self::with_jwk_url(url, fetches)
    }

    /// Creates a context whose key set URL refuses connections
    pub fn with_unreachable_jwks() -> Self {
        Self::with_jwk_url(
            "http://127.0.0.1:1/.well-known/jwks.json".to_string(),
            Arc::new(AtomicUsize::new(0)),
        )
    }

    fn with_jwk_url(jwk_url: String, jwks_fetches: Arc<AtomicUsize>) -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://unused".to_string(),
                max_connections: 1,
            },
            auth: AuthConfig {
                jwk_url,
                issuer: ISSUER.to_string(),
                jwks_cache_ttl_seconds: 3600,
                jwks_fetch_timeout_seconds: 2,
            },
        };

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config).expect("Failed to build app state");

        Self {
            app: build_router(state),
            store,
            jwks_fetches,
        }
    }

    /// Mints a valid access token for `sub`
    pub fn token(&self, sub: &str) -> String {
        sign(&access_claims(sub))
    }

    /// Sends a request and returns the status and JSON body
    ///
    /// An empty body is returned as `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Sends a prepared request and returns the status and JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, body)
    }

    /// Number of times the key set server was hit
    pub fn fetch_count(&self) -> usize {
        self.jwks_fetches.load(Ordering::SeqCst)
    }
}

/// Claims of a valid access token
pub fn access_claims(sub: &str) -> Value {
    json!({
        "sub": sub,
        "iss": ISSUER,
        "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        "iat": Utc::now().timestamp(),
        "token_use": "access",
        "username": format!("{}-name", sub),
    })
}

/// Signs claims with the fixture key under [`KEY_ID`]
pub fn sign(claims: &Value) -> String {
    sign_with_kid(claims, KEY_ID)
}

/// Signs claims with the fixture key under an arbitrary key ID
pub fn sign_with_kid(claims: &Value, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());

    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY).expect("Invalid fixture key");
    encode(&header, claims, &key).expect("Failed to sign token")
}

/// Serves the fixture key set on an ephemeral port
///
/// Returns the key set URL and a counter of requests served.
pub async fn spawn_jwks_server() -> (String, Arc<AtomicUsize>) {
    let fetches = Arc::new(AtomicUsize::new(0));
    let keys: Value = serde_json::from_str(JWKS).expect("Invalid fixture key set");

    let counter = fetches.clone();
    let app = Router::new().route(
        "/.well-known/jwks.json",
        get(move || {
            let counter = counter.clone();
            let keys = keys.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(keys)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/.well-known/jwks.json", addr), fetches)
}
