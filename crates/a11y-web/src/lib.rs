//! Accessibility Analyzer Web Server
//!
//! Axum-based JSON API over the analyzer, report store and user settings,
//! authenticated with Firebase ID tokens.

pub mod auth;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub use error::ApiError;
pub use state::AppState;

/// CORS for the configured frontend origins. Credentials are allowed, so
/// methods and headers are mirrored rather than wildcarded.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Create the application router.
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/analyze", post(routes::analyze::analyze))
        // Reports
        .route("/reports/user/{uid}", get(routes::reports::list_user_reports))
        .route(
            "/reports/{id}",
            get(routes::reports::get_report).delete(routes::reports::delete_report),
        )
        // Settings
        .route(
            "/settings",
            get(routes::settings::get_settings).put(routes::settings::update_settings),
        )
        // Auth
        .route("/auth/me", get(routes::auth::me))
        .route("/auth/verify-token", post(routes::auth::verify_token));

    Router::new()
        .route("/", get(routes::root::index))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Run the web server until Ctrl-C.
pub async fn run_server(state: AppState, cors_origins: &[String], host: &str, port: u16) -> anyhow::Result<()> {
    if !state.auth_enabled() {
        tracing::warn!("Authentication is disabled; all requests act as '{}'", auth::ANONYMOUS_UID);
    }
    let app = create_router(state, cors_origins);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Web server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, AuthenticatedUser, TokenValidator};
    use a11y_core::analyzer::Analyzer;
    use a11y_core::fetch::PageFetcher;
    use a11y_core::{A11yError, A11yResult};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use url::Url;

    const PAGE: &str = r#"<html lang="en"><head><title>Shop</title></head>
        <body><h1>Shop</h1><img src="logo.png"><a href="/more">read more</a></body></html>"#;

    /// Serves `PAGE`, failing for hosts named `down.test`.
    struct StaticFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &Url) -> A11yResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.host_str() == Some("down.test") {
                return Err(A11yError::FetchStatus {
                    url: url.to_string(),
                    status: 502,
                });
            }
            Ok(PAGE.to_string())
        }
    }

    /// Accepts `<uid>-token` for alice and bob.
    struct StaticValidator;

    #[async_trait]
    impl TokenValidator for StaticValidator {
        async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
            match token.strip_suffix("-token") {
                Some(uid @ ("alice" | "bob")) => Ok(AuthenticatedUser {
                    uid: uid.to_string(),
                    decoded_token: json!({ "sub": uid, "email": format!("{}@example.com", uid) }),
                }),
                _ => Err(AuthError::InvalidToken("unknown token".to_string())),
            }
        }
    }

    struct TestApp {
        router: Router,
        fetcher: Arc<StaticFetcher>,
    }

    impl TestApp {
        fn new(with_auth: bool) -> Self {
            let fetcher = Arc::new(StaticFetcher {
                calls: AtomicUsize::new(0),
            });
            let db = Arc::new(a11y_db::init_memory_pool().unwrap());
            let analyzer = Arc::new(Analyzer::new(fetcher.clone()));
            let mut state = AppState::new(db, analyzer).with_cache_ttl(Duration::from_secs(3600));
            if with_auth {
                state = state.with_auth(Arc::new(StaticValidator));
            }
            let origins = vec!["http://localhost:5173".to_string()];
            Self {
                router: create_router(state, &origins),
                fetcher,
            }
        }

        async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
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

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }

        async fn send_raw(&self, method: Method, uri: &str, token: &str, body: &'static str) -> (StatusCode, Value) {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap();

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, serde_json::from_slice(&bytes).unwrap())
        }

        async fn analyze(&self, token: &str, body: Value) -> (StatusCode, Value) {
            self.send(Method::POST, "/api/analyze", Some(token), Some(body)).await
        }
    }

    #[tokio::test]
    async fn test_root() {
        let app = TestApp::new(true);
        let (status, body) = app.send(Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Accessibility Analyzer API is running!");
    }

    #[tokio::test]
    async fn test_analyze_requires_token() {
        let app = TestApp::new(true);
        let (status, body) = app
            .send(Method::POST, "/api/analyze", None, Some(json!({"url": "https://shop.test/"})))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body["detail"],
            "Authorization header is missing. Please provide a Firebase ID token."
        );

        let (status, _) = app.analyze("mallory-token", json!({"url": "https://shop.test/"})).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_analyze_caches_and_refreshes() {
        let app = TestApp::new(true);

        let (status, first) = app.analyze("alice-token", json!({"url": "https://shop.test/"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["user_id"], "alice");
        assert_eq!(first["url"], "https://shop.test/");
        assert_eq!(first["page_title"], "Shop");
        assert_eq!(first["summary"]["total_issues"], 2);
        assert_eq!(first["summary"]["score"], 90);

        let (_, second) = app.analyze("alice-token", json!({"url": "https://shop.test/"})).await;
        assert_eq!(second["_id"], first["_id"]);
        assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 1);

        let (status, refreshed) = app
            .analyze("alice-token", json!({"url": "https://shop.test/", "refresh": true}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(refreshed["_id"], first["_id"]);
        assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 2);

        // Another user gets their own report.
        let (_, bobs) = app.analyze("bob-token", json!({"url": "https://shop.test/"})).await;
        assert_ne!(bobs["_id"], first["_id"]);
    }

    #[tokio::test]
    async fn test_analyze_errors() {
        let app = TestApp::new(true);

        let (status, _) = app.analyze("alice-token", json!({"url": "ftp://shop.test/"})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = app.analyze("alice-token", json!({"url": "https://down.test/"})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().starts_with("Analysis failed: "));
    }

    #[tokio::test]
    async fn test_report_listing_and_lookup() {
        let app = TestApp::new(true);
        let (_, report) = app.analyze("alice-token", json!({"url": "https://shop.test/"})).await;
        let id = report["_id"].as_str().unwrap().to_string();

        let (status, list) = app.send(Method::GET, "/api/reports/user/alice", Some("alice-token"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, body) = app.send(Method::GET, "/api/reports/user/alice", Some("bob-token"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["detail"], "You are not authorized to view these reports.");

        let uri = format!("/api/reports/{}", id);
        let (status, fetched) = app.send(Method::GET, &uri, Some("alice-token"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["_id"], report["_id"]);

        let (status, body) = app.send(Method::GET, &uri, Some("bob-token"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Report not found or you are not authorized to view it.");

        let (status, _) = app.send(Method::GET, "/api/reports/not-a-uuid", Some("alice-token"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_report() {
        let app = TestApp::new(true);
        let (_, report) = app.analyze("alice-token", json!({"url": "https://shop.test/"})).await;
        let uri = format!("/api/reports/{}", report["_id"].as_str().unwrap());

        let (status, body) = app.send(Method::DELETE, &uri, Some("bob-token"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["detail"], "You are not authorized to delete this report.");

        let (status, body) = app.send(Method::DELETE, &uri, Some("alice-token"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, body) = app.send(Method::DELETE, &uri, Some("alice-token"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Report not found");

        let (status, _) = app.send(Method::DELETE, "/api/reports/bad-id", Some("alice-token"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let app = TestApp::new(true);

        let (status, defaults) = app.send(Method::GET, "/api/settings", Some("alice-token"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(defaults, json!({"emailNotifications": false, "theme": "System Default"}));

        let updated = json!({"emailNotifications": true, "theme": "Dark"});
        let (status, echoed) = app
            .send(Method::PUT, "/api/settings", Some("alice-token"), Some(updated.clone()))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(echoed, updated);

        let (_, stored) = app.send(Method::GET, "/api/settings", Some("alice-token"), None).await;
        assert_eq!(stored, updated);
        let (_, bobs) = app.send(Method::GET, "/api/settings", Some("bob-token"), None).await;
        assert_eq!(bobs, defaults);
    }

    #[tokio::test]
    async fn test_auth_endpoints() {
        let app = TestApp::new(true);

        let (status, body) = app.send(Method::GET, "/api/auth/me", Some("alice-token"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Authenticated successfully");
        assert_eq!(body["user"]["uid"], "alice");
        assert_eq!(body["user"]["decoded_token"]["email"], "alice@example.com");

        let (status, body) = app
            .send(Method::POST, "/api/auth/verify-token?id_token=bob-token", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Token verified successfully");
        assert_eq!(body["decoded_token"]["sub"], "bob");

        let (status, body) = app
            .send(Method::POST, "/api/auth/verify-token?id_token=garbage", None, None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["detail"].as_str().unwrap().starts_with("Invalid or expired token: "));
    }

    #[tokio::test]
    async fn test_auth_disabled_acts_as_anonymous() {
        let app = TestApp::new(false);

        let (status, report) = app
            .send(Method::POST, "/api/analyze", None, Some(json!({"url": "https://shop.test/"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["user_id"], auth::ANONYMOUS_UID);

        let (status, body) = app
            .send(Method::POST, "/api/auth/verify-token?id_token=x", None, None)
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Authentication service not available. Please try again later.");
    }

    #[tokio::test]
    async fn test_bad_request_bodies_render_detail() {
        let app = TestApp::new(true);

        let (status, body) = app.analyze("alice-token", json!({})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("missing field `url`"));

        let (status, body) = app.send_raw(Method::POST, "/api/analyze", "alice-token", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());

        let (status, body) = app
            .send(Method::PUT, "/api/settings", Some("alice-token"), Some(json!({"theme": "Purple"})))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());

        let (status, body) = app.send(Method::POST, "/api/auth/verify-token", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("id_token"));
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = TestApp::new(true);
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/analyze")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
            .body(Body::empty())
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:5173");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");

        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "https://evil.test")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
