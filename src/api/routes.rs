//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_value_handler, expire_handler, get_value_handler, keys_handler, persist_handler,
    ping_handler, put_value_handler, reload_handler, ttl_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints (all rooted at `/api/v1/`)
/// - `GET ping` - Liveness probe
/// - `GET keys` - List all live keys
/// - `GET values/:key` - Retrieve a value (whole, or `listIndex`/`dictKey` projection)
/// - `PUT values/:key` - Store a JSON value (`?expire=seconds` optional)
/// - `DELETE values/:key` - Delete a key
/// - `PUT expire/:key` - Set a timeout on a key
/// - `GET ttl/:key` - Remaining time to live of a key
/// - `POST persist` - Write the snapshot file
/// - `POST reload` - Replace cache contents from the snapshot file
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/ping", get(ping_handler))
        .route("/api/v1/keys", get(keys_handler))
        .route(
            "/api/v1/values/:key",
            get(get_value_handler)
                .put(put_value_handler)
                .delete(delete_value_handler),
        )
        .route("/api/v1/expire/:key", put(expire_handler))
        .route("/api/v1/ttl/:key", get(ttl_handler))
        .route("/api/v1/persist", post(persist_handler))
        .route("/api/v1/reload", post(reload_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::time::Duration;
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    fn create_test_app(dir: &tempfile::TempDir) -> Router {
        let cache = Cache::new(
            10,
            Duration::from_secs(1),
            10,
            dir.path().join("cacheData.json"),
        );
        create_router(AppState::new(cache))
    }

    #[tokio::test]
    async fn test_ping_endpoint() {
        let dir = tempdir().unwrap();
        let app = create_test_app(&dir);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/ping")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_keys_endpoint() {
        let dir = tempdir().unwrap();
        let app = create_test_app(&dir);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/keys")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_put_endpoint() {
        let dir = tempdir().unwrap();
        let app = create_test_app(&dir);

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/v1/values/test")
                    .header("content-type", "application/json")
                    .body(Body::from(r#""hello""#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let dir = tempdir().unwrap();
        let app = create_test_app(&dir);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/values/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
