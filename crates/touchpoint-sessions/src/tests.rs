use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::handlers::{configure_routes, AppState};
use crate::services::SessionService;

async fn test_app() -> axum::Router {
    let db = touchpoint_database::test_utils::setup_test_db()
        .await
        .expect("Failed to set up test database");
    let session_service = Arc::new(SessionService::new(db));
    configure_routes().with_state(Arc::new(AppState { session_service }))
}

/// Build a create-session request carrying the peer address that
/// `axum::serve` would normally attach via `ConnectInfo`.
fn create_request(body: Value, forwarded_for: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/create-session")
        .header("content-type", "application/json");
    if let Some(header) = forwarded_for {
        builder = builder.header("x-forwarded-for", header);
    }
    let mut request = builder
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([203, 0, 113, 9], 44000))));
    request
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body was not valid JSON")
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::plugin::SessionsPlugin;
    use crate::types::{CreateSessionRequest, TrackingData};
    use touchpoint_core::plugin::TouchpointPlugin;

    #[test]
    fn test_plugin_name() {
        let plugin = SessionsPlugin;
        assert_eq!(plugin.name(), "sessions");
    }

    #[test]
    fn test_plugin_exposes_openapi_schema() {
        let plugin = SessionsPlugin;
        let openapi = plugin.openapi_schema().expect("schema should be present");
        assert!(openapi.paths.paths.contains_key("/create-session"));
        assert!(openapi.paths.paths.contains_key("/get-session/{session_id}"));
    }

    #[test]
    fn test_create_session_request_uses_camel_case_keys() {
        let request: CreateSessionRequest = serde_json::from_value(json!({
            "fullUrl": "https://shop.example/",
            "browserData": {"language": "en-US"}
        }))
        .expect("request should deserialize");

        assert_eq!(request.full_url.as_deref(), Some("https://shop.example/"));
        assert_eq!(
            request
                .browser_data
                .as_ref()
                .and_then(|data| data.get("language"))
                .and_then(|value| value.as_str()),
            Some("en-US")
        );
    }

    #[test]
    fn test_tracking_data_serializes_absent_values_as_nulls() {
        let value = serde_json::to_value(TrackingData::default()).expect("should serialize");
        let object = value.as_object().expect("should be an object");

        assert_eq!(object.len(), 10);
        assert!(object.values().all(Value::is_null));
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_session_returns_session_id() {
        let app = test_app().await;

        let response = app
            .oneshot(create_request(
                json!({
                    "fullUrl": "https://shop.example/landing?utm_source=newsletter",
                    "browserData": {"userAgent": "Mozilla/5.0"}
                }),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        let session_id = body["session_id"].as_str().unwrap();
        assert_eq!(session_id.len(), 36);
    }

    #[tokio::test]
    async fn test_create_session_missing_full_url_is_bad_request() {
        let app = test_app().await;

        let response = app
            .oneshot(create_request(json!({"browserData": {}}), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["title"], "Bad Request");
        assert!(body["detail"].as_str().unwrap().contains("fullUrl"));
    }

    #[tokio::test]
    async fn test_create_session_missing_browser_data_is_bad_request() {
        let app = test_app().await;

        let response = app
            .oneshot(create_request(
                json!({"fullUrl": "https://shop.example/"}),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(body["detail"].as_str().unwrap().contains("browserData"));
    }

    #[tokio::test]
    async fn test_create_session_accepts_empty_browser_data() {
        let app = test_app().await;

        let response = app
            .oneshot(create_request(
                json!({"fullUrl": "https://shop.example/", "browserData": {}}),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_session_round_trip() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(create_request(
                json!({
                    "fullUrl": "https://shop.example/?utm_source=newsletter&utm_campaign=spring%20sale",
                    "browserData": {"userAgent": "Mozilla/5.0", "fbpCookie": "fb.1.1700000000.123456"}
                }),
                Some("198.51.100.7, 10.0.0.1"),
            ))
            .await
            .unwrap();
        let session_id = read_json(response).await["session_id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/get-session/{}", session_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(
            body["fullUrl"],
            "https://shop.example/?utm_source=newsletter&utm_campaign=spring%20sale"
        );
        assert_eq!(body["browserData"]["userAgent"], "Mozilla/5.0");
        assert_eq!(body["serverData"]["ipAddress"], "198.51.100.7");
        assert!(body["serverData"]["timestamp"].is_string());
        assert_eq!(body["trackingData"]["utm_source"], "newsletter");
        assert_eq!(body["trackingData"]["utm_campaign"], "spring sale");
        assert_eq!(body["trackingData"]["fbp"], "fb.1.1700000000.123456");
        // Absent attribution values are serialized as explicit nulls
        assert!(body["trackingData"]
            .as_object()
            .unwrap()
            .get("utm_medium")
            .unwrap()
            .is_null());
    }

    #[tokio::test]
    async fn test_get_session_unknown_id_returns_not_found() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/get-session/a1b2c3d4-0000-0000-0000-000000000000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = read_json(response).await;
        assert_eq!(body["detail"], "Session not found");
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/create-session")
                    .header("origin", "https://marketing.example")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|value| value.to_str().ok()),
            Some("*")
        );
    }
}
