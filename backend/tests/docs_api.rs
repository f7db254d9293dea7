use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use officedesk_backend::docs;
use serde_json::Value;
use tower::ServiceExt;
use utoipa::OpenApi;

mod support;
use support::TestApp;

#[test]
fn openapi_lists_request_paths_and_bearer_scheme() {
    let openapi = docs::ApiDoc::openapi();
    let json = serde_json::to_value(&openapi).expect("serialize openapi");

    let paths = json
        .get("paths")
        .and_then(|v| v.as_object())
        .expect("paths object");
    for path in [
        "/api/requests",
        "/api/requests/{id}/status",
        "/api/leave-requests/{id}/approve",
        "/api/auth/register",
        "/api/company/settings",
        "/api/users/{id}/notifications",
    ] {
        assert!(paths.contains_key(path), "missing {}", path);
    }

    let bearer = json
        .pointer("/components/securitySchemes/BearerAuth")
        .expect("BearerAuth scheme");
    assert_eq!(bearer.get("type").and_then(Value::as_str), Some("http"));
    assert_eq!(bearer.get("scheme").and_then(Value::as_str), Some("bearer"));
}

#[test]
fn request_status_schema_uses_wire_names() {
    let json = serde_json::to_value(docs::ApiDoc::openapi()).expect("serialize openapi");
    let variants = json
        .pointer("/components/schemas/RequestStatus/enum")
        .and_then(Value::as_array)
        .expect("RequestStatus enum");
    let names: Vec<&str> = variants.iter().filter_map(Value::as_str).collect();
    assert!(names.contains(&"In Progress"));
    assert!(names.contains(&"DELETED"));
}

#[tokio::test]
async fn swagger_ui_is_served_without_auth() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/docs")
                .body(Body::empty())
                .expect("build docs request"),
        )
        .await
        .expect("call swagger ui");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/api/docs/");

    let (status, json) = app.get("/api-doc/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json
        .get("paths")
        .and_then(Value::as_object)
        .is_some_and(|paths| paths.contains_key("/health")));
}
