//! HTTP resource client tests
//!
//! Exercises the JSON client against a mock backend: body passthrough, error
//! message extraction, headers and the bearer credential.

use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

use hrms_portal::models::Department;
use hrms_portal::{ApiClient, ApiError, Session, FALLBACK_ERROR_MESSAGE};

use crate::common::{jwt_expiring_in, DepartmentFixtures, TestApp};

#[tokio::test]
async fn test_post_resolves_with_server_body() {
    let app = TestApp::new().await;
    let reply = json!({"id": "7", "name": "Research", "extra": [1, 2, 3]});

    Mock::given(method("POST"))
        .and(path("/api/departments"))
        .and(body_json(json!({"name": "Research"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(reply.clone()))
        .expect(1)
        .mount(&app.server)
        .await;

    let value = app
        .client()
        .post("/departments", &json!({"name": "Research"}))
        .await
        .unwrap();
    assert_eq!(value, reply);
}

#[tokio::test]
async fn test_put_resolves_with_server_body() {
    let app = TestApp::new().await;
    let reply = json!({"message": "Department updated"});

    Mock::given(method("PUT"))
        .and(path("/api/departments/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply.clone()))
        .mount(&app.server)
        .await;

    let value = app
        .client()
        .put("/departments/2", &json!({"name": "Sales"}))
        .await
        .unwrap();
    assert_eq!(value, reply);
}

#[tokio::test]
async fn test_typed_get_decodes_records() {
    let app = TestApp::new().await;
    app.mock_departments(DepartmentFixtures::listing_json()).await;

    let departments: Vec<Department> = app.client().get_json("/departments").await.unwrap();
    assert_eq!(departments, DepartmentFixtures::listing());
}

#[tokio::test]
async fn test_error_field_becomes_message() {
    let app = TestApp::new().await;
    Mock::given(method("DELETE"))
        .and(path("/api/departments/3"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"error": "Department has employees"})),
        )
        .mount(&app.server)
        .await;

    let err = app.client().delete("/departments/3").await.unwrap_err();
    assert_eq!(err.to_string(), "Department has employees");
    assert_eq!(err.status(), Some(409));
}

#[tokio::test]
async fn test_error_without_json_body_uses_fallback() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/departments"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&app.server)
        .await;

    let err = app.client().get("/departments").await.unwrap_err();
    assert_eq!(err.to_string(), FALLBACK_ERROR_MESSAGE);
    assert!(matches!(err, ApiError::Http { status: 502, .. }));
}

#[tokio::test]
async fn test_error_with_empty_body_uses_fallback() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.server)
        .await;

    let err = app.client().get("/users").await.unwrap_err();
    assert_eq!(err.to_string(), "An error occurred");
}

#[tokio::test]
async fn test_unauthorized_is_detected() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/departments"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Not authorized"})))
        .mount(&app.server)
        .await;

    let err = app.client().get("/departments").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message("Failed to fetch departments"), "Not authorized");
}

#[tokio::test]
async fn test_empty_success_body_resolves_to_null() {
    let app = TestApp::new().await;
    Mock::given(method("DELETE"))
        .and(path("/api/departments/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&app.server)
        .await;

    let value = app.client().delete("/departments/1").await.unwrap();
    assert!(value.is_null());
}

#[tokio::test]
async fn test_non_json_success_body_resolves_to_null() {
    let app = TestApp::new().await;
    Mock::given(method("DELETE"))
        .and(path("/api/departments/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Deleted"))
        .mount(&app.server)
        .await;

    let value = app.client().delete("/departments/1").await.unwrap();
    assert!(value.is_null());
}

#[tokio::test]
async fn test_unexpected_shape_is_decode_error() {
    let app = TestApp::new().await;
    app.mock_departments(json!({"departments": []})).await;

    let result: Result<Vec<Department>, _> = app.client().get_json("/departments").await;
    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Nothing listens on port 9
    let client = ApiClient::with_base_url("http://127.0.0.1:9/api", Session::new()).unwrap();

    let err = client.get("/departments").await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.status(), None);
    assert!(!err.user_message("Failed to fetch departments").is_empty());
}

#[tokio::test]
async fn test_json_headers_and_request_id_sent() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/api/departments"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&app.server)
        .await;

    app.client()
        .post("/departments", &json!({"name": "Ops"}))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_request_ids_are_unique() {
    let app = TestApp::new().await;
    app.mock_departments(json!([])).await;

    app.client().get("/departments").await.unwrap();
    app.client().get("/departments").await.unwrap();

    let requests = app.requests_to("GET", "/departments").await;
    assert_eq!(requests.len(), 2);
    let ids: Vec<_> = requests
        .iter()
        .map(|r| r.headers.get("x-request-id").unwrap().to_str().unwrap().to_string())
        .collect();
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_no_authorization_without_session() {
    let app = TestApp::new().await;
    app.mock_departments(json!([])).await;

    app.client().get("/departments").await.unwrap();

    let requests = app.requests_to("GET", "/departments").await;
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_bearer_sent_once_session_is_set() {
    let app = TestApp::new().await;
    let token = jwt_expiring_in(3600);

    Mock::given(method("GET"))
        .and(path("/api/departments"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&app.server)
        .await;

    app.client().session().set(token.clone()).await;
    app.client().get("/departments").await.unwrap();
}

#[tokio::test]
async fn test_expired_credential_is_not_sent() {
    let app = TestApp::new().await;
    app.mock_departments(json!([])).await;

    app.client().session().set(jwt_expiring_in(-60)).await;
    app.client().get("/departments").await.unwrap();

    let requests = app.requests_to("GET", "/departments").await;
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_relative_path_rejected_before_sending() {
    let app = TestApp::new().await;

    let err = app.client().get("departments").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(app.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_ascii_path_is_sent_percent_encoded() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/users/%C3%A9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "é"})))
        .expect(1)
        .mount(&app.server)
        .await;

    let value = app.client().get("/users/é").await.unwrap();
    assert_eq!(value, json!({"id": "é"}));
}

#[tokio::test]
async fn test_invalid_path_error_names_broken_rule() {
    let app = TestApp::new().await;

    let err = app.client().get("/has spaces").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid request path '/has spaces': must not contain whitespace or control characters"
    );

    let err = app.client().get("departments").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid request path 'departments': must start with '/'"
    );
    assert!(app.server.received_requests().await.unwrap().is_empty());
}
