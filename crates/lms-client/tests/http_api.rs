use std::sync::Arc;

use lms_client::{AuthApi, AuthSessionStore, ClientError, HttpAuthApi, MemoryStorage};
use lms_models::{LoginRequest, Role, UserType};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn staff_body(role: &str) -> serde_json::Value {
    json!({
        "success": true,
        "message": "Login successful",
        "data": {
            "user": {
                "id": 1,
                "fname": "Asha",
                "lname": "Rao",
                "email": "a@b.com",
                "phone": "9000000001",
                "role": role,
                "gender": "F",
                "dob": "1990-04-12",
                "address": null
            },
            "token": "jwt-from-server"
        }
    })
}

#[tokio::test]
async fn test_staff_login_posts_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .and(body_json(json!({ "email": "a@b.com", "password": "x" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(staff_body("SuperAdmin")))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(server.uri());
    let data = api
        .login_as_staff(&LoginRequest {
            email: Some("a@b.com".to_string()),
            password: Some("x".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(data.token, "jwt-from-server");
    assert_eq!(data.user.role, Role::SuperAdmin);
}

#[tokio::test]
async fn test_error_envelope_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Invalid credentials",
            "status": 401
        })))
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(format!("{}/", server.uri()));
    let err = api
        .login_as_staff(&LoginRequest {
            email: Some("a@b.com".to_string()),
            password: Some("wrong".to_string()),
        })
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_uses_status_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(server.uri());
    let err = api.get_authorized("/me", "t").await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "Bad Gateway");
}

#[tokio::test]
async fn test_parent_login_through_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/parentLogin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Login successful",
            "data": {
                "student": {
                    "student_id": 9,
                    "fname": "Kiran",
                    "lname": "Shah",
                    "father_phone": "9111111111",
                    "mother_phone": null,
                    "std": "5",
                    "div": "A",
                    "role": "Student"
                },
                "token": "parent-jwt"
            }
        })))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let store = AuthSessionStore::open(Arc::new(HttpAuthApi::new(server.uri())), storage);
    store.login_as_parent("9111111111", "pw").await.unwrap();

    let session = store.snapshot();
    assert_eq!(session.user_type, Some(UserType::Parent));
    assert_eq!(session.user_roles, None);
    assert_eq!(session.student.unwrap().student_id, 9);
}

#[tokio::test]
async fn test_authorized_get_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(staff_body("ClassTeacher")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .and(header("authorization", "Bearer jwt-from-server"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "ok",
            "data": { "id": 1, "role": "ClassTeacher" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = AuthSessionStore::open(
        Arc::new(HttpAuthApi::new(server.uri())),
        Arc::new(MemoryStorage::new()),
    );
    store.login_as_staff("a@b.com", "x").await.unwrap();

    let me: serde_json::Value = store.authorized_get("/me").await.unwrap();
    assert_eq!(me["role"], "ClassTeacher");
}
