#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use lms_portal::lms_auth::{create_parent_token, create_staff_token};
use lms_portal::lms_config::JwtConfig;
use lms_portal::lms_db::{Directory, MemoryDirectory};
use lms_portal::lms_models::{NewStaff, NewStudent, ParentIdentity, Role, StaffIdentity};
use lms_portal::router::init_router;
use lms_portal::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Low bcrypt cost keeps seeding fast; verification reads the cost from
/// the hash.
fn quick_hash(password: &str) -> String {
    bcrypt::hash(password, 4).unwrap()
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        token_expiry: 86_400,
    }
}

pub struct TestApp {
    pub state: AppState,
    pub directory: Arc<MemoryDirectory>,
}

impl TestApp {
    pub fn new() -> Self {
        let directory = Arc::new(MemoryDirectory::new());
        let state = AppState::new(directory.clone(), jwt_config());
        Self { state, directory }
    }

    pub fn router(&self) -> Router {
        init_router(self.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn seed_staff(&self, email: &str, password: &str, role: Role) -> StaffIdentity {
        self.directory
            .create_staff(NewStaff {
                fname: "Test".to_string(),
                mname: None,
                lname: role.to_string(),
                email: email.to_string(),
                phone: "9000000000".to_string(),
                password_hash: quick_hash(password),
                role,
                gender: "F".to_string(),
                dob: None,
                address: None,
            })
            .await
            .unwrap()
    }

    pub async fn seed_student(
        &self,
        father_phone: &str,
        password: &str,
        std: &str,
        div: &str,
    ) -> ParentIdentity {
        self.directory
            .create_student(NewStudent {
                fname: "Kid".to_string(),
                lname: format!("{std}{div}"),
                father_phone: Some(father_phone.to_string()),
                mother_phone: Some(format!("{father_phone}9")),
                std: std.to_string(),
                div: div.to_string(),
                password_hash: quick_hash(password),
            })
            .await
            .unwrap()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// Token for a staff member that need not exist in the directory.
pub fn staff_token(id: i64, role: &str) -> String {
    create_staff_token(id, role, "someone@school.test", &jwt_config()).unwrap()
}

pub fn parent_token(student_id: i64) -> String {
    create_parent_token(student_id, "9000000001", &jwt_config()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}
