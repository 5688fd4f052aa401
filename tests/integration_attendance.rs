mod common;

use axum::http::StatusCode;
use common::{TestApp, get, json_request, parent_token, staff_token};
use lms_portal::lms_db::Directory;
use lms_portal::lms_models::{ClassAllocation, ParentIdentity, Role};
use serde_json::{Value, json};

struct Class5A {
    app: TestApp,
    teacher_token: String,
    first: ParentIdentity,
    second: ParentIdentity,
}

async fn class_5a() -> Class5A {
    let app = TestApp::new();
    let teacher = app.seed_staff("ct@school.test", "x", Role::ClassTeacher).await;
    app.directory
        .allocate(ClassAllocation {
            user_id: teacher.id,
            role: Role::ClassTeacher,
            std: "5".to_string(),
            div: "A".to_string(),
            subject: None,
        })
        .await
        .unwrap();

    let first = app.seed_student("9000000011", "pw", "5", "A").await;
    let second = app.seed_student("9000000012", "pw", "5", "A").await;

    Class5A {
        teacher_token: staff_token(teacher.id, "ClassTeacher"),
        app,
        first,
        second,
    }
}

fn register(date: &str, entries: &[(i64, bool)]) -> Value {
    json!({
        "std": "5",
        "div": "A",
        "date": date,
        "entries": entries
            .iter()
            .map(|(id, present)| json!({"student_id": id, "present": present}))
            .collect::<Vec<_>>(),
    })
}

#[tokio::test]
async fn test_class_teacher_marks_own_class() {
    let class = class_5a().await;

    let response = class
        .app
        .send(json_request(
            "POST",
            "/api/v1/markAttendance",
            register(
                "2024-06-03",
                &[(class.first.student_id, true), (class.second.student_id, false)],
            ),
            Some(&class.teacher_token),
        ))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["recorded"], 2);
}

#[tokio::test]
async fn test_class_teacher_of_another_class_is_forbidden() {
    let class = class_5a().await;
    let outsider = class
        .app
        .seed_staff("other@school.test", "x", Role::ClassTeacher)
        .await;
    let token = staff_token(outsider.id, "ClassTeacher");

    let response = class
        .app
        .send(json_request(
            "POST",
            "/api/v1/markAttendance",
            register("2024-06-03", &[(class.first.student_id, true)]),
            Some(&token),
        ))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_roles_outside_gate_cannot_mark() {
    let class = class_5a().await;
    let body = register("2024-06-03", &[(class.first.student_id, true)]);

    for token in [staff_token(1, "Teacher"), staff_token(1, "Admin"), parent_token(1)] {
        let response = class
            .app
            .send(json_request(
                "POST",
                "/api/v1/markAttendance",
                body.clone(),
                Some(&token),
            ))
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
    }

    let anonymous = class
        .app
        .send(json_request("POST", "/api/v1/markAttendance", body, None))
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_super_admin_marks_any_class() {
    let class = class_5a().await;

    let response = class
        .app
        .send(json_request(
            "POST",
            "/api/v1/markAttendance",
            register("2024-06-03", &[(class.first.student_id, true)]),
            Some(&staff_token(99, "SuperAdmin")),
        ))
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_mark_rejects_student_from_another_class() {
    let class = class_5a().await;
    let stranger = class.app.seed_student("9000000099", "pw", "6", "B").await;

    let response = class
        .app
        .send(json_request(
            "POST",
            "/api/v1/markAttendance",
            register("2024-06-03", &[(stranger.student_id, true)]),
            Some(&class.teacher_token),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mark_rejects_empty_register() {
    let class = class_5a().await;

    let response = class
        .app
        .send(json_request(
            "POST",
            "/api/v1/markAttendance",
            register("2024-06-03", &[]),
            Some(&class.teacher_token),
        ))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_report_totals_and_filters() {
    let class = class_5a().await;
    let first = class.first.student_id;
    let second = class.second.student_id;

    for (date, entries) in [
        ("2024-06-03", [(first, true), (second, true)]),
        ("2024-06-04", [(first, true), (second, false)]),
        ("2024-06-05", [(first, false), (second, false)]),
    ] {
        let response = class
            .app
            .send(json_request(
                "POST",
                "/api/v1/markAttendance",
                register(date, &entries),
                Some(&class.teacher_token),
            ))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    // re-marking a day replaces the earlier entry
    class
        .app
        .send(json_request(
            "POST",
            "/api/v1/markAttendance",
            register("2024-06-05", &[(first, true)]),
            Some(&class.teacher_token),
        ))
        .await;

    // readable by any verified identity
    let report = class
        .app
        .send(get(
            "/api/v1/getAllAttendanceReport?std=5&div=A",
            Some(&parent_token(first)),
        ))
        .await;
    assert_eq!(report.status, StatusCode::OK);

    let rows = report.body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    let row = |id: i64| rows.iter().find(|r| r["student_id"] == id).unwrap();
    assert_eq!(row(first)["total_days"], 3);
    assert_eq!(row(first)["present_days"], 3);
    assert_eq!(row(first)["percentage"], 100.0);
    assert_eq!(row(second)["present_days"], 1);
    assert_eq!(row(second)["percentage"], 33.33);

    let windowed = class
        .app
        .send(get(
            "/api/v1/getAllAttendanceReport?from=2024-06-04&to=2024-06-04",
            Some(&class.teacher_token),
        ))
        .await;
    let rows = windowed.body["data"].as_array().unwrap();
    assert!(rows.iter().all(|r| r["total_days"] == 1));

    let other_class = class
        .app
        .send(get(
            "/api/v1/getAllAttendanceReport?std=9&div=",
            Some(&class.teacher_token),
        ))
        .await;
    assert_eq!(other_class.status, StatusCode::OK);
    assert_eq!(other_class.body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_report_rejects_inverted_range() {
    let class = class_5a().await;

    let response = class
        .app
        .send(get(
            "/api/v1/getAllAttendanceReport?from=2024-06-05&to=2024-06-01",
            Some(&class.teacher_token),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_requires_token() {
    let app = TestApp::new();

    let response = app.send(get("/api/v1/getAllAttendanceReport", None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_report_rejects_malformed_date_with_envelope() {
    let class = class_5a().await;

    let response = class
        .app
        .send(get(
            "/api/v1/getAllAttendanceReport?from=not-a-date",
            Some(&staff_token(1, "Teacher")),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["status"], 400);
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid query parameters")
    );
}
