use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::controller::{get_all_attendance_report, mark_attendance};
use crate::middleware::role::require_attendance_marker;
use crate::state::AppState;

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/markAttendance", post(mark_attendance))
        .route_layer(middleware::from_fn(require_attendance_marker))
        .route("/getAllAttendanceReport", get(get_all_attendance_report))
}
