pub use lms_models::attendance::{
    AttendanceEntry, AttendanceFilter, AttendanceSummary, MarkAttendanceRequest,
    MarkAttendanceResult,
};
