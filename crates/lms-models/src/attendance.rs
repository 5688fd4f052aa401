//! Attendance marking and reporting models.

use chrono::NaiveDate;
use lms_core::serde::empty_string_as_none;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceEntry {
    pub student_id: i64,
    pub present: bool,
}

/// Body of `POST /markAttendance`: one day's register for a class.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct MarkAttendanceRequest {
    #[validate(length(min = 1, max = 10))]
    pub std: String,
    #[validate(length(min = 1, max = 10))]
    pub div: String,
    pub date: NaiveDate,
    #[validate(length(min = 1))]
    pub entries: Vec<AttendanceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MarkAttendanceResult {
    pub recorded: usize,
}

/// Query of `GET /getAllAttendanceReport`. Blank values mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AttendanceFilter {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub std: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub div: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub to: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn matches_class(&self, std: &str, div: &str) -> bool {
        self.std.as_deref().is_none_or(|s| s == std) && self.div.as_deref().is_none_or(|d| d == div)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Per-student attendance totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceSummary {
    pub student_id: i64,
    pub fname: String,
    pub lname: String,
    pub std: String,
    pub div: String,
    pub total_days: i64,
    pub present_days: i64,
    /// Present days as a percentage of recorded days, two decimals
    pub percentage: f64,
}

impl AttendanceSummary {
    pub fn percentage_of(present_days: i64, total_days: i64) -> f64 {
        if total_days <= 0 {
            return 0.0;
        }
        let raw = present_days as f64 * 100.0 / total_days as f64;
        (raw * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(AttendanceSummary::percentage_of(0, 0), 0.0);
        assert_eq!(AttendanceSummary::percentage_of(3, 4), 75.0);
        assert_eq!(AttendanceSummary::percentage_of(1, 3), 33.33);
    }

    #[test]
    fn test_filter_from_blank_query_values() {
        let filter: AttendanceFilter =
            serde_json::from_str(r#"{"std":"","div":"A","from":"2024-06-01","to":""}"#).unwrap();
        assert_eq!(filter.std, None);
        assert_eq!(filter.div.as_deref(), Some("A"));
        assert_eq!(filter.from, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(filter.to, None);
    }

    #[test]
    fn test_filter_matching() {
        let filter = AttendanceFilter {
            std: Some("5".to_string()),
            div: None,
            from: NaiveDate::from_ymd_opt(2024, 6, 1),
            to: NaiveDate::from_ymd_opt(2024, 6, 30),
        };
        assert!(filter.matches_class("5", "B"));
        assert!(!filter.matches_class("6", "B"));
        assert!(filter.contains_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
        assert!(!filter.contains_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()));
    }

    #[test]
    fn test_empty_register_is_invalid() {
        let req = MarkAttendanceRequest {
            std: "5".to_string(),
            div: "A".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            entries: vec![],
        };
        assert!(req.validate().is_err());
    }
}
