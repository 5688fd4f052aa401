use anyhow::anyhow;
use lms_core::AppError;
use lms_db::Directory;
use lms_models::Role;
use tracing::instrument;

use super::model::{AttendanceFilter, AttendanceSummary, MarkAttendanceRequest, MarkAttendanceResult};

pub struct AttendanceService;

impl AttendanceService {
    /// Records a class register. Class teachers may only mark the classes
    /// they are allocated to; super admins may mark any class.
    #[instrument(skip(directory, request), fields(std = %request.std, div = %request.div))]
    pub async fn mark_attendance(
        directory: &dyn Directory,
        marked_by: i64,
        role: Option<&str>,
        request: MarkAttendanceRequest,
    ) -> Result<MarkAttendanceResult, AppError> {
        if role == Some(Role::ClassTeacher.as_str()) {
            let allocated = directory
                .allocations_for(marked_by, Role::ClassTeacher)
                .await?
                .iter()
                .any(|a| a.std == request.std && a.div == request.div);

            if !allocated {
                return Err(AppError::forbidden(format!(
                    "You are not the class teacher of {}-{}",
                    request.std, request.div
                )));
            }
        }

        let recorded = directory.mark_attendance(&request, marked_by).await?;
        tracing::info!(recorded, date = %request.date, "Attendance recorded");

        Ok(MarkAttendanceResult { recorded })
    }

    #[instrument(skip(directory))]
    pub async fn get_report(
        directory: &dyn Directory,
        filter: AttendanceFilter,
    ) -> Result<Vec<AttendanceSummary>, AppError> {
        if filter.from.zip(filter.to).is_some_and(|(from, to)| from > to) {
            return Err(AppError::bad_request(anyhow!(
                "`from` must not be after `to`"
            )));
        }

        directory.attendance_report(&filter).await
    }
}
