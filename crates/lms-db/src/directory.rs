//! The [`Directory`] trait: every persistence operation the portal needs,
//! exposed as typed, named calls.

use async_trait::async_trait;
use lms_core::AppError;
use lms_models::{
    AttendanceFilter, AttendanceSummary, ClassAllocation, MarkAttendanceRequest, NewStaff,
    NewStudent, ParentIdentity, Role, StaffIdentity,
};

/// A staff account together with its stored bcrypt hash.
#[derive(Debug, Clone)]
pub struct StaffCredential {
    pub user: StaffIdentity,
    pub password_hash: String,
}

/// A student account, reachable by either guardian phone.
#[derive(Debug, Clone)]
pub struct StudentCredential {
    pub student: ParentIdentity,
    pub password_hash: String,
}

#[async_trait]
pub trait Directory: Send + Sync {
    async fn find_staff_by_email(&self, email: &str) -> Result<Option<StaffCredential>, AppError>;

    async fn find_staff_by_id(&self, id: i64) -> Result<Option<StaffIdentity>, AppError>;

    /// Looks a student up by father's or mother's phone.
    async fn find_student_by_phone(
        &self,
        phone: &str,
    ) -> Result<Option<StudentCredential>, AppError>;

    /// Fails with 400 when the email is already registered.
    async fn create_staff(&self, staff: NewStaff) -> Result<StaffIdentity, AppError>;

    async fn create_student(&self, student: NewStudent) -> Result<ParentIdentity, AppError>;

    async fn list_staff(&self) -> Result<Vec<StaffIdentity>, AppError>;

    async fn allocations_for(
        &self,
        user_id: i64,
        role: Role,
    ) -> Result<Vec<ClassAllocation>, AppError>;

    /// Re-allocating an identical assignment is a no-op.
    async fn allocate(&self, allocation: ClassAllocation) -> Result<(), AppError>;

    /// Upserts one day's register and returns the number of entries written.
    /// Fails with 400 if any student is not in the given class.
    async fn mark_attendance(
        &self,
        request: &MarkAttendanceRequest,
        marked_by: i64,
    ) -> Result<usize, AppError>;

    async fn attendance_report(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceSummary>, AppError>;
}

pub(crate) fn duplicate_email(email: &str) -> AppError {
    AppError::bad_request(anyhow::anyhow!("A user with email {email} already exists"))
}

pub(crate) fn students_not_in_class(ids: &[i64], std: &str, div: &str) -> AppError {
    let ids = ids
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    AppError::bad_request(anyhow::anyhow!(
        "Students [{ids}] are not enrolled in {std}-{div}"
    ))
}
