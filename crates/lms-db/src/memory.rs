//! In-process [`Directory`].
//!
//! Backs the server when `DATABASE_URL` is unset and every test suite.
//! Semantics follow [`PgDirectory`](crate::PgDirectory): emails compare
//! case-insensitively, attendance upserts per `(student, date)`, and the
//! report includes students with no recorded days.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use lms_core::AppError;
use lms_models::{
    AttendanceFilter, AttendanceSummary, ClassAllocation, MarkAttendanceRequest, NewStaff,
    NewStudent, ParentIdentity, Role, StaffIdentity,
};
use tokio::sync::RwLock;

use crate::directory::{
    Directory, StaffCredential, StudentCredential, duplicate_email, students_not_in_class,
};

#[derive(Default)]
struct Inner {
    staff: Vec<StaffCredential>,
    students: Vec<StudentCredential>,
    allocations: Vec<ClassAllocation>,
    attendance: BTreeMap<(i64, NaiveDate), bool>,
}

#[derive(Default)]
pub struct MemoryDirectory {
    inner: RwLock<Inner>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn find_staff_by_email(&self, email: &str) -> Result<Option<StaffCredential>, AppError> {
        let email = email.trim();
        let inner = self.inner.read().await;
        Ok(inner
            .staff
            .iter()
            .find(|c| c.user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_staff_by_id(&self, id: i64) -> Result<Option<StaffIdentity>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .staff
            .iter()
            .find(|c| c.user.id == id)
            .map(|c| c.user.clone()))
    }

    async fn find_student_by_phone(
        &self,
        phone: &str,
    ) -> Result<Option<StudentCredential>, AppError> {
        let phone = phone.trim();
        let inner = self.inner.read().await;
        Ok(inner
            .students
            .iter()
            .find(|c| c.student.has_guardian_phone(phone))
            .cloned())
    }

    async fn create_staff(&self, staff: NewStaff) -> Result<StaffIdentity, AppError> {
        let mut inner = self.inner.write().await;
        if inner
            .staff
            .iter()
            .any(|c| c.user.email.eq_ignore_ascii_case(&staff.email))
        {
            return Err(duplicate_email(&staff.email));
        }

        let id = inner.staff.iter().map(|c| c.user.id).max().unwrap_or(0) + 1;
        let user = StaffIdentity {
            id,
            fname: staff.fname,
            mname: staff.mname,
            lname: staff.lname,
            email: staff.email,
            phone: staff.phone,
            role: staff.role,
            gender: staff.gender,
            dob: staff.dob,
            address: staff.address,
        };
        inner.staff.push(StaffCredential {
            user: user.clone(),
            password_hash: staff.password_hash,
        });

        Ok(user)
    }

    async fn create_student(&self, student: NewStudent) -> Result<ParentIdentity, AppError> {
        if !student.has_guardian_phone() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "A student needs at least one guardian phone"
            )));
        }

        let mut inner = self.inner.write().await;
        let student_id = inner
            .students
            .iter()
            .map(|c| c.student.student_id)
            .max()
            .unwrap_or(0)
            + 1;
        let identity = ParentIdentity {
            student_id,
            fname: student.fname,
            lname: student.lname,
            father_phone: student.father_phone,
            mother_phone: student.mother_phone,
            std: student.std,
            div: student.div,
        };
        inner.students.push(StudentCredential {
            student: identity.clone(),
            password_hash: student.password_hash,
        });

        Ok(identity)
    }

    async fn list_staff(&self) -> Result<Vec<StaffIdentity>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.staff.iter().map(|c| c.user.clone()).collect())
    }

    async fn allocations_for(
        &self,
        user_id: i64,
        role: Role,
    ) -> Result<Vec<ClassAllocation>, AppError> {
        let inner = self.inner.read().await;
        let mut found: Vec<ClassAllocation> = inner
            .allocations
            .iter()
            .filter(|a| a.user_id == user_id && a.role == role)
            .cloned()
            .collect();
        found.sort_by(|a, b| (&a.std, &a.div, &a.subject).cmp(&(&b.std, &b.div, &b.subject)));
        Ok(found)
    }

    async fn allocate(&self, allocation: ClassAllocation) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        if !inner.staff.iter().any(|c| c.user.id == allocation.user_id) {
            return Err(AppError::not_found(anyhow::anyhow!(
                "User {} not found",
                allocation.user_id
            )));
        }
        if !inner.allocations.contains(&allocation) {
            inner.allocations.push(allocation);
        }
        Ok(())
    }

    async fn mark_attendance(
        &self,
        request: &MarkAttendanceRequest,
        _marked_by: i64,
    ) -> Result<usize, AppError> {
        let mut inner = self.inner.write().await;

        let strays: Vec<i64> = request
            .entries
            .iter()
            .map(|e| e.student_id)
            .filter(|id| {
                !inner.students.iter().any(|c| {
                    c.student.student_id == *id
                        && c.student.std == request.std
                        && c.student.div == request.div
                })
            })
            .collect();
        if !strays.is_empty() {
            return Err(students_not_in_class(&strays, &request.std, &request.div));
        }

        for entry in &request.entries {
            inner
                .attendance
                .insert((entry.student_id, request.date), entry.present);
        }

        Ok(request.entries.len())
    }

    async fn attendance_report(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceSummary>, AppError> {
        let inner = self.inner.read().await;

        let mut report: Vec<AttendanceSummary> = inner
            .students
            .iter()
            .map(|c| &c.student)
            .filter(|s| filter.matches_class(&s.std, &s.div))
            .map(|s| {
                let (total_days, present_days) = inner
                    .attendance
                    .range((s.student_id, NaiveDate::MIN)..=(s.student_id, NaiveDate::MAX))
                    .filter(|((_, date), _)| filter.contains_date(*date))
                    .fold((0i64, 0i64), |(total, present), (_, was_present)| {
                        (total + 1, present + i64::from(*was_present))
                    });

                AttendanceSummary {
                    student_id: s.student_id,
                    fname: s.fname.clone(),
                    lname: s.lname.clone(),
                    std: s.std.clone(),
                    div: s.div.clone(),
                    total_days,
                    present_days,
                    percentage: AttendanceSummary::percentage_of(present_days, total_days),
                }
            })
            .collect();

        report.sort_by(|a, b| {
            (&a.std, &a.div, &a.lname, &a.fname).cmp(&(&b.std, &b.div, &b.lname, &b.fname))
        });
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_models::AttendanceEntry;

    fn new_staff(email: &str, role: Role) -> NewStaff {
        NewStaff {
            fname: "Test".to_string(),
            mname: None,
            lname: "User".to_string(),
            email: email.to_string(),
            phone: "9000000000".to_string(),
            password_hash: "hash".to_string(),
            role,
            gender: "F".to_string(),
            dob: None,
            address: None,
        }
    }

    fn new_student(fname: &str, father: &str, std: &str, div: &str) -> NewStudent {
        NewStudent {
            fname: fname.to_string(),
            lname: "Kid".to_string(),
            father_phone: Some(father.to_string()),
            mother_phone: None,
            std: std.to_string(),
            div: div.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[tokio::test]
    async fn test_staff_lookup_is_case_insensitive() {
        let dir = MemoryDirectory::new();
        let created = dir
            .create_staff(new_staff("head@school.test", Role::SuperAdmin))
            .await
            .unwrap();

        let found = dir
            .find_staff_by_email("HEAD@school.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.user, created);
        assert!(dir.find_staff_by_email("nobody@school.test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_bad_request() {
        let dir = MemoryDirectory::new();
        dir.create_staff(new_staff("a@b.com", Role::Teacher))
            .await
            .unwrap();

        let err = dir
            .create_staff(new_staff("A@B.com", Role::Mentor))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
    }

    #[tokio::test]
    async fn test_student_found_by_either_guardian_phone() {
        let dir = MemoryDirectory::new();
        let mut student = new_student("Anu", "9111111111", "5", "A");
        student.mother_phone = Some("9222222222".to_string());
        let created = dir.create_student(student).await.unwrap();

        for phone in ["9111111111", "9222222222"] {
            let found = dir.find_student_by_phone(phone).await.unwrap().unwrap();
            assert_eq!(found.student, created);
        }
        assert!(dir.find_student_by_phone("9333333333").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_student_without_guardian_phone_is_rejected() {
        let dir = MemoryDirectory::new();
        let mut student = new_student("Anu", "9111111111", "5", "A");
        student.father_phone = None;
        assert!(dir.create_student(student).await.is_err());
    }

    #[tokio::test]
    async fn test_allocate_is_idempotent_and_requires_user() {
        let dir = MemoryDirectory::new();
        let user = dir
            .create_staff(new_staff("ct@school.test", Role::ClassTeacher))
            .await
            .unwrap();
        let allocation = ClassAllocation {
            user_id: user.id,
            role: Role::ClassTeacher,
            std: "5".to_string(),
            div: "A".to_string(),
            subject: None,
        };

        dir.allocate(allocation.clone()).await.unwrap();
        dir.allocate(allocation.clone()).await.unwrap();
        assert_eq!(
            dir.allocations_for(user.id, Role::ClassTeacher).await.unwrap(),
            vec![allocation.clone()]
        );
        assert!(dir.allocations_for(user.id, Role::Teacher).await.unwrap().is_empty());

        let err = dir
            .allocate(ClassAllocation {
                user_id: 999,
                ..allocation
            })
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }

    #[tokio::test]
    async fn test_attendance_upsert_and_report() {
        let dir = MemoryDirectory::new();
        let a = dir
            .create_student(new_student("Anu", "9111111111", "5", "A"))
            .await
            .unwrap();
        let b = dir
            .create_student(new_student("Bala", "9111111112", "5", "A"))
            .await
            .unwrap();
        dir.create_student(new_student("Chitra", "9111111113", "6", "A"))
            .await
            .unwrap();

        let register = |date, a_present, b_present| MarkAttendanceRequest {
            std: "5".to_string(),
            div: "A".to_string(),
            date,
            entries: vec![
                AttendanceEntry {
                    student_id: a.student_id,
                    present: a_present,
                },
                AttendanceEntry {
                    student_id: b.student_id,
                    present: b_present,
                },
            ],
        };

        assert_eq!(dir.mark_attendance(&register(day(3), true, false), 1).await.unwrap(), 2);
        assert_eq!(dir.mark_attendance(&register(day(4), true, true), 1).await.unwrap(), 2);
        // Re-marking a day overwrites it.
        dir.mark_attendance(&register(day(4), false, true), 1)
            .await
            .unwrap();

        let filter = AttendanceFilter {
            std: Some("5".to_string()),
            ..Default::default()
        };
        let report = dir.attendance_report(&filter).await.unwrap();
        assert_eq!(report.len(), 2);
        let anu = report.iter().find(|s| s.student_id == a.student_id).unwrap();
        assert_eq!((anu.total_days, anu.present_days), (2, 1));
        assert_eq!(anu.percentage, 50.0);

        let ranged = AttendanceFilter {
            from: Some(day(4)),
            ..filter
        };
        let report = dir.attendance_report(&ranged).await.unwrap();
        let bala = report.iter().find(|s| s.student_id == b.student_id).unwrap();
        assert_eq!((bala.total_days, bala.present_days), (1, 1));

        let everyone = dir.attendance_report(&AttendanceFilter::default()).await.unwrap();
        assert_eq!(everyone.len(), 3);
        assert_eq!(everyone[2].total_days, 0);
    }

    #[tokio::test]
    async fn test_attendance_rejects_students_from_other_class() {
        let dir = MemoryDirectory::new();
        let other = dir
            .create_student(new_student("Chitra", "9111111113", "6", "A"))
            .await
            .unwrap();

        let err = dir
            .mark_attendance(
                &MarkAttendanceRequest {
                    std: "5".to_string(),
                    div: "A".to_string(),
                    date: day(3),
                    entries: vec![AttendanceEntry {
                        student_id: other.student_id,
                        present: true,
                    }],
                },
                1,
            )
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
        assert!(dir.attendance_report(&AttendanceFilter::default()).await.unwrap()[0].total_days == 0);
    }
}
