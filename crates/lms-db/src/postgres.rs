//! PostgreSQL-backed [`Directory`].

use std::collections::HashSet;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use lms_core::AppError;
use lms_models::{
    AttendanceFilter, AttendanceSummary, ClassAllocation, MarkAttendanceRequest, NewStaff,
    NewStudent, ParentIdentity, Role, StaffIdentity,
};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use crate::directory::{
    Directory, StaffCredential, StudentCredential, duplicate_email, students_not_in_class,
};

/// Opens a connection pool for `database_url`.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

const STAFF_COLUMNS: &str =
    "id, fname, mname, lname, email, phone, role, gender, dob, address, password_hash";

const STUDENT_COLUMNS: &str =
    "id, fname, lname, father_phone, mother_phone, std, division, password_hash";

#[derive(FromRow)]
struct StaffRow {
    id: i64,
    fname: String,
    mname: Option<String>,
    lname: String,
    email: String,
    phone: String,
    role: String,
    gender: String,
    dob: Option<NaiveDate>,
    address: Option<String>,
    password_hash: String,
}

impl StaffRow {
    fn into_credential(self) -> Result<StaffCredential, AppError> {
        let role = self
            .role
            .parse::<Role>()
            .with_context(|| format!("users.role of user {} is invalid", self.id))?;

        Ok(StaffCredential {
            user: StaffIdentity {
                id: self.id,
                fname: self.fname,
                mname: self.mname,
                lname: self.lname,
                email: self.email,
                phone: self.phone,
                role,
                gender: self.gender,
                dob: self.dob,
                address: self.address,
            },
            password_hash: self.password_hash,
        })
    }
}

#[derive(FromRow)]
struct StudentRow {
    id: i64,
    fname: String,
    lname: String,
    father_phone: Option<String>,
    mother_phone: Option<String>,
    std: String,
    division: String,
    password_hash: String,
}

impl From<StudentRow> for StudentCredential {
    fn from(row: StudentRow) -> Self {
        StudentCredential {
            student: ParentIdentity {
                student_id: row.id,
                fname: row.fname,
                lname: row.lname,
                father_phone: row.father_phone,
                mother_phone: row.mother_phone,
                std: row.std,
                div: row.division,
            },
            password_hash: row.password_hash,
        }
    }
}

#[derive(FromRow)]
struct AllocationRow {
    user_id: i64,
    role: String,
    std: String,
    division: String,
    subject: String,
}

impl AllocationRow {
    fn into_allocation(self) -> Result<ClassAllocation, AppError> {
        Ok(ClassAllocation {
            user_id: self.user_id,
            role: self.role.parse::<Role>().context("Invalid allocation role")?,
            std: self.std,
            div: self.division,
            subject: (!self.subject.is_empty()).then_some(self.subject),
        })
    }
}

#[derive(FromRow)]
struct SummaryRow {
    student_id: i64,
    fname: String,
    lname: String,
    std: String,
    division: String,
    total_days: i64,
    present_days: i64,
}

impl From<SummaryRow> for AttendanceSummary {
    fn from(row: SummaryRow) -> Self {
        AttendanceSummary {
            percentage: AttendanceSummary::percentage_of(row.present_days, row.total_days),
            student_id: row.student_id,
            fname: row.fname,
            lname: row.lname,
            std: row.std,
            div: row.division,
            total_days: row.total_days,
            present_days: row.present_days,
        }
    }
}

#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[async_trait]
impl Directory for PgDirectory {
    #[instrument(skip(self))]
    async fn find_staff_by_email(&self, email: &str) -> Result<Option<StaffCredential>, AppError> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        let row = sqlx::query_as::<_, StaffRow>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to look up staff by email")?;

        row.map(StaffRow::into_credential).transpose()
    }

    #[instrument(skip(self))]
    async fn find_staff_by_id(&self, id: i64) -> Result<Option<StaffIdentity>, AppError> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, StaffRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch staff")?;

        Ok(row
            .map(StaffRow::into_credential)
            .transpose()?
            .map(|c| c.user))
    }

    #[instrument(skip(self))]
    async fn find_student_by_phone(
        &self,
        phone: &str,
    ) -> Result<Option<StudentCredential>, AppError> {
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students \
             WHERE father_phone = $1 OR mother_phone = $1 \
             ORDER BY id LIMIT 1"
        );
        let row = sqlx::query_as::<_, StudentRow>(&sql)
            .bind(phone.trim())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to look up student by phone")?;

        Ok(row.map(StudentCredential::from))
    }

    #[instrument(skip(self, staff), fields(email = %staff.email, role = %staff.role))]
    async fn create_staff(&self, staff: NewStaff) -> Result<StaffIdentity, AppError> {
        let sql = format!(
            "INSERT INTO users (fname, mname, lname, email, phone, password_hash, role, gender, dob, address) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {STAFF_COLUMNS}"
        );
        let row = sqlx::query_as::<_, StaffRow>(&sql)
            .bind(&staff.fname)
            .bind(&staff.mname)
            .bind(&staff.lname)
            .bind(&staff.email)
            .bind(&staff.phone)
            .bind(&staff.password_hash)
            .bind(staff.role.as_str())
            .bind(&staff.gender)
            .bind(staff.dob)
            .bind(&staff.address)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    duplicate_email(&staff.email)
                } else {
                    AppError::internal(anyhow::Error::new(err).context("Failed to insert staff"))
                }
            })?;

        Ok(row.into_credential()?.user)
    }

    #[instrument(skip(self, student), fields(std = %student.std, div = %student.div))]
    async fn create_student(&self, student: NewStudent) -> Result<ParentIdentity, AppError> {
        if !student.has_guardian_phone() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "A student needs at least one guardian phone"
            )));
        }

        let sql = format!(
            "INSERT INTO students (fname, lname, father_phone, mother_phone, std, division, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {STUDENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, StudentRow>(&sql)
            .bind(&student.fname)
            .bind(&student.lname)
            .bind(&student.father_phone)
            .bind(&student.mother_phone)
            .bind(&student.std)
            .bind(&student.div)
            .bind(&student.password_hash)
            .fetch_one(&self.pool)
            .await
            .context("Failed to insert student")?;

        Ok(StudentCredential::from(row).student)
    }

    #[instrument(skip(self))]
    async fn list_staff(&self) -> Result<Vec<StaffIdentity>, AppError> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM users ORDER BY id");
        let rows = sqlx::query_as::<_, StaffRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list staff")?;

        rows.into_iter()
            .map(|row| row.into_credential().map(|c| c.user))
            .collect()
    }

    #[instrument(skip(self))]
    async fn allocations_for(
        &self,
        user_id: i64,
        role: Role,
    ) -> Result<Vec<ClassAllocation>, AppError> {
        let rows = sqlx::query_as::<_, AllocationRow>(
            "SELECT user_id, role, std, division, subject FROM class_allocations \
             WHERE user_id = $1 AND role = $2 \
             ORDER BY std, division, subject",
        )
        .bind(user_id)
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch allocations")?;

        rows.into_iter().map(AllocationRow::into_allocation).collect()
    }

    #[instrument(skip(self))]
    async fn allocate(&self, allocation: ClassAllocation) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO class_allocations (user_id, role, std, division, subject) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, role, std, division, subject) DO NOTHING",
        )
        .bind(allocation.user_id)
        .bind(allocation.role.as_str())
        .bind(&allocation.std)
        .bind(&allocation.div)
        .bind(allocation.subject.as_deref().unwrap_or(""))
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                AppError::not_found(anyhow::anyhow!("User {} not found", allocation.user_id))
            } else {
                AppError::internal(anyhow::Error::new(err).context("Failed to allocate"))
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self, request), fields(std = %request.std, div = %request.div, date = %request.date))]
    async fn mark_attendance(
        &self,
        request: &MarkAttendanceRequest,
        marked_by: i64,
    ) -> Result<usize, AppError> {
        let ids: Vec<i64> = request.entries.iter().map(|e| e.student_id).collect();

        let enrolled: HashSet<i64> = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM students WHERE std = $1 AND division = $2 AND id = ANY($3)",
        )
        .bind(&request.std)
        .bind(&request.div)
        .bind(ids.as_slice())
        .fetch_all(&self.pool)
        .await
        .context("Failed to check class enrolment")?
        .into_iter()
        .collect();

        let strays: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !enrolled.contains(id))
            .collect();
        if !strays.is_empty() {
            return Err(students_not_in_class(&strays, &request.std, &request.div));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to open transaction")?;

        for entry in &request.entries {
            sqlx::query(
                "INSERT INTO attendance (student_id, attendance_date, present, marked_by) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (student_id, attendance_date) \
                 DO UPDATE SET present = EXCLUDED.present, marked_by = EXCLUDED.marked_by, marked_at = NOW()",
            )
            .bind(entry.student_id)
            .bind(request.date)
            .bind(entry.present)
            .bind(marked_by)
            .execute(&mut *tx)
            .await
            .context("Failed to record attendance")?;
        }

        tx.commit().await.context("Failed to commit attendance")?;

        Ok(request.entries.len())
    }

    #[instrument(skip(self))]
    async fn attendance_report(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceSummary>, AppError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT s.id AS student_id, s.fname, s.lname, s.std, s.division,
                   COUNT(a.id) AS total_days,
                   COUNT(a.id) FILTER (WHERE a.present) AS present_days
            FROM students s
            LEFT JOIN attendance a
                   ON a.student_id = s.id
                  AND ($3::date IS NULL OR a.attendance_date >= $3)
                  AND ($4::date IS NULL OR a.attendance_date <= $4)
            WHERE ($1::text IS NULL OR s.std = $1)
              AND ($2::text IS NULL OR s.division = $2)
            GROUP BY s.id
            ORDER BY s.std, s.division, s.lname, s.fname
            "#,
        )
        .bind(&filter.std)
        .bind(&filter.div)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await
        .context("Failed to build attendance report")?;

        Ok(rows.into_iter().map(AttendanceSummary::from).collect())
    }
}
