//! Staff and student registration models, plus class allocations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::roles::Role;

/// Body of `POST /createUser`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 50))]
    pub fname: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub mname: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub lname: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 20))]
    pub phone: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: Role,
    #[validate(length(min = 1, max = 10))]
    pub gender: String,
    pub dob: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

/// A staff record ready for insertion; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewStaff {
    pub fname: String,
    pub mname: Option<String>,
    pub lname: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: Role,
    pub gender: String,
    pub dob: Option<NaiveDate>,
    pub address: Option<String>,
}

impl NewStaff {
    pub fn from_dto(dto: CreateUserDto, password_hash: String) -> Self {
        Self {
            fname: dto.fname,
            mname: dto.mname.filter(|m| !m.trim().is_empty()),
            lname: dto.lname,
            email: dto.email.trim().to_lowercase(),
            phone: dto.phone,
            password_hash,
            role: dto.role,
            gender: dto.gender,
            dob: dto.dob,
            address: dto.address,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 50))]
    pub fname: String,
    #[validate(length(min = 1, max = 50))]
    pub lname: String,
    #[validate(length(min = 6, max = 20))]
    pub father_phone: Option<String>,
    #[validate(length(min = 6, max = 20))]
    pub mother_phone: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub std: String,
    #[validate(length(min = 1, max = 10))]
    pub div: String,
    #[validate(length(min = 8))]
    pub password: String,
}

/// A student record ready for insertion.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub fname: String,
    pub lname: String,
    pub father_phone: Option<String>,
    pub mother_phone: Option<String>,
    pub std: String,
    pub div: String,
    pub password_hash: String,
}

impl NewStudent {
    pub fn from_dto(dto: CreateStudentDto, password_hash: String) -> Self {
        Self {
            fname: dto.fname,
            lname: dto.lname,
            father_phone: dto.father_phone,
            mother_phone: dto.mother_phone,
            std: dto.std,
            div: dto.div,
            password_hash,
        }
    }

    pub fn has_guardian_phone(&self) -> bool {
        self.father_phone.is_some() || self.mother_phone.is_some()
    }
}

/// A staff member assigned to a class in a given capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClassAllocation {
    pub user_id: i64,
    pub role: Role,
    pub std: String,
    pub div: String,
    /// Subject taught; only meaningful for `Teacher` allocations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// Body of `POST /allocate`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct AllocateDto {
    pub user_id: i64,
    pub role: Role,
    #[validate(length(min = 1, max = 10))]
    pub std: String,
    #[validate(length(min = 1, max = 10))]
    pub div: String,
    #[validate(length(max = 50))]
    pub subject: Option<String>,
}

impl From<AllocateDto> for ClassAllocation {
    fn from(dto: AllocateDto) -> Self {
        Self {
            user_id: dto.user_id,
            role: dto.role,
            std: dto.std,
            div: dto.div,
            subject: dto.subject,
        }
    }
}

/// Response of `GET /GetUserDataByRole/{userId}/{role}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRoleData {
    pub user_id: i64,
    pub role: Role,
    pub allocations: Vec<ClassAllocation>,
}
