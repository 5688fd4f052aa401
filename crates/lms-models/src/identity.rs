//! Authenticated identities.
//!
//! A session belongs either to a staff member or to a parent. The parent
//! side is really a student record surfaced to a guardian, keyed by one of
//! the guardians' phone numbers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use lms_auth::UserType;

use crate::roles::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StaffIdentity {
    pub id: i64,
    pub fname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mname: Option<String>,
    pub lname: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub gender: String,
    pub dob: Option<NaiveDate>,
    pub address: Option<String>,
}

impl StaffIdentity {
    pub fn full_name(&self) -> String {
        match &self.mname {
            Some(m) if !m.is_empty() => format!("{} {} {}", self.fname, m, self.lname),
            _ => format!("{} {}", self.fname, self.lname),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParentIdentity {
    pub student_id: i64,
    pub fname: String,
    pub lname: String,
    pub father_phone: Option<String>,
    pub mother_phone: Option<String>,
    pub std: String,
    pub div: String,
}

impl ParentIdentity {
    /// Whether `phone` belongs to either guardian on record.
    pub fn has_guardian_phone(&self, phone: &str) -> bool {
        self.father_phone.as_deref() == Some(phone) || self.mother_phone.as_deref() == Some(phone)
    }
}

/// Either half of the identity union, discriminated by `userType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "userType", rename_all = "lowercase")]
pub enum Identity {
    Staff(StaffIdentity),
    Parent(ParentIdentity),
}

impl Identity {
    pub fn user_type(&self) -> UserType {
        match self {
            Identity::Staff(_) => UserType::Staff,
            Identity::Parent(_) => UserType::Parent,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Identity::Staff(user) => user.id,
            Identity::Parent(student) => student.student_id,
        }
    }

    /// Staff role, if this is a staff identity.
    pub fn role(&self) -> Option<Role> {
        match self {
            Identity::Staff(user) => Some(user.role),
            Identity::Parent(_) => None,
        }
    }
}
