//! Staff roles.
//!
//! One canonical enumeration is shared by the server, the role gates and the
//! client route guard. Role names travel as exactly these PascalCase strings
//! and role checks compare them case-sensitively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role reported for parent sessions in login responses. It is never a
/// [`Role`] and never appears in a token.
pub const PARENT_ROLE: &str = "Student";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    SuperAdmin,
    Admin,
    Principal,
    ClassTeacher,
    Teacher,
    Mentor,
    Librarian,
    Counselor,
    Staff,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Principal,
        Role::ClassTeacher,
        Role::Teacher,
        Role::Mentor,
        Role::Librarian,
        Role::Counselor,
        Role::Staff,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::Admin => "Admin",
            Role::Principal => "Principal",
            Role::ClassTeacher => "ClassTeacher",
            Role::Teacher => "Teacher",
            Role::Mentor => "Mentor",
            Role::Librarian => "Librarian",
            Role::Counselor => "Counselor",
            Role::Staff => "Staff",
        }
    }

    /// True when `role` (as carried by a token) names one of `allowed`.
    pub fn matches_any(role: &str, allowed: &[Role]) -> bool {
        allowed.iter().any(|r| r.as_str() == role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
