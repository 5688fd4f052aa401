//! Login request/response models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub use lms_auth::{Claims, UserType};

use crate::identity::{ParentIdentity, StaffIdentity};
use crate::roles::PARENT_ROLE;

/// Staff login body.
///
/// Both fields are optional on the wire so an absent value is reported as
/// missing credentials rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(max = 254))]
    #[schema(example = "admin@school.test")]
    pub email: Option<String>,
    #[validate(length(max = 128))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct ParentLoginRequest {
    #[validate(length(max = 20))]
    #[schema(example = "9000000000")]
    pub phone: Option<String>,
    #[validate(length(max = 128))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StaffLoginData {
    pub user: StaffIdentity,
    pub token: String,
}

/// Student record as returned to a guardian, tagged with the synthetic
/// `"Student"` role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParentProfile {
    #[serde(flatten)]
    pub student: ParentIdentity,
    pub role: String,
}

impl From<ParentIdentity> for ParentProfile {
    fn from(student: ParentIdentity) -> Self {
        Self {
            student,
            role: PARENT_ROLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParentLoginData {
    pub student: ParentProfile,
    pub token: String,
}
