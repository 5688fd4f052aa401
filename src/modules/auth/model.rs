use serde::Serialize;
use utoipa::ToSchema;

pub use lms_models::auth::{
    Claims, LoginRequest, ParentLoginData, ParentLoginRequest, ParentProfile, StaffLoginData,
    UserType,
};
pub use lms_models::{ApiResponse, MessageResponse};

/// Error envelope, documented for OpenAPI.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}
