use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::attendance::model::{
    AttendanceEntry, AttendanceFilter, AttendanceSummary, MarkAttendanceRequest,
    MarkAttendanceResult,
};
use crate::modules::auth::model::{
    Claims, ErrorResponse, LoginRequest, MessageResponse, ParentLoginData, ParentLoginRequest,
    ParentProfile, StaffLoginData, UserType,
};
use crate::modules::users::model::{
    AllocateDto, ClassAllocation, CreateUserDto, Role, StaffIdentity, UserRoleData,
};
use lms_models::ParentIdentity;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::parent_login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::me,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_all_users,
        crate::modules::users::controller::get_user_data_by_role,
        crate::modules::users::controller::allocate,
        crate::modules::attendance::controller::mark_attendance,
        crate::modules::attendance::controller::get_all_attendance_report,
    ),
    components(
        schemas(
            Role,
            UserType,
            Claims,
            StaffIdentity,
            ParentIdentity,
            ParentProfile,
            LoginRequest,
            ParentLoginRequest,
            StaffLoginData,
            ParentLoginData,
            MessageResponse,
            ErrorResponse,
            CreateUserDto,
            AllocateDto,
            ClassAllocation,
            UserRoleData,
            AttendanceEntry,
            MarkAttendanceRequest,
            MarkAttendanceResult,
            AttendanceFilter,
            AttendanceSummary,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Staff and parent login"),
        (name = "Users", description = "Staff accounts and class allocations"),
        (name = "Attendance", description = "Attendance marking and reports")
    ),
    info(
        title = "LMS Portal API",
        version = "0.1.0",
        description = "Admin and parent portal API with role-gated routes.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
