//! # LMS Models
//!
//! Domain models and DTOs shared by the portal server, the client session
//! store and the CLI.
//!
//! - [`roles`]: the canonical staff [`Role`] set
//! - [`identity`]: [`StaffIdentity`], [`ParentIdentity`] and the [`Identity`] union
//! - [`auth`]: login requests and responses
//! - [`users`]: staff/student registration and class allocations
//! - [`attendance`]: attendance registers and reports
//! - [`response`]: the `{ success, message, data }` envelope

pub mod attendance;
pub mod auth;
pub mod identity;
pub mod response;
pub mod roles;
pub mod users;

pub use attendance::{
    AttendanceEntry, AttendanceFilter, AttendanceSummary, MarkAttendanceRequest,
    MarkAttendanceResult,
};
pub use auth::{
    Claims, LoginRequest, ParentLoginData, ParentLoginRequest, ParentProfile, StaffLoginData,
    UserType,
};
pub use identity::{Identity, ParentIdentity, StaffIdentity};
pub use response::{ApiResponse, MessageResponse};
pub use roles::{PARENT_ROLE, Role, UnknownRole};
pub use users::{
    AllocateDto, ClassAllocation, CreateStudentDto, CreateUserDto, NewStaff, NewStudent,
    UserRoleData,
};
