pub use lms_models::users::{AllocateDto, ClassAllocation, CreateUserDto, NewStaff, UserRoleData};
pub use lms_models::{Role, StaffIdentity};

/// Roles a staff member can be allocated to a class in.
pub const ALLOCATABLE_ROLES: [Role; 3] = [Role::ClassTeacher, Role::Teacher, Role::Mentor];
