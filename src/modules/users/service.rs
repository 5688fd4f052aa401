use anyhow::anyhow;
use lms_core::{AppError, hash_password};
use lms_db::Directory;
use tracing::instrument;

use super::model::{
    ALLOCATABLE_ROLES, AllocateDto, ClassAllocation, CreateUserDto, NewStaff, Role,
    StaffIdentity, UserRoleData,
};

pub struct UserService;

impl UserService {
    #[instrument(skip(directory, dto), fields(email = %dto.email, role = %dto.role))]
    pub async fn create_user(
        directory: &dyn Directory,
        dto: CreateUserDto,
    ) -> Result<StaffIdentity, AppError> {
        let password_hash = hash_password(&dto.password)?;
        let user = directory
            .create_staff(NewStaff::from_dto(dto, password_hash))
            .await?;

        tracing::info!(user_id = user.id, "Staff account created");
        Ok(user)
    }

    #[instrument(skip(directory))]
    pub async fn get_all_users(directory: &dyn Directory) -> Result<Vec<StaffIdentity>, AppError> {
        directory.list_staff().await
    }

    #[instrument(skip(directory))]
    pub async fn get_user_data_by_role(
        directory: &dyn Directory,
        user_id: i64,
        role: &str,
    ) -> Result<UserRoleData, AppError> {
        let role: Role = role.parse().map_err(AppError::bad_request)?;

        if directory.find_staff_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found(anyhow!("User {user_id} not found")));
        }

        let allocations = directory.allocations_for(user_id, role).await?;

        Ok(UserRoleData {
            user_id,
            role,
            allocations,
        })
    }

    #[instrument(skip(directory))]
    pub async fn allocate(
        directory: &dyn Directory,
        dto: AllocateDto,
    ) -> Result<ClassAllocation, AppError> {
        if !ALLOCATABLE_ROLES.contains(&dto.role) {
            return Err(AppError::bad_request(anyhow!(
                "{} cannot be allocated to a class",
                dto.role
            )));
        }

        let subject = dto.subject.as_deref().map(str::trim).filter(|s| !s.is_empty());
        if dto.role == Role::Teacher && subject.is_none() {
            return Err(AppError::bad_request(anyhow!(
                "A subject is required for Teacher allocations"
            )));
        }

        let allocation = ClassAllocation {
            subject: subject.map(str::to_string),
            ..ClassAllocation::from(dto)
        };
        directory.allocate(allocation.clone()).await?;

        Ok(allocation)
    }
}
