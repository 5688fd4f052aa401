//! Validated account creation against any [`Directory`].

use anyhow::{Result, bail};
use lms_core::hash_password;
use lms_db::Directory;
use lms_models::{
    CreateStudentDto, CreateUserDto, NewStaff, NewStudent, ParentIdentity, StaffIdentity,
};
use validator::Validate;

pub async fn create_staff(directory: &dyn Directory, dto: CreateUserDto) -> Result<StaffIdentity> {
    dto.validate()?;

    let password_hash = hash_password(&dto.password).map_err(|e| e.error)?;
    let user = directory
        .create_staff(NewStaff::from_dto(dto, password_hash))
        .await
        .map_err(|e| e.error)?;

    Ok(user)
}

pub async fn create_student(
    directory: &dyn Directory,
    dto: CreateStudentDto,
) -> Result<ParentIdentity> {
    dto.validate()?;
    if dto.father_phone.is_none() && dto.mother_phone.is_none() {
        bail!("At least one of --father-phone or --mother-phone is required");
    }

    let password_hash = hash_password(&dto.password).map_err(|e| e.error)?;
    let student = directory
        .create_student(NewStudent::from_dto(dto, password_hash))
        .await
        .map_err(|e| e.error)?;

    Ok(student)
}
