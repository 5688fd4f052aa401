use anyhow::anyhow;
use axum_extra::extract::cookie::{Cookie, SameSite};
use lms_auth::{create_parent_token, create_staff_token};
use lms_config::{Environment, JwtConfig};
use lms_core::{AppError, verify_password};
use lms_db::Directory;
use tracing::{instrument, warn};

use super::model::{LoginRequest, ParentLoginData, ParentLoginRequest, StaffLoginData};
use crate::middleware::auth::TOKEN_COOKIE;

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn invalid_credentials(identifier: &str) -> AppError {
    warn!(
        security.event = "login_failed",
        reason = "invalid_password",
        identifier = %identifier,
        "Login rejected"
    );
    AppError::unauthorized("Invalid credentials")
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(directory, dto, jwt_config), fields(email = ?dto.email))]
    pub async fn login_staff(
        directory: &dyn Directory,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<StaffLoginData, AppError> {
        let (Some(email), Some(password)) = (
            non_blank(dto.email.as_deref()),
            non_blank(dto.password.as_deref()),
        ) else {
            return Err(AppError::missing_credentials(
                "Email and password are required",
            ));
        };

        let credential = directory
            .find_staff_by_email(email)
            .await?
            .ok_or_else(|| {
                warn!(security.event = "login_failed", reason = "unknown_account", "Login rejected");
                AppError::not_found(anyhow!("User not found"))
            })?;

        if !verify_password(password, &credential.password_hash)? {
            return Err(invalid_credentials(email));
        }

        let user = credential.user;
        let token = create_staff_token(user.id, user.role.as_str(), &user.email, jwt_config)?;

        tracing::info!(user_id = user.id, role = %user.role, "Staff logged in");

        Ok(StaffLoginData { user, token })
    }

    #[instrument(skip(directory, dto, jwt_config))]
    pub async fn login_parent(
        directory: &dyn Directory,
        dto: ParentLoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<ParentLoginData, AppError> {
        let (Some(phone), Some(password)) = (
            non_blank(dto.phone.as_deref()),
            non_blank(dto.password.as_deref()),
        ) else {
            return Err(AppError::missing_credentials(
                "Phone and password are required",
            ));
        };
        let phone = phone.trim();

        let credential = directory
            .find_student_by_phone(phone)
            .await?
            .ok_or_else(|| {
                warn!(security.event = "login_failed", reason = "unknown_account", "Parent login rejected");
                AppError::not_found(anyhow!("Student not found"))
            })?;

        if !verify_password(password, &credential.password_hash)? {
            return Err(invalid_credentials(phone));
        }

        let student = credential.student;
        let token = create_parent_token(student.student_id, phone, jwt_config)?;

        tracing::info!(student_id = student.student_id, "Parent logged in");

        Ok(ParentLoginData {
            student: student.into(),
            token,
        })
    }

    /// HTTP-only, `SameSite=Strict` cookie carrying `token`; `Secure` in
    /// production.
    pub fn session_cookie(
        token: String,
        jwt_config: &JwtConfig,
        environment: Environment,
    ) -> Cookie<'static> {
        Cookie::build((TOKEN_COOKIE, token))
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(environment.is_production())
            .path("/")
            .max_age(time::Duration::seconds(jwt_config.token_expiry))
            .build()
    }

    /// Cookie that makes the browser drop the session cookie.
    pub fn expired_cookie(environment: Environment) -> Cookie<'static> {
        Cookie::build((TOKEN_COOKIE, ""))
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(environment.is_production())
            .path("/")
            .max_age(time::Duration::ZERO)
            .expires(time::OffsetDateTime::UNIX_EPOCH)
            .build()
    }
}
