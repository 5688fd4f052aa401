//! Token issuing and verification.
//!
//! Tokens are HS256 JWTs signed with `JWT_SEC`. A token is valid only while
//! its signature verifies and the current time is still before `exp`; no
//! clock leeway is granted.
//!
//! # Example
//!
//! ```ignore
//! use lms_auth::{create_staff_token, verify_token};
//! use lms_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_staff_token(7, "SuperAdmin", "a@b.com", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role.as_deref(), Some("SuperAdmin"));
//! ```

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use lms_config::JwtConfig;
use lms_core::AppError;

use crate::claims::{Claims, UserType};

/// Signs a staff token embedding `{id, role, email}`.
pub fn create_staff_token(
    id: i64,
    role: &str,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let (iat, exp) = lifetime(jwt_config);

    sign_claims(
        &Claims {
            id,
            role: Some(role.to_string()),
            email: Some(email.to_string()),
            phone: None,
            user_type: UserType::Staff,
            exp,
            iat,
        },
        jwt_config,
    )
}

/// Signs a parent token embedding `{id, phone}`. Parent tokens carry no role.
pub fn create_parent_token(
    student_id: i64,
    phone: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let (iat, exp) = lifetime(jwt_config);

    sign_claims(
        &Claims {
            id: student_id,
            role: None,
            email: None,
            phone: Some(phone.to_string()),
            user_type: UserType::Parent,
            exp,
            iat,
        },
        jwt_config,
    )
}

/// Signs arbitrary claims as-is.
pub fn sign_claims(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry and returns the embedded claims.
///
/// # Errors
///
/// Returns a forbidden (403) error when the token is malformed, signed with
/// another secret, or expired.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::forbidden("Invalid or expired token"))?;

    // jsonwebtoken still accepts exp == now
    if claims.exp <= Utc::now().timestamp() as usize {
        return Err(AppError::forbidden("Invalid or expired token"));
    }

    Ok(claims)
}

fn lifetime(jwt_config: &JwtConfig) -> (usize, usize) {
    let now = Utc::now().timestamp() as usize;
    (now, now + jwt_config.token_expiry as usize)
}
