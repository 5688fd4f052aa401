//! # LMS Auth
//!
//! Session token types and the JWT primitives behind the Token Issuer and
//! Token Verifier:
//!
//! - [`claims`]: [`Claims`] and the [`UserType`] discriminant
//! - [`jwt`]: token signing ([`create_staff_token`], [`create_parent_token`])
//!   and verification ([`verify_token`])

pub mod claims;
pub mod jwt;

pub use claims::{Claims, UserType};
pub use jwt::{create_parent_token, create_staff_token, sign_claims, verify_token};
