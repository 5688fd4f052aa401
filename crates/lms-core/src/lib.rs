//! # LMS Core
//!
//! Foundational types shared by every crate of the LMS portal:
//!
//! - [`errors`]: the [`AppError`] type and the JSON error envelope
//! - [`password`]: bcrypt password hashing and verification
//! - [`serde`]: deserialization helpers for query parameters

pub mod errors;
pub mod password;
pub mod serde;

pub use errors::{AppError, ErrorBody};
pub use password::{hash_password, verify_password};
