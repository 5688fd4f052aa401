//! # LMS CLI
//!
//! Account bootstrap for the LMS portal. The first `SuperAdmin` has to be
//! created out of band, since `createUser` is only reachable with a
//! `SuperAdmin` token; parent logins need students on record.
//!
//! ```ignore
//! use lms_cli::accounts::create_staff;
//!
//! let user = create_staff(&directory, dto).await?;
//! ```

pub mod accounts;
