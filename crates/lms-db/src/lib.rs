//! # LMS DB
//!
//! The credential store and directory behind the portal.
//!
//! [`Directory`] is implemented by [`PgDirectory`] (PostgreSQL via sqlx)
//! and [`MemoryDirectory`] (in-process, used for development without a
//! database and throughout the test suites).

pub mod directory;
pub mod memory;
pub mod postgres;

pub use directory::{Directory, StaffCredential, StudentCredential};
pub use memory::MemoryDirectory;
pub use postgres::{PgDirectory, connect, run_migrations};

pub use sqlx::PgPool;
