//! # LMS Portal
//!
//! REST API for the LMS admin and parent portal, built on axum.
//!
//! Staff sign in with email and password, parents with a guardian phone and
//! password. Both receive a 24-hour signed token, returned in the body and
//! as an HTTP-only `token` cookie. Protected routes accept either transport.
//!
//! ```text
//! src/
//! ├── middleware/      # token verifier and role gates
//! ├── modules/
//! │   ├── auth/        # login, parentLogin, logout, me
//! │   ├── users/       # staff accounts and class allocations
//! │   └── attendance/  # attendance marking and reports
//! ├── docs.rs          # OpenAPI document, served at /scalar
//! ├── logging.rs       # request logging and subscriber setup
//! ├── router.rs
//! ├── state.rs
//! └── validator.rs     # ValidatedJson extractor
//! ```
//!
//! Each feature module has `controller.rs` (handlers), `service.rs`
//! (business rules), `model.rs` and `router.rs`.
//!
//! ## Access rules
//!
//! | Route | Allowed |
//! |-------|---------|
//! | `POST /api/v1/login`, `POST /api/v1/parentLogin`, `GET /api/v1/logout` | anyone |
//! | `GET /api/v1/me`, `GET /api/v1/GetUserDataByRole/{userId}/{role}`, `GET /api/v1/getAllAttendanceReport` | any valid token |
//! | `POST /api/v1/createUser`, `GET /api/v1/getAllUsers`, `POST /api/v1/allocate` | `SuperAdmin` |
//! | `POST /api/v1/markAttendance` | `ClassTeacher`, `SuperAdmin` |
//!
//! A missing or malformed token is answered with 401, a token that fails
//! verification with 403, and a role outside the allow-list with 403.

pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use lms_auth;
pub use lms_config;
pub use lms_core;
pub use lms_db;
pub use lms_models;
