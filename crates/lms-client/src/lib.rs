//! # LMS Client
//!
//! Client-side half of portal authentication:
//!
//! - [`session`]: the [`AuthSessionStore`], persisted through a
//!   [`DurableStorage`] backend and hydrated on startup
//! - [`api`]: the [`AuthApi`] trait and its `reqwest` implementation
//! - [`guard`]: [`RouteGuard`] and the nested [`RouteTable`]
//! - [`storage`]: [`MemoryStorage`] and [`FileStorage`]

pub mod api;
pub mod error;
pub mod guard;
pub mod session;
pub mod storage;

pub use api::{AuthApi, HttpAuthApi};
pub use error::{ClientError, StorageError};
pub use guard::{GuardOutcome, GuardState, RouteGuard, RouteTable};
pub use session::{AuthSession, AuthSessionStore, PersistedSession};
pub use storage::{DurableStorage, FileStorage, MemoryStorage};
