//! Request gates.
//!
//! - [`auth`]: the token verifier ([`auth::require_auth`]) and the
//!   [`auth::AuthUser`] extractor
//! - [`role`]: role gates layered inside the token verifier
//! - [`errors`]: adds the error chain to error bodies outside production
//!
//! A protected router stacks them so the verifier runs first:
//!
//! ```ignore
//! Router::new()
//!     .route("/getAllUsers", get(get_all_users))
//!     .route_layer(middleware::from_fn(require_super_admin))
//!     .route_layer(middleware::from_fn_with_state(state, require_auth));
//! ```

pub mod auth;
pub mod errors;
pub mod role;
