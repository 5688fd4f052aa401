use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{login, logout, me, parent_login};
use crate::state::AppState;

/// Login and logout; no token required.
pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/parentLogin", post(parent_login))
        .route("/logout", get(logout))
}

/// Session routes that need a verified token.
pub fn init_session_router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
