use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::controller::{allocate, create_user, get_all_users, get_user_data_by_role};
use crate::middleware::role::require_super_admin;
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/createUser", post(create_user))
        .route("/getAllUsers", get(get_all_users))
        .route("/allocate", post(allocate))
        .route_layer(middleware::from_fn(require_super_admin))
        .route(
            "/GetUserDataByRole/{userId}/{role}",
            get(get_user_data_by_role),
        )
}
