pub mod attendance;
pub mod auth;
pub mod users;
