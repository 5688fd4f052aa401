//! # LMS Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret (`JWT_SEC`) and lifetime
//! - [`environment`]: deployment mode (`NODE_ENV`)
//! - [`cors`]: allowed browser origins
//! - [`server`]: bind address and log directory
//!
//! # Example
//!
//! ```ignore
//! use lms_config::{Environment, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let secure_cookies = Environment::from_env().is_production();
//! ```

pub mod cors;
pub mod environment;
pub mod jwt;
pub mod server;

pub use cors::CorsConfig;
pub use environment::Environment;
pub use jwt::{DEFAULT_TOKEN_EXPIRY_SECS, JwtConfig};
pub use server::ServerConfig;
