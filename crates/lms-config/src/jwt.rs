use std::env;

/// Development-only signing secret used when `JWT_SEC` is unset.
const DEVELOPMENT_SECRET: &str = "lms-portal-development-secret-change-me";

/// Tokens live for 24 hours unless `JWT_EXPIRY_SECS` says otherwise.
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SEC").unwrap_or_else(|_| {
            tracing::warn!("JWT_SEC is not set; falling back to the development secret");
            DEVELOPMENT_SECRET.to_string()
        });

        Self {
            secret,
            token_expiry: env::var("JWT_EXPIRY_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_EXPIRY_SECS),
        }
    }

    /// True when the server would sign with the built-in development secret.
    pub fn uses_development_secret(&self) -> bool {
        self.secret == DEVELOPMENT_SECRET
    }
}
