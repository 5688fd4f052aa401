use std::env;

#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|v| Self::split_origins(&v))
            .unwrap_or_else(|_| Self::split_origins("http://localhost:3000,http://localhost:5173"));

        Self { allowed_origins }
    }

    fn split_origins(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Self::split_origins("http://localhost:3000,http://localhost:5173"),
        }
    }
}
