use std::fmt;
use std::sync::Arc;

use lms_config::{CorsConfig, Environment, JwtConfig};
use lms_db::{Directory, MemoryDirectory, PgDirectory};

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn Directory>,
    pub jwt_config: JwtConfig,
    pub environment: Environment,
    pub cors_config: CorsConfig,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("environment", &self.environment)
            .field("cors_config", &self.cors_config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(directory: Arc<dyn Directory>, jwt_config: JwtConfig) -> Self {
        Self {
            directory,
            jwt_config,
            environment: Environment::default(),
            cors_config: CorsConfig::default(),
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }
}

/// Builds the state from the environment. Without `DATABASE_URL` the server
/// runs on an empty in-memory directory.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let environment = Environment::from_env();
    let jwt_config = JwtConfig::from_env();

    if environment.is_production() && jwt_config.uses_development_secret() {
        anyhow::bail!("JWT_SEC must be set in production");
    }

    let directory: Arc<dyn Directory> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = lms_db::connect(&url).await?;
            lms_db::run_migrations(&pool).await?;
            tracing::info!("Connected to PostgreSQL and applied migrations");
            Arc::new(PgDirectory::new(pool))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL is not set; using the in-memory directory");
            Arc::new(MemoryDirectory::new())
        }
    };

    Ok(AppState {
        directory,
        jwt_config,
        environment,
        cors_config: CorsConfig::from_env(),
    })
}
