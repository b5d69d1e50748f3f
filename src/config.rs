//! Service configuration from environment variables.

use crate::error::AppError;

/// Deployment environment. The OpenAPI description is only mounted in
/// development.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl std::str::FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(AppError::Config(format!(
                "invalid APP_ENV: {} (expected development or production)",
                s
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub environment: Environment,
    pub max_connections: u32,
}

impl ServiceConfig {
    /// Read config from env with local-development defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/multischema".into());
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
        let environment = std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".into())
            .parse()?;
        let max_connections = match std::env::var("PG_MAX_CONNECTIONS") {
            Ok(v) => v
                .parse()
                .map_err(|_| AppError::Config(format!("invalid PG_MAX_CONNECTIONS: {}", v)))?,
            Err(_) => 5,
        };
        Ok(ServiceConfig {
            database_url,
            bind_addr,
            environment,
            max_connections,
        })
    }
}
