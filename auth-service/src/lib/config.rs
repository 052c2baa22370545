use std::env;

use auth::PasswordError;
use auth::PasswordHasher;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::user::service::DEFAULT_PASSWORD_MIN_LENGTH;

/// Shortest signing secret accepted at startup.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Postgres URL; the in-memory store is used when absent
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,
}

impl JwtConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.ttl_minutes)
    }
}

/// Password policy and Argon2 work factor.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PasswordConfig {
    pub min_length: usize,
    pub memory_cost_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_PASSWORD_MIN_LENGTH,
            memory_cost_kib: argon2_defaults::M_COST,
            time_cost: argon2_defaults::T_COST,
            parallelism: argon2_defaults::P_COST,
        }
    }
}

impl PasswordConfig {
    pub fn hasher(&self) -> Result<PasswordHasher, PasswordError> {
        PasswordHasher::with_cost(self.memory_cost_kib, self.time_cost, self.parallelism)
    }
}

// Argon2 crate defaults (OWASP minimums for Argon2id)
mod argon2_defaults {
    pub const M_COST: u32 = 19 * 1024;
    pub const T_COST: u32 = 2;
    pub const P_COST: u32 = 1;
}

fn default_max_connections() -> u32 {
    10
}

fn default_ttl_minutes() -> i64 {
    15
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        if self.jwt.ttl_minutes <= 0 {
            return Err(ConfigError::Message(
                "jwt.ttl_minutes must be a positive integer".to_string(),
            ));
        }

        if self.password.min_length == 0 {
            return Err(ConfigError::Message(
                "password.min_length must be positive".to_string(),
            ));
        }

        self.password
            .hasher()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: ServerConfig { http_port: 8080 },
            database: DatabaseConfig::default(),
            jwt: JwtConfig {
                secret: "test-secret-key-for-jwt-signing-at-least-32-bytes".to_string(),
                ttl_minutes: 15,
            },
            password: PasswordConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = config();
        assert!(config.validate().is_ok());
        assert_eq!(config.jwt.ttl(), chrono::Duration::minutes(15));
        assert_eq!(config.password.min_length, 6);
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = config();
        config.jwt.secret = "too-short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let mut config = config();
        config.jwt.ttl_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_password_cost_rejected() {
        let mut config = config();
        config.password.parallelism = 0;
        assert!(config.validate().is_err());
    }
}
