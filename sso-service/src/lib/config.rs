use std::env;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub token: TokenConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    pub ttl_seconds: i64,
}

/// Argon2id cost for new digests. Existing digests keep their own cost.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Unprefixed variables, `__` between path segments.
/// Example: DATABASE__URL=postgres://... overrides database.url
fn env_overrides() -> Environment {
    Environment::default().separator("__")
}

fn default_max_connections() -> u32 {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, TOKEN__TTL_SECONDS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        Self::load_with(env_overrides(), &run_mode)
    }

    fn load_with(environment: Environment, run_mode: &str) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment)
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.token_ttl()?;
        config.password_hasher()?;

        Ok(config)
    }

    /// Lifetime of minted tokens.
    ///
    /// # Errors
    /// * `ConfigError::Message` - TTL is not a positive number of seconds
    pub fn token_ttl(&self) -> Result<Duration, ConfigError> {
        match Duration::try_seconds(self.token.ttl_seconds) {
            Some(ttl) if ttl > Duration::zero() => Ok(ttl),
            _ => Err(ConfigError::Message(format!(
                "token.ttl_seconds must be positive, got {}",
                self.token.ttl_seconds
            ))),
        }
    }

    /// # Errors
    /// * `ConfigError::Message` - Cost parameters rejected by Argon2
    pub fn password_hasher(&self) -> Result<auth::PasswordHasher, ConfigError> {
        auth::PasswordHasher::with_cost(
            self.password.memory_kib,
            self.password.iterations,
            self.password.parallelism,
        )
        .map_err(|e| ConfigError::Message(format!("password: {}", e)))
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.server.request_timeout_secs)
    }
}
