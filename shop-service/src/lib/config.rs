use std::env;

use auth::PasswordError;
use auth::PasswordHasher;
use auth::SigningSecret;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Secrets shorter than this are accepted but reported at startup.
const RECOMMENDED_SECRET_LENGTH: usize = 32;

/// Longest accepted access token lifetime (one year).
const MAX_TOKEN_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub secret: SigningSecret,
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: i64,
    #[serde(default)]
    pub password: PasswordConfig,
}

/// Argon2id cost parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

fn default_max_connections() -> u32 {
    5
}

fn default_token_ttl_seconds() -> i64 {
    7 * 24 * 60 * 60
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SHOP_AUTH__SECRET, SHOP_SERVER__HTTP_PORT, etc.)
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
            // Example: SHOP_AUTH__SECRET=... overrides auth.secret
            .add_source(
                Environment::with_prefix("SHOP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.secret.is_empty() {
            return Err(ConfigError::Message(
                "auth.secret must not be empty".to_string(),
            ));
        }

        if self.auth.secret.len() < RECOMMENDED_SECRET_LENGTH {
            tracing::warn!(
                recommended_bytes = RECOMMENDED_SECRET_LENGTH,
                "auth.secret is shorter than recommended for HS256"
            );
        }

        self.auth.token_ttl()?;
        self.auth.password.build_hasher().map_err(|e| {
            ConfigError::Message(format!("auth.password is invalid: {}", e))
        })?;

        Ok(())
    }
}

impl AuthConfig {
    /// Lifetime of issued access tokens.
    ///
    /// # Errors
    /// * `ConfigError::Message` - TTL is not positive or longer than a year
    pub fn token_ttl(&self) -> Result<Duration, ConfigError> {
        if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&self.token_ttl_seconds) {
            return Err(ConfigError::Message(format!(
                "auth.token_ttl_seconds must be between 1 and {}",
                MAX_TOKEN_TTL_SECONDS
            )));
        }

        Ok(Duration::seconds(self.token_ttl_seconds))
    }
}

impl PasswordConfig {
    pub fn build_hasher(&self) -> Result<PasswordHasher, PasswordError> {
        PasswordHasher::with_params(self.memory_kib, self.iterations, self.parallelism)
    }
}
