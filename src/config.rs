//! Configuration management for the notes API.
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Values are read once and cached for the process lifetime.

use std::env;
use std::sync::OnceLock;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Default connection string: a file-backed SQLite database in the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://database.db";

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub principal: PrincipalConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Identity used for requests that do not name a user.
#[derive(Debug, Clone)]
pub struct PrincipalConfig {
    pub default_user_id: i64,
    /// Username given to the default user if it has to be created at startup.
    pub default_username: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            server: ServerConfig {
                host: env_or("HOST", "0.0.0.0"),
                port: env_or("PORT", "5000").parse().unwrap_or(5000),
            },
            database: DatabaseConfig {
                url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", "10")
                    .parse()
                    .unwrap_or(10),
            },
            principal: PrincipalConfig {
                default_user_id: env_or("DEFAULT_USER_ID", "1").parse().unwrap_or(1),
                default_username: env_or("DEFAULT_USERNAME", "default"),
            },
        }
    }
}

/// Read an environment variable, treating unset and empty the same way.
fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_on_missing_key() {
        assert_eq!(env_or("NOTES_API_TEST_UNSET_KEY", "fallback"), "fallback");
    }

    #[test]
    fn test_env_or_ignores_blank_values() {
        env::set_var("NOTES_API_TEST_BLANK_KEY", "   ");
        assert_eq!(env_or("NOTES_API_TEST_BLANK_KEY", "fallback"), "fallback");
        env::remove_var("NOTES_API_TEST_BLANK_KEY");
    }
}
