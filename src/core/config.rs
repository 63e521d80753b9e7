//! Runtime configuration read from environment variables.
//!
//! Required variables are validated once at startup; a missing one is a
//! fatal error before the bot enters its listening loop.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::mysql::MySqlConnectOptions;

/// MySQL connection settings for the `downloads` table.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database host (`DB_HOST`, defaults to localhost)
    pub host: String,
    /// Database user (`DB_USER`)
    pub user: String,
    /// Database password (`DB_PASS`)
    pub password: String,
    /// Database name (`DB_NAME`)
    pub database: String,
}

impl DbConfig {
    /// Connection options for a fresh per-call connection.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Process-wide configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token (`BOT_TOKEN`)
    pub bot_token: String,
    pub db: DbConfig,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// # Errors
    /// Returns an error naming the first missing required variable
    /// (`BOT_TOKEN`, `DB_USER`, `DB_PASS`, `DB_NAME`).
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bot_token: required_var("BOT_TOKEN")?,
            db: DbConfig {
                host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                user: required_var("DB_USER")?,
                password: required_var("DB_PASS")?,
                database: required_var("DB_NAME")?,
            },
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    let value = env::var(name).with_context(|| format!("{} environment variable is not set", name))?;
    if value.is_empty() {
        anyhow::bail!("{} environment variable is empty", name);
    }
    Ok(value)
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Connect timeout for the media download client (in seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 15;

    /// Read timeout for the media download stream (in seconds)
    pub const READ_TIMEOUT_SECS: u64 = 30;

    /// Request timeout for Telegram uploads (in seconds)
    /// Generous to tolerate large video payloads.
    pub const UPLOAD_TIMEOUT_SECS: u64 = 120;

    /// Download connect timeout duration
    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }

    /// Download read timeout duration
    pub fn read_timeout() -> Duration {
        Duration::from_secs(READ_TIMEOUT_SECS)
    }

    /// Telegram upload timeout duration
    pub fn upload_timeout() -> Duration {
        Duration::from_secs(UPLOAD_TIMEOUT_SECS)
    }
}
