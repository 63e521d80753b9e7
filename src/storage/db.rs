//! Download records in MySQL.
//!
//! The entire persistence surface is one parameterized INSERT into the
//! `downloads` table. Each write opens a fresh connection and closes it
//! unconditionally — fine at this traffic volume; a pool would replace it
//! if that ever changes.

use async_trait::async_trait;
use sqlx::mysql::MySqlConnection;
use sqlx::{ConnectOptions, Connection};

use crate::core::config::DbConfig;
use crate::core::error::AppResult;

/// One successful relay, as stored in the `downloads` table.
/// Immutable after insertion; there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRecord {
    /// Telegram ID of the requester
    pub tg_user_id: i64,
    /// Requester's username, or their full name when no username is set
    pub tg_username: String,
    /// The Instagram link text as the user sent it
    pub instagram_url: String,
    /// Base name of the relayed temp file
    pub filename: String,
}

/// Appends one row per successful relay.
#[async_trait]
pub trait DownloadLog: Send + Sync {
    async fn record(&self, record: &DownloadRecord) -> AppResult<()>;
}

/// `DownloadLog` backed by a MySQL `downloads` table.
pub struct MysqlDownloadLog {
    config: DbConfig,
}

impl MysqlDownloadLog {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DownloadLog for MysqlDownloadLog {
    async fn record(&self, record: &DownloadRecord) -> AppResult<()> {
        let mut conn: MySqlConnection = self.config.connect_options().connect().await?;

        let result = sqlx::query(
            "INSERT INTO downloads (tg_user_id, tg_username, instagram_url, filename) VALUES (?, ?, ?, ?)",
        )
        .bind(record.tg_user_id)
        .bind(&record.tg_username)
        .bind(&record.instagram_url)
        .bind(&record.filename)
        .execute(&mut conn)
        .await;

        // Close even when the insert failed; a close error only matters
        // when the insert itself succeeded.
        let closed = conn.close().await;
        result?;
        closed?;

        Ok(())
    }
}
