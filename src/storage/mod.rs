//! Persistence: the `downloads` table writer

pub mod db;

pub use db::{DownloadLog, DownloadRecord, MysqlDownloadLog};
