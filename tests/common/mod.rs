//! Common test utilities
//!
//! Shared stubs for the pipeline's collaborator seams and helpers for
//! checking temp-file cleanup.

// Each test binary uses a subset of these helpers
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use reelgram::{AppError, AppResult, DownloadLog, DownloadRecord, MediaResolver, ResolvedMedia, VideoSink};

/// Resolver stub returning a fixed result and counting calls.
pub struct StubResolver {
    video_url: Option<String>,
    calls: AtomicUsize,
}

impl StubResolver {
    pub fn returning(video_url: &str) -> Self {
        Self {
            video_url: Some(video_url.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn not_found() -> Self {
        Self {
            video_url: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaResolver for StubResolver {
    async fn resolve(&self, _shortcode: &str) -> Option<ResolvedMedia> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.video_url.clone().map(|video_url| ResolvedMedia { video_url })
    }
}

/// What the sink observed when it was handed the downloaded file.
#[derive(Debug, Clone)]
pub struct SinkCall {
    pub path: PathBuf,
    pub existed: bool,
    pub bytes: Vec<u8>,
}

/// Sink stub capturing the file it was given, optionally failing the send.
pub struct CapturingSink {
    fail: bool,
    calls: Mutex<Vec<SinkCall>>,
}

impl CapturingSink {
    pub fn succeeding() -> Self {
        Self {
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoSink for CapturingSink {
    async fn send_video(&self, path: &std::path::Path) -> AppResult<()> {
        self.calls.lock().unwrap().push(SinkCall {
            path: path.to_path_buf(),
            existed: path.exists(),
            bytes: std::fs::read(path).unwrap_or_default(),
        });
        if self.fail {
            return Err(AppError::from("attachment send refused"));
        }
        Ok(())
    }
}

/// Download-log stub collecting inserted records, optionally failing.
pub struct RecordingLog {
    fail: bool,
    records: Mutex<Vec<DownloadRecord>>,
}

impl RecordingLog {
    pub fn succeeding() -> Self {
        Self {
            fail: false,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<DownloadRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadLog for RecordingLog {
    async fn record(&self, record: &DownloadRecord) -> AppResult<()> {
        if self.fail {
            return Err(AppError::from("connection refused"));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Count `relay-*.mp4` files currently in the system temp directory.
///
/// Relay tests are `#[serial]` so a before/after comparison detects
/// leftover temp files without racing other tests.
pub fn relay_temp_leftovers() -> usize {
    std::fs::read_dir(std::env::temp_dir())
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    name.starts_with("relay-") && name.ends_with(".mp4")
                })
                .count()
        })
        .unwrap_or(0)
}
