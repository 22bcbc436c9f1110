//! Expiring snapshot of static records.
//!
//! File layout: every line but the last holds the JSON record array, the last
//! line holds the write time in fractional epoch seconds.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::model::TabRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    pub records: Vec<TabRecord>,
    pub timestamp: f64,
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("cache persist error: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// `None` on a missing, unreadable or malformed file. Never an error.
pub fn read(path: &Path) -> Option<CacheSnapshot> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            if error.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), %error, "cache unreadable; treating as miss");
            }
            return None;
        }
    };

    let snapshot = parse(&raw);
    if snapshot.is_none() {
        tracing::warn!(path = %path.display(), "cache corrupt; treating as miss");
    }
    snapshot
}

fn parse(raw: &str) -> Option<CacheSnapshot> {
    let (body, last_line) = raw.trim_end_matches('\n').rsplit_once('\n')?;
    let timestamp = last_line.trim().parse::<f64>().ok()?;
    if !timestamp.is_finite() {
        return None;
    }
    let records = serde_json::from_str::<Vec<TabRecord>>(body).ok()?;
    Some(CacheSnapshot { records, timestamp })
}

pub fn write(path: &Path, records: &[TabRecord]) -> Result<(), CacheError> {
    write_at(path, records, now_epoch_secs())
}

/// Replaces the snapshot atomically: readers see the old file or the new one.
pub fn write_at(path: &Path, records: &[TabRecord], timestamp: f64) -> Result<(), CacheError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let body = serde_json::to_string(records)?;
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(body.as_bytes())?;
    staged.write_all(format!("\n{timestamp}\n").as_bytes())?;
    staged.as_file().sync_all()?;
    staged.persist(path)?;
    Ok(())
}

pub fn is_valid(snapshot: &CacheSnapshot, ttl_secs: f64) -> bool {
    is_valid_at(snapshot, ttl_secs, now_epoch_secs())
}

pub fn is_valid_at(snapshot: &CacheSnapshot, ttl_secs: f64, now: f64) -> bool {
    now - snapshot.timestamp <= ttl_secs
}

/// Deletes the snapshot. Returns whether a file was removed.
pub fn clear(path: &Path) -> Result<bool, CacheError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(error) => Err(error.into()),
    }
}

pub fn now_epoch_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
