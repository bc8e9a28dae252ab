//! Rotation-safe log follower
//!
//! Starts at the current end of the file and yields lines as they are
//! appended. When a read comes back empty the follower waits, then compares
//! the file size with the last one seen; a smaller file means it was
//! truncated or rotated, so the path is reopened and read from the start.

use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

use encoding_rs::UTF_8;
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::time::sleep;

/// Wait between empty reads
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_secs(1);

/// Startup failures. Once following, nothing is fatal.
#[derive(Debug, Error)]
pub enum FollowError {
    #[error("log file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("cannot open log file {path:?}: {source}")]
    Open { path: PathBuf, source: io::Error },
}

pub struct LogFollower {
    path: PathBuf,
    reader: BufReader<File>,
    last_size: u64,
    idle_interval: Duration,
    /// Bytes of a line whose newline has not been written yet
    pending: Vec<u8>,
}

impl LogFollower {
    /// Open `path` and position at its end; history is never replayed.
    pub async fn open(path: &Path, idle_interval: Duration) -> Result<Self, FollowError> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Err(FollowError::NotFound(path.to_path_buf()));
        }

        let open_err = |source| FollowError::Open {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::open(path).await.map_err(open_err)?;
        let last_size = file.seek(SeekFrom::End(0)).await.map_err(open_err)?;

        tracing::debug!(?path, position = last_size, "Following log file");

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            last_size,
            idle_interval,
            pending: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for and return the next complete line. Never ends.
    pub async fn next_line(&mut self) -> String {
        loop {
            match self.poll_line().await {
                Ok(Some(line)) => return line,
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, path = ?self.path, "Error reading log file");
                }
            }

            sleep(self.idle_interval).await;
            self.check_rotation().await;
        }
    }

    /// Non-waiting read: `Ok(None)` when no complete line is available yet.
    pub async fn poll_line(&mut self) -> io::Result<Option<String>> {
        let read = self.reader.read_until(b'\n', &mut self.pending).await?;
        if read == 0 || self.pending.last() != Some(&b'\n') {
            return Ok(None);
        }

        let bytes = std::mem::take(&mut self.pending);
        let (text, had_errors) = UTF_8.decode_with_bom_removal(&bytes);
        if had_errors {
            tracing::debug!(path = ?self.path, "Replaced malformed bytes in log line");
        }

        Ok(Some(text.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Reopen the file if it shrank since the last check.
    /// Returns true when the file was reopened.
    pub async fn check_rotation(&mut self) -> bool {
        let current_size = match fs::metadata(&self.path).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::debug!(error = %e, path = ?self.path, "Log file unavailable, retrying");
                return false;
            }
        };

        if current_size >= self.last_size {
            self.last_size = current_size;
            return false;
        }

        match File::open(&self.path).await {
            Ok(file) => {
                tracing::info!(
                    path = ?self.path,
                    previous_size = self.last_size,
                    current_size,
                    "Log file truncated or rotated, reopening"
                );
                self.reader = BufReader::new(file);
                self.pending.clear();
                self.last_size = current_size;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, path = ?self.path, "Failed to reopen rotated log file");
                false
            }
        }
    }
}
