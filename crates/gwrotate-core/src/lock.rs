// ── Run lock ──
//
// A file created with `create_new` marks a rotation in progress. The file
// holds the run id and start time; it is removed when the lock drops.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::CoreError;

/// Exclusive hold on the run lock file.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Create the lock file, failing with [`CoreError::Locked`] if it exists.
    pub fn acquire(path: impl Into<PathBuf>, run_id: Uuid) -> Result<Self, CoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CoreError::Config {
                message: format!("cannot create lock directory {}: {e}", parent.display()),
            })?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let holder = fs::read_to_string(&path)
                    .map(|s| s.trim().to_owned())
                    .unwrap_or_else(|_| "unknown holder".into());
                return Err(CoreError::Locked { path, holder });
            }
            Err(e) => {
                return Err(CoreError::Config {
                    message: format!("cannot create lock file {}: {e}", path.display()),
                });
            }
        };

        let stamp = format!("run {run_id} started {}\n", Utc::now().to_rfc3339());
        if let Err(e) = file.write_all(stamp.as_bytes()) {
            warn!(path = %path.display(), error = %e, "failed to write lock contents");
        }

        debug!(path = %path.display(), %run_id, "run lock acquired");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove run lock");
        }
    }
}
