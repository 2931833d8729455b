//! Single-instance pid file
//!
//! A pid file naming a live process blocks startup. A stale one (dead pid
//! or unreadable contents) is replaced. The file is removed when the
//! [`PidFile`] guard drops.

use crate::error::StartupConflict;
use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PidFileError {
    #[error(transparent)]
    Conflict(#[from] StartupConflict),
    #[error("Pid file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Held for the lifetime of the process
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Claim the pid file for this process
    pub fn acquire(path: &Path) -> Result<Self, PidFileError> {
        let io_err = |source| PidFileError::Io {
            path: path.to_path_buf(),
            source,
        };

        match std::fs::read_to_string(path) {
            Ok(content) => {
                if let Some(pid) = parse_pid(&content) {
                    if is_alive(pid) {
                        return Err(StartupConflict {
                            pid,
                            path: path.to_path_buf(),
                        }
                        .into());
                    }
                }
                warn!("Removing stale pid file {}", path.display());
                match std::fs::remove_file(path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(io_err(e)),
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_err(e)),
        }

        std::fs::write(path, std::process::id().to_string()).map_err(io_err)?;
        debug!("Wrote pid file {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to remove pid file {}: {}", self.path.display(), e);
        }
    }
}

/// Only positive pids name a single process
fn parse_pid(content: &str) -> Option<i32> {
    content.trim().parse::<i32>().ok().filter(|&pid| pid > 0)
}

/// Signal-0 liveness check; a process we may not signal still exists
fn is_alive(pid: i32) -> bool {
    match kill(Pid::from_raw(pid), None) {
        Ok(()) => true,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}
