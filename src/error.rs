//! Error taxonomy
//!
//! Startup failures ([`StartupConflict`], [`DeviceError::Config`]) are fatal.
//! [`ParseFailure`] and [`DeviceError::Write`] are answered per request and
//! never take the device down.

use std::path::PathBuf;
use thiserror::Error;

pub use crate::device::DeviceError;
pub use crate::parser::ParseFailure;
pub use crate::pidfile::PidFileError;

/// Another instance already holds the pid file
#[derive(Debug, Error)]
#[error("Already running as pid {pid} (pid file {})", path.display())]
pub struct StartupConflict {
    pub pid: i32,
    pub path: PathBuf,
}
