//! Server configuration
//!
//! Loaded from TOML; a missing file means defaults. Command-line flags are
//! applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Identity the virtual gamepad presents to clients
///
/// Games remember controllers by these values, so they should not change
/// between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    #[serde(default = "default_device_name")]
    pub name: String,
    #[serde(default = "default_usb_id")]
    pub vendor: u16,
    #[serde(default = "default_usb_id")]
    pub product: u16,
    #[serde(default = "default_version")]
    pub version: u16,
}

fn default_device_name() -> String {
    "Andropad".to_string()
}
fn default_usb_id() -> u16 {
    0x7777
}
fn default_version() -> u16 {
    1
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            name: default_device_name(),
            vendor: default_usb_id(),
            product: default_usb_id(),
            version: default_version(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    #[serde(default = "default_bind")]
    pub bind: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Single-instance lock
    #[serde(default = "default_pid_file")]
    pub pid_file: PathBuf,
    /// Delay between device creation and accepting requests (ms)
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default)]
    pub device: DeviceIdentity,
}

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}
fn default_port() -> u16 {
    8080
}
fn default_pid_file() -> PathBuf {
    PathBuf::from("/var/run/andropad.pid")
}
fn default_settle_ms() -> u64 {
    2000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            pid_file: default_pid_file(),
            settle_ms: default_settle_ms(),
            device: DeviceIdentity::default(),
        }
    }
}

impl ServerConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("andropad")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: ServerConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
