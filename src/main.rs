//! Andropad
//!
//! Main entry point: CLI, logging, and the signal-bounded server run.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::info;

use andropad::config::ServerConfig;
use andropad::device::LoggingBackend;
use andropad::{lifecycle, shutdown};

#[derive(Parser)]
#[command(name = "andropad", version)]
#[command(about = "Virtual gamepad driven by HTTP requests from a remote touchscreen")]
struct Cli {
    /// Port to listen on (overrides the config file)
    port: Option<u16>,

    /// Config file path (default: ~/.config/andropad/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Single-instance pid file
    #[arg(long)]
    pid_file: Option<PathBuf>,

    /// Delay in milliseconds between creating the device and listening
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Log events instead of creating a uinput device
    #[arg(long)]
    dry_run: bool,

    /// Write the merged settings to the config file and exit
    #[arg(long)]
    write_config: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(ref pid_file) = self.pid_file {
            config.pid_file = pid_file.clone();
        }
        if let Some(settle_ms) = self.settle_ms {
            config.settle_ms = settle_ms;
        }
    }
}

fn write_config(config: &ServerConfig, path: &Path) -> Result<()> {
    config
        .save(path)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    info!("Wrote config to {:?}", path);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load config
    let config_path = cli.config.clone().unwrap_or_else(ServerConfig::default_path);
    info!("Loading config from {:?}", config_path);
    let mut config = ServerConfig::load(&config_path)?;
    cli.apply(&mut config);

    if cli.write_config {
        return write_config(&config, &config_path);
    }

    let token = CancellationToken::new();
    let _signals = shutdown::listen(token.clone())?;

    if cli.dry_run {
        info!("Dry run: events are logged, no device is created");
        lifecycle::run(&config, |_, _| Ok(LoggingBackend), token).await
    } else {
        lifecycle::run(&config, lifecycle::create_uinput, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_port_overrides_config() {
        let cli = Cli::parse_from(["andropad", "9090", "--settle-ms", "0"]);
        let mut config = ServerConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.port, 9090);
        assert_eq!(config.settle_ms, 0);
        assert_eq!(config.pid_file, ServerConfig::default().pid_file);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::parse_from(["andropad"]);
        let mut config = ServerConfig {
            port: 1234,
            ..ServerConfig::default()
        };
        cli.apply(&mut config);
        assert_eq!(config.port, 1234);
        assert!(!cli.write_config);
    }

    #[test]
    fn test_write_config_saves_overrides() {
        let cli = Cli::parse_from(["andropad", "7070", "--bind", "127.0.0.1", "--write-config"]);
        assert!(cli.write_config);

        let mut config = ServerConfig::default();
        cli.apply(&mut config);
        let path = std::env::temp_dir()
            .join(format!("andropad-cli-{}", std::process::id()))
            .join("config.toml");
        write_config(&config, &path).unwrap();

        let saved = ServerConfig::load(&path).unwrap();
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
        assert_eq!(saved.port, 7070);
        assert_eq!(saved.bind, "127.0.0.1".parse::<IpAddr>().unwrap());
        assert_eq!(saved.settle_ms, config.settle_ms);
    }
}
