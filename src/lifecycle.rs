//! Startup and shutdown sequencing
//!
//! Order is fixed: pid file, device configure + activate, settle, listen.
//! Once the shutdown token fires the listener stops first, then the device
//! is destroyed, then the pid file is released.

use crate::config::{DeviceIdentity, ServerConfig};
use crate::device::{Capabilities, DeviceBackend, DeviceError, VirtualGamepad};
use crate::pidfile::PidFile;
use crate::server;
use crate::uinput::{PendingGamepad, UinputGamepad};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Create the uinput gamepad
pub fn create_uinput(
    capabilities: &Capabilities,
    identity: &DeviceIdentity,
) -> Result<UinputGamepad, DeviceError> {
    PendingGamepad::configure(capabilities)?.activate(identity)
}

/// Run the server until `shutdown` is cancelled
///
/// `create_device` is only called after the pid file is held.
pub async fn run<F, B>(
    config: &ServerConfig,
    create_device: F,
    shutdown: CancellationToken,
) -> Result<()>
where
    F: FnOnce(&Capabilities, &DeviceIdentity) -> Result<B, DeviceError>,
    B: DeviceBackend + 'static,
{
    let pid_file = PidFile::acquire(&config.pid_file)?;
    debug!("Holding pid file {}", pid_file.path().display());

    let backend = create_device(&Capabilities::gamepad(), &config.device)
        .context("Failed to create virtual gamepad")?;
    let gamepad = Arc::new(VirtualGamepad::new(backend));

    let served = serve_until(config, Arc::clone(&gamepad), &shutdown).await;

    let teardown = gamepad.deactivate();
    if let Err(e) = &teardown {
        warn!("Device teardown failed: {e}");
    }
    served?;
    teardown?;
    drop(pid_file);
    info!("Shut down");
    Ok(())
}

async fn serve_until(
    config: &ServerConfig,
    gamepad: Arc<VirtualGamepad>,
    shutdown: &CancellationToken,
) -> Result<()> {
    // Give consumers time to open the new event node
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_millis(config.settle_ms)) => {}
        _ = shutdown.cancelled() => return Ok(()),
    }

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to listen on {addr}"))?;
    info!("Listening on {}", listener.local_addr()?);

    server::serve(listener, gamepad, shutdown.clone()).await?;
    Ok(())
}
