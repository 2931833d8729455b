//! Termination signals as a one-shot cancellation
//!
//! SIGINT, SIGQUIT and SIGTERM all cancel the same token. Handlers are
//! installed up front, so a signal arriving before anyone waits is not lost:
//! the token simply stays cancelled.

use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Install signal handlers that cancel `token` on the first termination signal
///
/// Must be called from within a tokio runtime.
pub fn listen(token: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut quit = signal(SignalKind::quit())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = quit.recv() => "SIGQUIT",
            _ = terminate.recv() => "SIGTERM",
            _ = token.cancelled() => return,
        };
        info!("Received {name}, shutting down");
        token.cancel();
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::{raise, Signal};
    use std::time::Duration;

    #[tokio::test]
    async fn test_quit_signal_cancels_token() {
        let token = CancellationToken::new();
        let handle = listen(token.clone()).unwrap();

        raise(Signal::SIGQUIT).unwrap();

        tokio::time::timeout(Duration::from_secs(5), token.cancelled())
            .await
            .expect("token not cancelled");
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_listener_exits_when_cancelled_elsewhere() {
        let token = CancellationToken::new();
        let handle = listen(token.clone()).unwrap();
        token.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("listener did not exit")
            .unwrap();
    }
}
