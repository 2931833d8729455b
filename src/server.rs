//! HTTP listener adapter
//!
//! Every `GET` path is handed to the parser; a recognized control is
//! translated and written to the shared gamepad. Other methods are answered
//! with 405 by the router, and a `GET` carrying a body is refused.

use crate::catalog::Control;
use crate::device::{DeviceError, VirtualGamepad};
use crate::parser::{self, ParseFailure};
use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// Result of handling one request path
#[derive(Debug)]
pub enum Reply {
    /// Events for the control were written
    Acted { control: Control, pressed: bool },
    /// Path did not name a control; nothing was written
    NoAction(ParseFailure),
    /// The device rejected the write
    WriteFailed(DeviceError),
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Acted { control, .. } => {
                (StatusCode::OK, format!("{} button", control.label())).into_response()
            }
            Reply::NoAction(failure) => {
                (StatusCode::NOT_FOUND, format!("No action: {failure}")).into_response()
            }
            Reply::WriteFailed(err) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Device write failed: {err}"),
            )
                .into_response(),
        }
    }
}

/// Parse `path` and drive the gamepad
pub fn dispatch(gamepad: &VirtualGamepad, path: &str) -> Reply {
    let request = match parser::parse(path) {
        Ok(request) => request,
        Err(failure) => {
            debug!("{path}: {failure}");
            return Reply::NoAction(failure);
        }
    };

    // Short blocking write; the guard serializes concurrent handlers
    match gamepad.send(&request) {
        Ok(()) => {
            debug!(
                control = request.control.name(),
                pressed = request.pressed,
                "Sent"
            );
            Reply::Acted {
                control: request.control,
                pressed: request.pressed,
            }
        }
        Err(e) => {
            warn!("{path}: {e}");
            Reply::WriteFailed(e)
        }
    }
}

async fn handle(State(gamepad): State<Arc<VirtualGamepad>>, uri: Uri, body: Bytes) -> Response {
    if !body.is_empty() {
        return (StatusCode::BAD_REQUEST, "Request body not accepted").into_response();
    }
    dispatch(&gamepad, uri.path()).into_response()
}

/// Build the router serving the gamepad
pub fn router(gamepad: Arc<VirtualGamepad>) -> Router {
    Router::new()
        .route("/", get(handle))
        .route("/*path", get(handle))
        .layer(TraceLayer::new_for_http())
        .with_state(gamepad)
}

/// Serve until `shutdown` is cancelled, then stop accepting and drain
pub async fn serve(
    listener: TcpListener,
    gamepad: Arc<VirtualGamepad>,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    axum::serve(listener, router(gamepad))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}
