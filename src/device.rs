//! Virtual device contract and the shared single-writer guard around it
//!
//! A backend is configured and activated once during startup, then shared
//! by every request handler through [`VirtualGamepad`]. The guard holds one
//! lock across each batch, so a value event and its sync marker are never
//! split by another request's batch.

use crate::catalog::{Axis, Button};
use crate::parser::CommandRequest;
use crate::translator::KernelEvent;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

/// Pad axis value range
pub const AXIS_MIN: i32 = -1;
pub const AXIS_MAX: i32 = 1;

/// Errors from virtual device operations
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Failed to configure virtual device: {0}")]
    Config(#[source] std::io::Error),
    #[error("Failed to emit event: {0}")]
    Write(#[source] std::io::Error),
    #[error("Device not active")]
    Inactive,
    #[error("Event batch does not end with a sync marker")]
    Unterminated,
}

/// Bounds declared for one absolute axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub axis: Axis,
    pub min: i32,
    pub max: i32,
}

/// Every event code the device will ever emit
///
/// Must be complete before activation: uinput cannot grow a live device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub buttons: Vec<Button>,
    pub axes: Vec<AxisRange>,
}

impl Capabilities {
    /// All catalog buttons (reserved ones included) plus both pad axes
    pub fn gamepad() -> Self {
        Self {
            buttons: Button::ALL.to_vec(),
            axes: Axis::ALL
                .iter()
                .map(|&axis| AxisRange {
                    axis,
                    min: AXIS_MIN,
                    max: AXIS_MAX,
                })
                .collect(),
        }
    }
}

/// An activated device that accepts event batches
pub trait DeviceBackend: Send {
    /// Write the batch in order
    fn emit(&mut self, events: &[KernelEvent]) -> Result<(), DeviceError>;

    /// Tear the device down
    fn destroy(self: Box<Self>) -> Result<(), DeviceError>;
}

/// Backend that only logs, for running without `/dev/uinput`
#[derive(Debug, Default)]
pub struct LoggingBackend;

impl DeviceBackend for LoggingBackend {
    fn emit(&mut self, events: &[KernelEvent]) -> Result<(), DeviceError> {
        for event in events {
            debug!(kind = ?event.kind, code = event.code, value = event.value, "event");
        }
        Ok(())
    }

    fn destroy(self: Box<Self>) -> Result<(), DeviceError> {
        Ok(())
    }
}

/// Shared handle to the activated device
pub struct VirtualGamepad {
    backend: Mutex<Option<Box<dyn DeviceBackend>>>,
}

impl VirtualGamepad {
    pub fn new(backend: impl DeviceBackend + 'static) -> Self {
        Self {
            backend: Mutex::new(Some(Box::new(backend))),
        }
    }

    /// Emit a batch atomically with respect to other callers
    pub fn emit(&self, events: &[KernelEvent]) -> Result<(), DeviceError> {
        let mut guard = self.backend.lock();
        let backend = guard.as_mut().ok_or(DeviceError::Inactive)?;
        backend.emit(events)
    }

    /// Translate and emit a parsed request
    pub fn send(&self, request: &CommandRequest) -> Result<(), DeviceError> {
        self.emit(&request.events())
    }

    pub fn is_active(&self) -> bool {
        self.backend.lock().is_some()
    }

    /// Destroy the device; later emits fail with [`DeviceError::Inactive`]
    ///
    /// Waits for an in-flight batch to finish before tearing down.
    pub fn deactivate(&self) -> Result<(), DeviceError> {
        let backend = self.backend.lock().take();
        match backend {
            Some(backend) => backend.destroy(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for VirtualGamepad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualGamepad")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Control, Direction};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<KernelEvent>>>,
        destroyed: Arc<AtomicBool>,
        fail: Arc<AtomicBool>,
    }

    impl DeviceBackend for Recorder {
        fn emit(&mut self, events: &[KernelEvent]) -> Result<(), DeviceError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(DeviceError::Write(std::io::Error::other("unplugged")));
            }
            self.events.lock().extend_from_slice(events);
            Ok(())
        }

        fn destroy(self: Box<Self>) -> Result<(), DeviceError> {
            self.destroyed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_capabilities_cover_catalog() {
        let caps = Capabilities::gamepad();
        assert_eq!(caps.buttons.len(), Button::ALL.len());
        assert!(caps.buttons.contains(&Button::Mode));
        assert_eq!(caps.axes.len(), 2);
        assert!(caps.axes.iter().all(|r| r.min == -1 && r.max == 1));
    }

    #[test]
    fn test_send_records_pair() {
        let recorder = Recorder::default();
        let pad = VirtualGamepad::new(recorder.clone());
        let request = CommandRequest {
            control: Control::Direction(Direction::Up),
            pressed: true,
        };
        pad.send(&request).unwrap();
        assert_eq!(*recorder.events.lock(), request.events().to_vec());
    }

    #[test]
    fn test_write_failure_keeps_device_alive() {
        let recorder = Recorder::default();
        let pad = VirtualGamepad::new(recorder.clone());
        recorder.fail.store(true, Ordering::SeqCst);
        assert!(matches!(
            pad.emit(&[KernelEvent::SYNC]),
            Err(DeviceError::Write(_))
        ));
        assert!(pad.is_active());

        recorder.fail.store(false, Ordering::SeqCst);
        pad.emit(&[KernelEvent::SYNC]).unwrap();
        assert_eq!(recorder.events.lock().len(), 1);
    }

    #[test]
    fn test_deactivate_without_requests() {
        let recorder = Recorder::default();
        let pad = VirtualGamepad::new(recorder.clone());
        pad.deactivate().unwrap();
        assert!(recorder.destroyed.load(Ordering::SeqCst));
        assert!(!pad.is_active());
    }

    #[test]
    fn test_emit_after_deactivate_is_rejected() {
        let recorder = Recorder::default();
        let pad = VirtualGamepad::new(recorder.clone());
        pad.deactivate().unwrap();
        assert!(matches!(
            pad.emit(&[KernelEvent::SYNC]),
            Err(DeviceError::Inactive)
        ));
        assert!(recorder.events.lock().is_empty());
        // second teardown is a no-op
        pad.deactivate().unwrap();
    }
}
