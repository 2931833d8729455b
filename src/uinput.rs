//! uinput-backed virtual gamepad using evdev
//!
//! Creation is split in two steps matching the kernel's rules: capabilities
//! are registered on the open `/dev/uinput` handle first, then the device is
//! named and created. Closing the handle destroys the device.

use crate::config::DeviceIdentity;
use crate::device::{Capabilities, DeviceBackend, DeviceError};
use crate::translator::{EventKind, KernelEvent};
use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AbsInfo, AttributeSet, BusType, EventType, InputEvent, InputId, Key, UinputAbsSetup,
};
use std::path::PathBuf;
use tracing::{debug, info};

/// An open uinput handle with its capabilities registered
pub struct PendingGamepad<'a> {
    builder: VirtualDeviceBuilder<'a>,
}

impl<'a> PendingGamepad<'a> {
    /// Open `/dev/uinput` and register every button and axis
    pub fn configure(capabilities: &Capabilities) -> Result<Self, DeviceError> {
        let mut builder = VirtualDeviceBuilder::new().map_err(DeviceError::Config)?;

        let mut keys = AttributeSet::<Key>::new();
        for button in &capabilities.buttons {
            keys.insert(button.key());
        }
        builder = builder.with_keys(&keys).map_err(DeviceError::Config)?;

        for range in &capabilities.axes {
            let abs_setup = UinputAbsSetup::new(
                range.axis.code(),
                AbsInfo::new(0, range.min, range.max, 0, 0, 0),
            );
            builder = builder
                .with_absolute_axis(&abs_setup)
                .map_err(DeviceError::Config)?;
        }

        debug!(
            buttons = capabilities.buttons.len(),
            axes = capabilities.axes.len(),
            "Registered capabilities"
        );
        Ok(Self { builder })
    }

    /// Name the device and create it
    pub fn activate(self, identity: &'a DeviceIdentity) -> Result<UinputGamepad, DeviceError> {
        let id = InputId::new(
            BusType::BUS_USB,
            identity.vendor,
            identity.product,
            identity.version,
        );
        let device = self
            .builder
            .name(&identity.name)
            .input_id(id)
            .build()
            .map_err(DeviceError::Config)?;

        let mut gamepad = UinputGamepad { device };
        match gamepad.device_path() {
            Some(path) => info!("Created virtual gamepad {} at {}", identity.name, path.display()),
            None => info!("Created virtual gamepad {}", identity.name),
        }
        Ok(gamepad)
    }
}

/// Live uinput gamepad
pub struct UinputGamepad {
    device: VirtualDevice,
}

impl UinputGamepad {
    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }
}

impl DeviceBackend for UinputGamepad {
    fn emit(&mut self, events: &[KernelEvent]) -> Result<(), DeviceError> {
        for run in sync_runs(events)? {
            self.device.emit(&run).map_err(DeviceError::Write)?;
        }
        Ok(())
    }

    fn destroy(self: Box<Self>) -> Result<(), DeviceError> {
        drop(self);
        info!("Destroyed virtual gamepad");
        Ok(())
    }
}

/// Split a batch into the value events of each sync-terminated run
///
/// `VirtualDevice::emit` appends its own `SYN_REPORT` to every write, so
/// each run is returned without its marker. A batch whose last event is not
/// a sync is rejected rather than given a marker it never asked for.
fn sync_runs(events: &[KernelEvent]) -> Result<Vec<Vec<InputEvent>>, DeviceError> {
    if events.last().is_some_and(|e| !e.is_sync()) {
        return Err(DeviceError::Unterminated);
    }
    Ok(events
        .split_inclusive(KernelEvent::is_sync)
        .map(|run| {
            run.iter()
                .filter(|e| !e.is_sync())
                .map(to_input_event)
                .collect()
        })
        .collect())
}

fn to_input_event(event: &KernelEvent) -> InputEvent {
    let event_type = match event.kind {
        EventKind::Digital => EventType::KEY,
        EventKind::Axis => EventType::ABSOLUTE,
        EventKind::Sync => EventType::SYNCHRONIZATION,
    };
    InputEvent::new(event_type, event.code, event.value)
}
