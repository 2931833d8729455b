//! Control-to-kernel-event translation

use crate::catalog::Control;
use crate::parser::CommandRequest;

/// Kernel event class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `EV_KEY`
    Digital,
    /// `EV_ABS`
    Axis,
    /// `EV_SYN`
    Sync,
}

/// One kernel input event record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelEvent {
    pub kind: EventKind,
    pub code: u16,
    pub value: i32,
}

impl KernelEvent {
    /// `SYN_REPORT` terminating a batch
    pub const SYNC: KernelEvent = KernelEvent {
        kind: EventKind::Sync,
        code: 0,
        value: 0,
    };

    pub fn digital(code: u16, value: i32) -> Self {
        Self {
            kind: EventKind::Digital,
            code,
            value,
        }
    }

    pub fn axis(code: u16, value: i32) -> Self {
        Self {
            kind: EventKind::Axis,
            code,
            value,
        }
    }

    pub fn is_sync(&self) -> bool {
        self.kind == EventKind::Sync
    }
}

/// Translate a control state into its value event followed by a sync marker
///
/// Releasing a direction always centers its axis; no latched state is kept.
pub fn translate(control: Control, pressed: bool) -> [KernelEvent; 2] {
    let value_event = match control {
        Control::Button(button) => KernelEvent::digital(button.key().code(), i32::from(pressed)),
        Control::Direction(direction) => {
            let value = if pressed { direction.sign() } else { 0 };
            KernelEvent::axis(direction.axis().code().0, value)
        }
    };
    [value_event, KernelEvent::SYNC]
}

impl CommandRequest {
    pub fn events(&self) -> [KernelEvent; 2] {
        translate(self.control, self.pressed)
    }
}
