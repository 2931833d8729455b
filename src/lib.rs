//! Andropad - remote touchscreen to virtual gamepad bridge
//!
//! Accepts `GET /<prefix>/<control>/<presence>` requests and turns them into
//! kernel input events on a uinput gamepad, so any game listening for a
//! standard joystick sees real button and axis transitions.

pub mod catalog;
pub mod config;
pub mod device;
pub mod error;
pub mod lifecycle;
pub mod parser;
pub mod pidfile;
pub mod server;
pub mod shutdown;
pub mod translator;
pub mod uinput;

pub use catalog::{Axis, Button, Control, Direction};
pub use config::{DeviceIdentity, ServerConfig};
pub use device::{
    Capabilities, DeviceBackend, DeviceError, LoggingBackend, VirtualGamepad, AXIS_MAX, AXIS_MIN,
};
pub use error::StartupConflict;
pub use parser::{parse, CommandRequest, ParseFailure};
pub use pidfile::PidFile;
pub use translator::{translate, EventKind, KernelEvent};
pub use uinput::{PendingGamepad, UinputGamepad};
