//! Control catalog
//!
//! Static mapping from the textual control names a client may send to the
//! gamepad controls they drive. Buttons map 1:1 onto kernel key codes; pad
//! directions collapse onto the two absolute axes.

use evdev::{AbsoluteAxisType, Key};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Digital gamepad buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    C,
    X,
    Y,
    Z,
    Tl,
    Tr,
    Tl2,
    Tr2,
    Select,
    Start,
    /// Declared on the device but not addressable by requests
    Mode,
    ThumbL,
    ThumbR,
}

impl Button {
    /// Buttons a request can name
    pub const REACHABLE: &'static [Button] = &[
        Button::A,
        Button::B,
        Button::C,
        Button::X,
        Button::Y,
        Button::Z,
        Button::Tl,
        Button::Tr,
        Button::Tl2,
        Button::Tr2,
        Button::Select,
        Button::Start,
    ];

    /// Every button the virtual device advertises
    pub const ALL: &'static [Button] = &[
        Button::A,
        Button::B,
        Button::C,
        Button::X,
        Button::Y,
        Button::Z,
        Button::Tl,
        Button::Tr,
        Button::Tl2,
        Button::Tr2,
        Button::Select,
        Button::Start,
        Button::Mode,
        Button::ThumbL,
        Button::ThumbR,
    ];

    /// Lowercase wire name
    pub fn name(&self) -> &'static str {
        match self {
            Button::A => "a",
            Button::B => "b",
            Button::C => "c",
            Button::X => "x",
            Button::Y => "y",
            Button::Z => "z",
            Button::Tl => "tl",
            Button::Tr => "tr",
            Button::Tl2 => "tl2",
            Button::Tr2 => "tr2",
            Button::Select => "select",
            Button::Start => "start",
            Button::Mode => "mode",
            Button::ThumbL => "thumbl",
            Button::ThumbR => "thumbr",
        }
    }

    /// Display name used in responses
    pub fn label(&self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::C => "C",
            Button::X => "X",
            Button::Y => "Y",
            Button::Z => "Z",
            Button::Tl => "TL",
            Button::Tr => "TR",
            Button::Tl2 => "TL2",
            Button::Tr2 => "TR2",
            Button::Select => "Select",
            Button::Start => "Start",
            Button::Mode => "Mode",
            Button::ThumbL => "ThumbL",
            Button::ThumbR => "ThumbR",
        }
    }

    /// Kernel key code
    pub fn key(&self) -> Key {
        match self {
            // evdev names 0x130..0x134 by position only
            Button::A => Key::BTN_SOUTH,
            Button::B => Key::BTN_EAST,
            Button::C => Key::BTN_C,
            Button::X => Key::BTN_NORTH,
            Button::Y => Key::BTN_WEST,
            Button::Z => Key::BTN_Z,
            Button::Tl => Key::BTN_TL,
            Button::Tr => Key::BTN_TR,
            Button::Tl2 => Key::BTN_TL2,
            Button::Tr2 => Key::BTN_TR2,
            Button::Select => Key::BTN_SELECT,
            Button::Start => Key::BTN_START,
            Button::Mode => Key::BTN_MODE,
            Button::ThumbL => Key::BTN_THUMBL,
            Button::ThumbR => Key::BTN_THUMBR,
        }
    }
}

/// The two pad axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const ALL: &'static [Axis] = &[Axis::Horizontal, Axis::Vertical];

    /// Kernel absolute axis code
    pub fn code(&self) -> AbsoluteAxisType {
        match self {
            Axis::Horizontal => AbsoluteAxisType::ABS_X,
            Axis::Vertical => AbsoluteAxisType::ABS_Y,
        }
    }
}

/// Pad directions
///
/// Opposite directions share one axis with opposite signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: &'static [Direction] = &[
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }

    /// Unit value written to the axis while pressed
    pub fn sign(&self) -> i32 {
        match self {
            Direction::Up | Direction::Right => 1,
            Direction::Down | Direction::Left => -1,
        }
    }
}

/// Any control a request can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Button(Button),
    Direction(Direction),
}

impl Control {
    pub fn name(&self) -> &'static str {
        match self {
            Control::Button(b) => b.name(),
            Control::Direction(d) => d.name(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Control::Button(b) => b.label(),
            Control::Direction(d) => d.label(),
        }
    }
}

static CATALOG: LazyLock<HashMap<&'static str, Control>> = LazyLock::new(|| {
    let directions = Direction::ALL.iter().map(|&d| Control::Direction(d));
    let buttons = Button::REACHABLE.iter().map(|&b| Control::Button(b));
    directions
        .chain(buttons)
        .map(|control| (control.name(), control))
        .collect()
});

/// Look up a control by its exact (case-sensitive) name
pub fn lookup(name: &str) -> Option<Control> {
    CATALOG.get(name).copied()
}

/// Names accepted by [`lookup`]
pub fn names() -> impl Iterator<Item = &'static str> {
    CATALOG.keys().copied()
}
