//! Window-system independent input events.
//!
//! `flow` translates winit events into these; tests feed them directly.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    LeftShift,
    C,
    N,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Other,
}

/// Cursor coordinates are physical pixels with the origin in the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { key: Key, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool, x: f64, y: f64 },
    CursorMoved { x: f64, y: f64 },
    Scroll { dx: f64, dy: f64 },
    Resized { width: u32, height: u32 },
}

/// What the event loop should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}
