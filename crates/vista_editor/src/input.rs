//! Per-frame input snapshot.
//!
//! The host window layer fills one of these each update tick; nothing here
//! talks to a device. Button edges (`*_pressed` / `*_released`) are true only
//! on the tick they occur.

use glam::Vec2;

/// Modifier key state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    /// Ctrl on desktop, Cmd on macOS
    pub ctrl: bool,
    pub alt: bool,
}

/// Synchronous input state for one update tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputFrame {
    /// Pointer position in viewport pixels, top-left origin
    pub pointer_pos: Vec2,
    /// Pointer movement since the previous tick
    pub pointer_delta: Vec2,

    pub primary_down: bool,
    pub primary_pressed: bool,
    pub primary_released: bool,
    pub secondary_down: bool,
    pub secondary_pressed: bool,

    pub modifiers: Modifiers,
    pub scroll_delta: f32,

    /// Viewport holds keyboard/input focus
    pub has_focus: bool,
    /// Pointer is inside the viewport bounds
    pub pointer_inside: bool,

    /// Discrete rotate shortcut fired this tick
    pub rotate_step_pressed: bool,
}

impl InputFrame {
    /// Snapshot with the pointer at a position, focus held, pointer inside.
    pub fn at(pointer_pos: Vec2) -> Self {
        Self {
            pointer_pos,
            has_focus: true,
            pointer_inside: true,
            ..Default::default()
        }
    }

    pub fn with_primary_pressed(mut self) -> Self {
        self.primary_pressed = true;
        self.primary_down = true;
        self
    }

    pub fn with_primary_down(mut self) -> Self {
        self.primary_down = true;
        self
    }

    pub fn with_primary_released(mut self) -> Self {
        self.primary_released = true;
        self.primary_down = false;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
