//! Per-tick input snapshot. The simulation core never polls a device; it
//! receives one of these, sampled once per fixed tick at the boundary.

use macroquad::input::{is_key_down, KeyCode};

/// Boolean input flags for one simulation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub down: bool,
}

impl InputSnapshot {
    /// Samples the keyboard (arrows, WASD, space). Boundary code only.
    pub fn poll() -> Self {
        InputSnapshot {
            left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            jump: is_key_down(KeyCode::Space)
                || is_key_down(KeyCode::W)
                || is_key_down(KeyCode::Up),
            down: is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
        }
    }

    /// Snapshot with only the named flags set; handy in tests.
    pub fn none() -> Self {
        Self::default()
    }
}
