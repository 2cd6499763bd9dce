//! The boundaries between the machine and whatever hosts it.
//!
//! The driver hands the frame buffer out by reference for the duration of a single `render` call
//! and takes the keypad in by copy, so a frontend never holds on to machine state.

use crate::constants::KEY_COUNT;
use crate::state::FrameBuffer;

/// Shows frames
pub trait Display {
    /// Called whenever the frame buffer changed.
    /// Returns whether the user asked to quit.
    fn render(&mut self, frame: &FrameBuffer) -> bool;
}

/// Reads the keypad
pub trait Input {
    /// Called once per instruction tick
    fn poll(&mut self) -> InputSnapshot;
}

/// Makes the beep
pub trait Audio {
    /// Called whenever the sound timer goes from zero to non-zero or back
    fn set_tone(&mut self, on: bool);
}

/// Everything the driver needs from its host
pub trait Frontend: Display + Input + Audio {}

impl<T: Display + Input + Audio> Frontend for T {}

/// What the keyboard looked like at one poll
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    /// Pressed status of keys 0..F
    pub keys: [bool; KEY_COUNT],
    /// The first key that went down since the previous poll
    pub key_down: Option<u8>,
    pub quit: bool,
}

/// A frontend with no window, no keyboard and no speaker
#[derive(Clone, Copy, Debug, Default)]
pub struct Headless;

impl Display for Headless {
    fn render(&mut self, _frame: &FrameBuffer) -> bool {
        false
    }
}

impl Input for Headless {
    fn poll(&mut self) -> InputSnapshot {
        InputSnapshot::default()
    }
}

impl Audio for Headless {
    fn set_tone(&mut self, _on: bool) {}
}
