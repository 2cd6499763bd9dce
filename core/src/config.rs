use crate::constants::{DEFAULT_CLOCK_HZ, TIMER_HZ};

/// How fast the machine runs and which hardware variant it behaves like
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Instruction ticks per second
    pub clock_hz: u32,
    /// Timer ticks per second; independent of `clock_hz`
    pub timer_hz: u32,
    pub quirks: Quirks,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            clock_hz: DEFAULT_CLOCK_HZ,
            timer_hz: TIMER_HZ,
            quirks: Quirks::default(),
        }
    }
}

/// Behaviors that differ between Chip-8 interpreters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Quirks {
    /// `Fx1E` sets VF when I moves past 0xFFF (Amiga interpreter behavior)
    pub add_i_sets_vf: bool,
}
