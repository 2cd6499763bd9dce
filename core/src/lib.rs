//! A Chip-8 virtual machine: machine state, instruction decoding and execution, and the driver
//! that paces execution against the 60Hz timers.
//!
//! Windowing, keyboards and speakers are left to whatever implements the traits in [`io`].

pub use chip8::{Chip8, HaltReason, RunState};
pub use config::{Config, Quirks};
pub use error::{Fault, FaultReport, LoadError};
pub use instruction::Instruction;
pub use io::{Audio, Display, Frontend, Headless, Input, InputSnapshot};
pub use opcode::Opcode;
pub use operations::Flow;
pub use state::{FrameBuffer, Keypad, Snapshot, State};

mod chip8;
mod config;
pub mod constants;
mod error;
mod instruction;
pub mod io;
mod opcode;
mod operations;
mod state;
