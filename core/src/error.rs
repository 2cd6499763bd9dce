use std::fmt;
use std::io;

use thiserror::Error;

use crate::constants::{MAX_ROM_SIZE, STACK_SIZE};
use crate::state::Snapshot;

/// Problems getting a ROM into memory; nothing has executed yet when these happen.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read ROM: {0}")]
    Io(#[from] io::Error),

    /// `size` counts the bytes read before giving up, so it can stop at `max + 1`
    #[error("ROM is larger than the {max} bytes that fit in memory (read {size})")]
    RomTooLarge { size: usize, max: usize },
}

impl LoadError {
    pub(crate) fn too_large(size: usize) -> Self {
        LoadError::RomTooLarge {
            size,
            max: MAX_ROM_SIZE,
        }
    }
}

/// Violations of the machine's invariants. Any of these halts execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("stack overflow: more than {} nested calls", STACK_SIZE)]
    StackOverflow,

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("invalid address {0:#05X}")]
    InvalidAddress(u16),
}

/// Everything known about the machine at the moment it faulted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultReport {
    pub fault: Fault,
    /// `None` when the fault happened while fetching the opcode itself
    pub opcode: Option<u16>,
    pub pc: u16,
    pub snapshot: Snapshot,
}

impl fmt::Display for FaultReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.opcode {
            Some(op) => writeln!(f, "{} (opcode {:04X} at pc {:04X})", self.fault, op, self.pc)?,
            None => writeln!(f, "{} (fetching at pc {:04X})", self.fault, self.pc)?,
        }
        write!(f, "{}", self.snapshot)
    }
}

impl std::error::Error for FaultReport {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.fault)
    }
}
