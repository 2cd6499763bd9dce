use std::fmt;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START, KEY_COUNT, MAX_ROM_SIZE, MEMORY_SIZE,
    PROGRAM_START, REGISTER_COUNT, SPRITE_SHEET, STACK_SIZE,
};
use crate::error::{Fault, LoadError};

/// The FrameBuffer is indexed as [y][x]; `true` is a lit pixel
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// The Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry/borrow/collision flag
/// - (i) a memory address register, wider than it needs to be so that `I += Vx` can't overflow
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of occupied stack slots
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented at 60Hz while non-zero
/// - a tone plays while the sound timer is non-zero
///
/// ## Memory
/// - 16 slot stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x050 holds the sprite sheet
///     - programs are loaded at 0x200
/// - 64x32 frame buffer and the draw flag that says it changed
///
/// ## Input
/// - the pressed status of keys 0..F, as last reported by the keyboard
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub keypad: Keypad,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            keypad: Keypad::default(),
        }
    }

    /// Copies a ROM into memory starting at `PROGRAM_START`.
    ///
    /// Memory is left untouched if the ROM doesn't fit.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(LoadError::too_large(rom.len()));
        }
        let start = PROGRAM_START as usize;
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&self) -> Result<u16, Fault> {
        let pc = self.pc as usize;
        if self.pc < PROGRAM_START || pc + 1 >= MEMORY_SIZE {
            return Err(Fault::InvalidAddress(self.pc));
        }
        let left = u16::from(self.memory[pc]);
        let right = u16::from(self.memory[pc + 1]);
        Ok(left << 8 | right)
    }

    /// Borrows `len` bytes of memory starting at `addr`
    pub fn read(&self, addr: u16, len: usize) -> Result<&[u8], Fault> {
        let start = addr as usize;
        if start + len > MEMORY_SIZE {
            return Err(Fault::InvalidAddress(addr));
        }
        Ok(&self.memory[start..start + len])
    }

    /// Copies `bytes` into memory starting at `addr`.
    /// Everything below `PROGRAM_START` belongs to the interpreter.
    pub fn write(&mut self, addr: u16, bytes: &[u8]) -> Result<(), Fault> {
        let start = addr as usize;
        if addr < PROGRAM_START || start + bytes.len() > MEMORY_SIZE {
            return Err(Fault::InvalidAddress(addr));
        }
        self.memory[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Copies out the registers, stack and timers for diagnostics
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            v: self.v,
            i: self.i,
            pc: self.pc,
            sp: self.sp,
            stack: self.stack,
            delay_timer: self.delay_timer,
            sound_timer: self.sound_timer,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// The pressed status of keys 0..F
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    pressed: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new(pressed: [bool; KEY_COUNT]) -> Self {
        Keypad { pressed }
    }

    /// Only the low nibble of `key` selects a key
    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed[usize::from(key & 0xF)]
    }
}

/// A copy of everything but memory and the frame buffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub stack: [u16; STACK_SIZE],
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (n, value) in self.v.iter().enumerate() {
            if n > 0 {
                write!(f, " ")?;
            }
            write!(f, "V{:X} {:02X}", n, value)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "PC {:04X} I {:04X} SP {:02X} DT {:02X} ST {:02X}",
            self.pc, self.i, self.sp, self.delay_timer, self.sound_timer
        )?;
        write!(f, "stack")?;
        for addr in &self.stack[..usize::from(self.sp).min(STACK_SIZE)] {
            write!(f, " {:04X}", addr)?;
        }
        Ok(())
    }
}
