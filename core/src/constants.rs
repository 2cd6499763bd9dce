/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// ROMs are loaded here and execution starts here
pub const PROGRAM_START: u16 = 0x200;

/// The largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Nested subroutine calls deeper than this overflow the stack
pub const STACK_SIZE: usize = 16;

/// V0..VF
pub const REGISTER_COUNT: usize = 16;

/// Keys 0x0..0xF on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// The delay and sound timers always count down at 60Hz
pub const TIMER_HZ: u32 = 60;

/// Instructions per second unless told otherwise
pub const DEFAULT_CLOCK_HZ: u32 = 500;

/// Where the sprite sheet starts and how tall each of its glyphs is
pub const FONT_START: u16 = 0x000;
pub const FONT_GLYPH_SIZE: u16 = 5;

/// # Sprite Sheet
/// One 8x5 sprite for each hexadecimal digit; only the high nibble of each row is used.
///
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
