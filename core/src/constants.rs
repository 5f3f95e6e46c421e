/// Total addressable memory in bytes (0x000..=0xFFF)
pub const MEMORY_SIZE: usize = 4096;

/// Mask applied to every memory address; the address space wraps at 4K
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// 0x200 is where ROMs are loaded into memory and where the program counter starts
pub const LOADING_ADDRESS: u16 = 0x200;

/// The largest ROM that fits between `LOADING_ADDRESS` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - LOADING_ADDRESS as usize;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Number of return addresses the call stack can hold
pub const STACK_SIZE: usize = 16;

/// Number of registers (V0..VF)
pub const REGISTER_COUNT: usize = 16;

/// Number of keys on the hexadecimal keypad (0x0..0xF)
pub const KEY_COUNT: usize = 16;

/// Nanoseconds per CPU cycle (500Hz)
pub const CLOCK_SPEED: u64 = 2_000_000;

/// Frequency at which the delay and sound timers count down
pub const TIMER_FREQUENCY: u64 = 60;

/// The built-in font lives at the very start of memory
pub const FONT_ADDRESS: u16 = 0x000;

/// Each glyph in the sprite sheet is 5 rows tall
pub const FONT_GLYPH_SIZE: u16 = 5;

/// # Sprite sheet
/// Hexadecimal digits 0..F, 8x5 pixels each, one byte per row.
/// Only the high nibble of every row is lit.
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
