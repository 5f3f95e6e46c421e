use std::fmt::Write;

use crate::constants::{
    ADDRESS_MASK, FONT_ADDRESS, FONT_GLYPH_SIZE, LOADING_ADDRESS, MAX_ROM_SIZE, MEMORY_SIZE,
    SPRITE_SHEET,
};
use crate::error::{Error, Result};

/// # Memory
/// 4096 bytes of addressable memory.
///
/// - 0x000..0x050 holds the built-in sprite sheet, restored on every reset
/// - 0x050..0x200 is otherwise unused (the original interpreter lived here)
/// - 0x200.. is where ROMs are loaded
///
/// Every access masks its address to 12 bits, so reads and writes past 0xFFF
/// wrap around to the start of memory instead of panicking.
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
    rom_len: usize,
}

impl Memory {
    pub fn new() -> Self {
        let mut memory = Memory {
            bytes: [0; MEMORY_SIZE],
            rom_len: 0,
        };
        memory.reset();
        memory
    }

    /// Zeroes everything and writes the sprite sheet back in.
    pub fn reset(&mut self) {
        self.bytes = [0; MEMORY_SIZE];
        let font = FONT_ADDRESS as usize;
        self.bytes[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        self.rom_len = 0;
    }

    /// Copies a ROM to `LOADING_ADDRESS`, returning how many bytes were loaded.
    ///
    /// # Arguments
    /// * `rom` the raw program; anything up to `MAX_ROM_SIZE` bytes is accepted
    pub fn load(&mut self, rom: &[u8]) -> Result<usize> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = LOADING_ADDRESS as usize;
        self.bytes[start..start + rom.len()].copy_from_slice(rom);
        self.rom_len = rom.len();
        Ok(rom.len())
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[(addr & ADDRESS_MASK) as usize]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & ADDRESS_MASK) as usize] = value;
    }

    /// Gets the big-endian word at `addr`.
    /// Opcodes are 16 bits but memory is stored as bytes, so two subsequent bytes are combined.
    pub fn read_word(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.read(addr), self.read(addr.wrapping_add(1))])
    }

    /// Copies `len` bytes starting at `addr`, wrapping at the end of memory.
    pub fn read_range(&self, addr: u16, len: usize) -> Vec<u8> {
        (0..len)
            .map(|offset| self.read(addr.wrapping_add(offset as u16)))
            .collect()
    }

    /// Where the glyph for a hexadecimal digit lives; only the low nibble is used
    pub fn font_address(digit: u8) -> u16 {
        FONT_ADDRESS + u16::from(digit & 0xF) * FONT_GLYPH_SIZE
    }

    /// Size of the last loaded ROM
    pub fn rom_len(&self) -> usize {
        self.rom_len
    }

    /// The loaded program, as it currently sits in memory
    pub fn program(&self) -> &[u8] {
        let start = LOADING_ADDRESS as usize;
        &self.bytes[start..start + self.rom_len]
    }

    /// Hex listing of the loaded program, 16 bytes per line, prefixed by address
    pub fn hex_dump(&self) -> String {
        let mut dump = String::new();
        for (row, chunk) in self.program().chunks(16).enumerate() {
            let _ = write!(dump, "{:03X}:", LOADING_ADDRESS as usize + row * 16);
            for byte in chunk {
                let _ = write!(dump, " {:02X}", byte);
            }
            dump.push('\n');
        }
        dump
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
