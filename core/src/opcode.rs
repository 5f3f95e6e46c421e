/// # Opcodes
///
/// Opcodes are 16 bits each, fetched big-endian from two consecutive bytes of memory.
/// Their behavior is cased on:
/// - `(n, _, _, _)` the group; applies to all opcodes
/// - `(_, _, _, n)` or `(_, _, n, n)` the sub-operation inside groups 0x0, 0x5, 0x8, 0x9, 0xE and 0xF
///
/// The remaining nibbles carry operands:
/// - `(_, n, n, n)` a 12-bit address (NNN)
/// - `(_, _, n, n)` an immediate byte (NN)
/// - `(_, n, _, _)` the register Vx, or the range V0..=Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` a nibble (N), e.g. the height of a sprite
pub trait Opcode {
    /// Returns the Opcode's component nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// `[_x__]`
    fn x(&self) -> u8;

    /// `[__y_]`
    fn y(&self) -> u8;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__nn]`
    fn nn(&self) -> u8;

    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (((self & 0xF000) >> 12) as u8, self.x(), self.y(), self.n())
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn nn(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}
