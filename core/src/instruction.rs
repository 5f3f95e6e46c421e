use std::fmt;

use crate::error::{Error, Result};
use crate::opcode::Opcode;

/// A decoded opcode with its operands pulled out.
///
/// Register operands (`x`, `y`) are always in 0x0..=0xF, `addr` is 12 bits wide
/// and `n` is a nibble, so executing an Instruction never needs to re-check them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// 0NNN: call a machine code routine (ignored)
    Sys { addr: u16 },
    /// 00E0: clear the screen
    Cls,
    /// 00EE: return from a subroutine
    Ret,
    /// 1NNN: PC = NNN
    Jump { addr: u16 },
    /// 2NNN: push PC; PC = NNN
    Call { addr: u16 },
    /// 3XNN: skip if Vx == NN
    SkipEqByte { x: u8, nn: u8 },
    /// 4XNN: skip if Vx != NN
    SkipNeByte { x: u8, nn: u8 },
    /// 5XY0: skip if Vx == Vy
    SkipEqReg { x: u8, y: u8 },
    /// 6XNN: Vx = NN
    LoadByte { x: u8, nn: u8 },
    /// 7XNN: Vx += NN, VF untouched
    AddByte { x: u8, nn: u8 },
    /// 8XY0: Vx = Vy
    Move { x: u8, y: u8 },
    /// 8XY1: Vx |= Vy
    Or { x: u8, y: u8 },
    /// 8XY2: Vx &= Vy
    And { x: u8, y: u8 },
    /// 8XY3: Vx ^= Vy
    Xor { x: u8, y: u8 },
    /// 8XY4: Vx += Vy; VF = carry
    AddReg { x: u8, y: u8 },
    /// 8XY5: Vx -= Vy; VF = !borrow
    Sub { x: u8, y: u8 },
    /// 8XY6: Vx = Vy >> 1; VF = lsb(Vy)
    ShiftRight { x: u8, y: u8 },
    /// 8XY7: Vx = Vy - Vx; VF = !borrow
    SubN { x: u8, y: u8 },
    /// 8XYE: Vx = Vy << 1; VF = msb(Vy)
    ShiftLeft { x: u8, y: u8 },
    /// 9XY0: skip if Vx != Vy
    SkipNeReg { x: u8, y: u8 },
    /// ANNN: I = NNN
    LoadI { addr: u16 },
    /// BNNN: PC = NNN + V0
    JumpV0 { addr: u16 },
    /// CXNN: Vx = random & NN
    Random { x: u8, nn: u8 },
    /// DXYN: draw an N row sprite from mem[I..] at (Vx, Vy)
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E: skip if key Vx is down
    SkipKey { x: u8 },
    /// EXA1: skip if key Vx is up
    SkipNotKey { x: u8 },
    /// FX07: Vx = DT
    LoadDelay { x: u8 },
    /// FX0A: wait for a key press and store it in Vx
    WaitKey { x: u8 },
    /// FX15: DT = Vx
    SetDelay { x: u8 },
    /// FX18: ST = Vx
    SetSound { x: u8 },
    /// FX1E: I += Vx
    AddI { x: u8 },
    /// FX29: I = address of the glyph for Vx
    LoadFont { x: u8 },
    /// FX33: mem[I..I+3] = bcd(Vx)
    Bcd { x: u8 },
    /// FX55: mem[I..=I+x] = V0..=Vx; I += x + 1
    Store { x: u8 },
    /// FX65: V0..=Vx = mem[I..=I+x]; I += x + 1
    Read { x: u8 },
}

fn invalid(opcode: u16, context: &'static str) -> Error {
    Error::InvalidOpcode { opcode, context }
}

impl Instruction {
    /// Selects the correct Instruction for a given Opcode.
    ///
    /// Group 0x0 never fails: anything that isn't CLS or RET is a machine code call.
    /// Groups 0x5, 0x8, 0x9, 0xE and 0xF reject sub-operations that don't exist.
    pub fn decode(op: u16) -> Result<Instruction> {
        use Instruction::*;

        let (x, y, n, nn, addr) = (op.x(), op.y(), op.n(), op.nn(), op.nnn());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x0, ..) => Sys { addr },
            (0x1, ..) => Jump { addr },
            (0x2, ..) => Call { addr },
            (0x3, ..) => SkipEqByte { x, nn },
            (0x4, ..) => SkipNeByte { x, nn },
            (0x5, .., 0x0) => SkipEqReg { x, y },
            (0x5, ..) => return Err(invalid(op, "5XY_ comparison expects a trailing 0")),
            (0x6, ..) => LoadByte { x, nn },
            (0x7, ..) => AddByte { x, nn },
            (0x8, .., 0x0) => Move { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddReg { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => ShiftRight { x, y },
            (0x8, .., 0x7) => SubN { x, y },
            (0x8, .., 0xE) => ShiftLeft { x, y },
            (0x8, ..) => return Err(invalid(op, "8XY_ arithmetic has no such operation")),
            (0x9, .., 0x0) => SkipNeReg { x, y },
            (0x9, ..) => return Err(invalid(op, "9XY_ comparison expects a trailing 0")),
            (0xA, ..) => LoadI { addr },
            (0xB, ..) => JumpV0 { addr },
            (0xC, ..) => Random { x, nn },
            (0xD, ..) => Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => SkipKey { x },
            (0xE, _, 0xA, 0x1) => SkipNotKey { x },
            (0xE, ..) => return Err(invalid(op, "EX__ key skip has no such operation")),
            (0xF, _, 0x0, 0x7) => LoadDelay { x },
            (0xF, _, 0x0, 0xA) => WaitKey { x },
            (0xF, _, 0x1, 0x5) => SetDelay { x },
            (0xF, _, 0x1, 0x8) => SetSound { x },
            (0xF, _, 0x1, 0xE) => AddI { x },
            (0xF, _, 0x2, 0x9) => LoadFont { x },
            (0xF, _, 0x3, 0x3) => Bcd { x },
            (0xF, _, 0x5, 0x5) => Store { x },
            (0xF, _, 0x6, 0x5) => Read { x },
            (0xF, ..) => return Err(invalid(op, "FX__ has no such operation")),
            // a nibble only has 16 values
            _ => unreachable!(),
        };
        Ok(instruction)
    }

    /// The canonical pattern this instruction was decoded from, e.g. `8XY4`
    pub fn pattern(&self) -> &'static str {
        use Instruction::*;

        match self {
            Sys { .. } => "0NNN",
            Cls => "00E0",
            Ret => "00EE",
            Jump { .. } => "1NNN",
            Call { .. } => "2NNN",
            SkipEqByte { .. } => "3XNN",
            SkipNeByte { .. } => "4XNN",
            SkipEqReg { .. } => "5XY0",
            LoadByte { .. } => "6XNN",
            AddByte { .. } => "7XNN",
            Move { .. } => "8XY0",
            Or { .. } => "8XY1",
            And { .. } => "8XY2",
            Xor { .. } => "8XY3",
            AddReg { .. } => "8XY4",
            Sub { .. } => "8XY5",
            ShiftRight { .. } => "8XY6",
            SubN { .. } => "8XY7",
            ShiftLeft { .. } => "8XYE",
            SkipNeReg { .. } => "9XY0",
            LoadI { .. } => "ANNN",
            JumpV0 { .. } => "BNNN",
            Random { .. } => "CXNN",
            Draw { .. } => "DXYN",
            SkipKey { .. } => "EX9E",
            SkipNotKey { .. } => "EXA1",
            LoadDelay { .. } => "FX07",
            WaitKey { .. } => "FX0A",
            SetDelay { .. } => "FX15",
            SetSound { .. } => "FX18",
            AddI { .. } => "FX1E",
            LoadFont { .. } => "FX29",
            Bcd { .. } => "FX33",
            Store { .. } => "FX55",
            Read { .. } => "FX65",
        }
    }
}

/// Renders the instruction as an assembler mnemonic
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sys { addr } => write!(f, "SYS {:#05X}", addr),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jump { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            SkipEqByte { x, nn } => write!(f, "SE V{:X}, {:#04X}", x, nn),
            SkipNeByte { x, nn } => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadByte { x, nn } => write!(f, "LD V{:X}, {:#04X}", x, nn),
            AddByte { x, nn } => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubN { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadI { addr } => write!(f, "LD I, {:#05X}", addr),
            JumpV0 { addr } => write!(f, "JP V0, {:#05X}", addr),
            Random { x, nn } => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKey { x } => write!(f, "SKP V{:X}", x),
            SkipNotKey { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LoadFont { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Read { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
