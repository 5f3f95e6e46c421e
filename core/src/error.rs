use thiserror::Error;

/// Everything that can go wrong while driving the virtual machine.
///
/// None of these are retried internally; they surface to whoever called the
/// offending operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The decoder met a bit pattern that isn't part of the instruction set
    #[error("invalid opcode {opcode:#06X} ({context})")]
    InvalidOpcode { opcode: u16, context: &'static str },

    #[error("virtual machine used before it was initialized")]
    NotInitialized,

    #[error("virtual machine is already initialized")]
    AlreadyInitialized,

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("key index {0:#04X} is outside the keypad (0x0..=0xF)")]
    InvalidKeyIndex(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
