pub use config::{Config, TimerMode};
pub use constants::{CLOCK_SPEED, TIMER_FREQUENCY};
pub use cpu::{Bus, Cpu, Step};
pub use error::{Error, Result};
pub use framebuffer::{FrameBuffer, Pixels};
pub use instruction::Instruction;
pub use keypad::{KeyEvent, Keypad};
pub use memory::Memory;
pub use tone::{Mute, RecordingTone, Tone};
pub use vm::VirtualMachine;

mod config;
pub mod constants;
mod cpu;
mod error;
mod framebuffer;
mod instruction;
mod keypad;
mod memory;
mod opcode;
mod operations;
mod tone;
mod vm;
