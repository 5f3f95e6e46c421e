use std::fmt::Write;

use log::debug;

use crate::config::Config;
use crate::constants::{LOADING_ADDRESS, MAX_ROM_SIZE};
use crate::cpu::{Bus, Cpu, Step};
use crate::error::{Error, Result};
use crate::framebuffer::FrameBuffer;
use crate::instruction::Instruction;
use crate::keypad::{KeyEvent, Keypad};
use crate::memory::Memory;
use crate::tone::Tone;

/// # Virtual Machine
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Owns:
///  - `memory`, `frame_buffer` and `keypad`
///  - the `cpu` that executes against them
///  - a host supplied `tone` that the sound timer beeps through
///
/// Supplies interfaces for:
/// - the initialize / load / step lifecycle
/// - pressing and releasing keys
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
pub struct VirtualMachine<T: Tone> {
    config: Config,
    initialized: bool,
    memory: Memory,
    frame_buffer: FrameBuffer,
    keypad: Keypad,
    cpu: Cpu,
    tone: T,
    steps_since_tick: u32,
}

impl<T: Tone> VirtualMachine<T> {
    pub fn new(tone: T) -> Self {
        Self::with_config(Config::default(), tone)
    }

    pub fn with_config(config: Config, tone: T) -> Self {
        VirtualMachine {
            config,
            initialized: false,
            memory: Memory::new(),
            frame_buffer: FrameBuffer::new(),
            keypad: Keypad::new(),
            cpu: Cpu::new(config.seed),
            tone,
            steps_since_tick: 0,
        }
    }

    /// Readies the machine for `load` and `step`; fails if it already is
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }
        self.reset_components();
        self.initialized = true;
        debug!("initialized with {:?}", self.config);
        Ok(())
    }

    /// Puts every component back to power-on state and drops the initialized flag
    pub fn reset(&mut self) {
        self.reset_components();
        self.initialized = false;
        debug!("reset");
    }

    fn reset_components(&mut self) {
        self.memory.reset();
        self.frame_buffer.clear();
        self.keypad.reset();
        self.cpu.reset();
        self.steps_since_tick = 0;
    }

    /// Resets the machine and copies a ROM in at `LOADING_ADDRESS`
    ///
    /// Returns the number of bytes loaded. A ROM that doesn't fit is rejected
    /// before anything is reset, so the current program keeps running.
    ///
    /// # Arguments
    /// * `rom` the raw program, at most `MAX_ROM_SIZE` bytes
    pub fn load(&mut self, rom: &[u8]) -> Result<usize> {
        self.ensure_initialized()?;
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.reset_components();
        let size = self.memory.load(rom)?;
        debug!("loaded {} byte ROM at {:#05X}", size, LOADING_ADDRESS);
        Ok(size)
    }

    /// Executes exactly one instruction, or nothing if FX0A is waiting on a key.
    /// Ticks the timers afterwards when they're driven per step.
    pub fn step(&mut self) -> Result<Step> {
        self.ensure_initialized()?;

        let mut bus = Bus {
            memory: &mut self.memory,
            frame_buffer: &mut self.frame_buffer,
            keypad: &self.keypad,
        };
        let step = self.cpu.step(&mut bus)?;

        if let Some(steps_per_tick) = self.config.steps_per_tick() {
            self.steps_since_tick += 1;
            if self.steps_since_tick >= steps_per_tick {
                self.steps_since_tick = 0;
                self.cpu.tick_timers(&mut self.tone);
            }
        }
        Ok(step)
    }

    /// Counts the delay and sound timers down once; hosts call this at 60Hz
    pub fn tick_timers(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        self.cpu.tick_timers(&mut self.tone);
        Ok(())
    }

    /// Sets the pressed status of a key, releasing a pending FX0A on a press edge
    ///
    /// # Arguments
    /// * `key` the key's value, 0x0..=0xF
    /// * `down` whether the key is now held
    pub fn set_key(&mut self, key: u8, down: bool) -> Result<Option<KeyEvent>> {
        let event = self.keypad.set_key(key, down)?;
        if let Some(KeyEvent::Pressed(key)) = event {
            self.cpu.key_pressed(key);
        }
        Ok(event)
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.frame_buffer.take_changed() {
            Some(&self.frame_buffer)
        } else {
            None
        }
    }

    /// Peeks at the opcode the next step would execute
    pub fn fetch(&self) -> Result<u16> {
        self.ensure_initialized()?;
        Ok(self.cpu.fetch(&self.memory))
    }

    /// Lists the loaded program one opcode per line with its disassembly.
    /// Data mixed in with the code shows up as `???`.
    pub fn program_dump(&self) -> String {
        let mut dump = String::new();
        for (offset, chunk) in self.memory.program().chunks(2).enumerate() {
            let addr = LOADING_ADDRESS as usize + offset * 2;
            let op = match *chunk {
                [hi, lo] => u16::from_be_bytes([hi, lo]),
                [hi] => u16::from(hi) << 8,
                _ => continue,
            };
            let _ = match Instruction::decode(op) {
                Ok(instruction) => writeln!(dump, "{:03X}: {:04X}  {}", addr, op, instruction),
                Err(_) => writeln!(dump, "{:03X}: {:04X}  ???", addr, op),
            };
        }
        dump
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn tone(&self) -> &T {
        &self.tone
    }

    pub fn tone_mut(&mut self) -> &mut T {
        &mut self.tone
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }
}
