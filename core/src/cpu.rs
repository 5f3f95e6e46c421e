use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{LOADING_ADDRESS, REGISTER_COUNT, STACK_SIZE};
use crate::error::Result;
use crate::framebuffer::FrameBuffer;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::tone::Tone;

/// The peripherals an instruction may touch while it executes
pub struct Bus<'a> {
    pub memory: &'a mut Memory,
    pub frame_buffer: &'a mut FrameBuffer,
    pub keypad: &'a Keypad,
}

/// What a single call to `Cpu::step` did
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    Executed(Instruction),
    /// Blocked on FX0A; nothing was executed
    WaitingForKey,
}

/// # CPU
///
/// ## Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag
/// - (i) a 16-bit memory address register
///
/// ## Counter
/// - (pc) a 16-bit program counter, always pointing at the next opcode's high byte
///
/// ## Stack
/// - (sp) an 8-bit stack pointer, counting the pushed addresses; the top is `stack[sp - 1]`
/// - 16 return addresses
///
/// ## Timers
/// - 2 8-bit timers (delay & sound), counting down once per tick
///
/// ## Input
/// - FX0A parks the register that is waiting for a key in `register_needing_key`;
///   until a key is pressed every step is a no-op
pub struct Cpu {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub stack: [u16; STACK_SIZE],
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub(crate) register_needing_key: Option<u8>,
    pub(crate) rng: StdRng,
}

impl Cpu {
    /// # Arguments
    /// * `seed` seeds the CXNN random number generator; OS entropy when absent
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Cpu {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: LOADING_ADDRESS,
            sp: 0,
            stack: [0; STACK_SIZE],
            delay_timer: 0,
            sound_timer: 0,
            register_needing_key: None,
            rng,
        }
    }

    /// Clears every register and the stack; the random generator keeps its state
    pub fn reset(&mut self) {
        self.v = [0; REGISTER_COUNT];
        self.i = 0;
        self.pc = LOADING_ADDRESS;
        self.sp = 0;
        self.stack = [0; STACK_SIZE];
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.register_needing_key = None;
    }

    /// Gets the opcode currently pointed at by the pc
    pub fn fetch(&self, memory: &Memory) -> u16 {
        memory.read_word(self.pc)
    }

    /// Advances the CPU by a single instruction
    /// - does nothing while awaiting a keypress
    /// - fetches and decodes the next opcode; an invalid one leaves every register untouched
    /// - moves the pc past the opcode, then executes it
    pub fn step(&mut self, bus: &mut Bus) -> Result<Step> {
        if self.register_needing_key.is_some() {
            return Ok(Step::WaitingForKey);
        }

        let op = self.fetch(bus.memory);
        let instruction = Instruction::decode(op)?;
        trace!(
            "{:03X}: {:04X} {:<16} v{:02X?} i{:04X} sp{}",
            self.pc,
            op,
            instruction.to_string(),
            self.v,
            self.i,
            self.sp
        );

        self.pc = self.pc.wrapping_add(2);
        self.execute(instruction, bus);
        Ok(Step::Executed(instruction))
    }

    /// Applies a decoded instruction to the CPU and the peripherals
    pub fn execute(&mut self, instruction: Instruction, bus: &mut Bus) {
        use Instruction::*;

        match instruction {
            Sys { addr } => self.sys(addr),
            Cls => self.clr(bus),
            Ret => self.rts(),
            Jump { addr } => self.jump(addr),
            Call { addr } => self.call(addr),
            SkipEqByte { x, nn } => self.ske(x, nn),
            SkipNeByte { x, nn } => self.skne(x, nn),
            SkipEqReg { x, y } => self.skre(x, y),
            LoadByte { x, nn } => self.load(x, nn),
            AddByte { x, nn } => self.add(x, nn),
            Move { x, y } => self.mv(x, y),
            Or { x, y } => self.or(x, y),
            And { x, y } => self.and(x, y),
            Xor { x, y } => self.xor(x, y),
            AddReg { x, y } => self.addr(x, y),
            Sub { x, y } => self.sub(x, y),
            ShiftRight { x, y } => self.shr(x, y),
            SubN { x, y } => self.subn(x, y),
            ShiftLeft { x, y } => self.shl(x, y),
            SkipNeReg { x, y } => self.skrne(x, y),
            LoadI { addr } => self.loadi(addr),
            JumpV0 { addr } => self.jumpi(addr),
            Random { x, nn } => self.rand(x, nn),
            Draw { x, y, n } => self.draw(x, y, n, bus),
            SkipKey { x } => self.skpr(x, bus),
            SkipNotKey { x } => self.skup(x, bus),
            LoadDelay { x } => self.moved(x),
            WaitKey { x } => self.keyd(x),
            SetDelay { x } => self.loads(x),
            SetSound { x } => self.ld(x),
            AddI { x } => self.addi(x),
            LoadFont { x } => self.ldspr(x),
            Bcd { x } => self.bcd(x, bus),
            Store { x } => self.stor(x, bus),
            Read { x } => self.read(x, bus),
        }
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.register_needing_key.is_some()
    }

    /// Hands a key press to a pending FX0A.
    /// Returns whether the press released the CPU from waiting.
    pub fn key_pressed(&mut self, key: u8) -> bool {
        match self.register_needing_key.take() {
            Some(register) => {
                debug!("key {:X} stored in V{:X}, resuming", key, register);
                self.v[register as usize] = key;
                true
            }
            None => false,
        }
    }

    /// Counts both timers down by one tick
    /// - the delay timer is decremented
    /// - a running sound timer becomes one beep covering its whole remaining duration
    pub fn tick_timers(&mut self, tone: &mut dyn Tone) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }

        if self.sound_timer > 0 {
            trace!("beep for {} ticks", self.sound_timer);
            tone.request_beep(self.sound_timer);
            self.sound_timer = 0;
        }
    }
}

#[cfg(test)]
mod test_cpu {
    use super::*;
    use crate::error::Error;
    use crate::tone::RecordingTone;

    struct Machine {
        cpu: Cpu,
        memory: Memory,
        frame_buffer: FrameBuffer,
        keypad: Keypad,
    }

    impl Machine {
        fn new(program: &[u8]) -> Self {
            let mut memory = Memory::new();
            memory.load(program).unwrap();
            Machine {
                cpu: Cpu::new(Some(0)),
                memory,
                frame_buffer: FrameBuffer::new(),
                keypad: Keypad::new(),
            }
        }

        fn step(&mut self) -> Result<Step> {
            let mut bus = Bus {
                memory: &mut self.memory,
                frame_buffer: &mut self.frame_buffer,
                keypad: &self.keypad,
            };
            self.cpu.step(&mut bus)
        }
    }

    #[test]
    fn test_gets_op() {
        let machine = Machine::new(&[0xAA, 0xBB]);
        assert_eq!(machine.cpu.fetch(&machine.memory), 0xAABB);
    }

    #[test]
    fn test_step_advances_pc() {
        // a cls opcode so we don't run into empty memory
        let mut machine = Machine::new(&[0x00, 0xE0]);
        assert_eq!(machine.step(), Ok(Step::Executed(Instruction::Cls)));
        assert_eq!(machine.cpu.pc, 0x202);
    }

    #[test]
    fn test_invalid_opcode_leaves_state_alone() {
        let mut machine = Machine::new(&[0x8A, 0xAF]);
        machine.cpu.v[0xA] = 0x12;
        assert_eq!(
            machine.step(),
            Err(Error::InvalidOpcode {
                opcode: 0x8AAF,
                context: "8XY_ arithmetic has no such operation"
            })
        );
        assert_eq!(machine.cpu.pc, 0x200);
        assert_eq!(machine.cpu.v[0xA], 0x12);
    }

    #[test]
    fn test_doesnt_cycle_while_register_needs_key() {
        let mut machine = Machine::new(&[0xF1, 0x0A, 0x61, 0x22]);
        machine.step().unwrap();
        assert!(machine.cpu.is_waiting_for_key());
        for _ in 0..10 {
            assert_eq!(machine.step(), Ok(Step::WaitingForKey));
        }
        assert_eq!(machine.cpu.pc, 0x202);
        assert_eq!(machine.cpu.v[0x1], 0x00);
    }

    #[test]
    fn test_captures_key_presses() {
        let mut machine = Machine::new(&[0xF1, 0x0A, 0x62, 0x22]);
        machine.step().unwrap();
        assert!(machine.cpu.key_pressed(0xE));
        assert!(!machine.cpu.is_waiting_for_key());
        assert_eq!(machine.cpu.v[0x1], 0xE);

        // the instruction after FX0A runs next
        assert_eq!(
            machine.step(),
            Ok(Step::Executed(Instruction::LoadByte { x: 0x2, nn: 0x22 }))
        );
        assert_eq!(machine.cpu.pc, 0x204);
    }

    #[test]
    fn test_key_press_without_wait_is_ignored() {
        let mut cpu = Cpu::new(Some(0));
        assert!(!cpu.key_pressed(0x3));
        assert_eq!(cpu.v, [0; REGISTER_COUNT]);
    }

    #[test]
    fn test_timers_count_down() {
        let mut cpu = Cpu::new(Some(0));
        let mut tone = RecordingTone::default();
        cpu.delay_timer = 2;
        cpu.tick_timers(&mut tone);
        assert_eq!(cpu.delay_timer, 1);
        cpu.tick_timers(&mut tone);
        cpu.tick_timers(&mut tone);
        assert_eq!(cpu.delay_timer, 0);
        assert!(tone.requests.is_empty());
    }

    #[test]
    fn test_sound_timer_beeps_once_for_whole_duration() {
        let mut cpu = Cpu::new(Some(0));
        let mut tone = RecordingTone::default();
        cpu.sound_timer = 30;
        cpu.tick_timers(&mut tone);
        cpu.tick_timers(&mut tone);
        assert_eq!(tone.requests, vec![30]);
        assert_eq!(cpu.sound_timer, 0);
    }

    #[test]
    fn test_reset() {
        let mut cpu = Cpu::new(Some(0));
        cpu.v[0x3] = 0x7;
        cpu.pc = 0x400;
        cpu.sp = 3;
        cpu.register_needing_key = Some(0x2);
        cpu.reset();
        assert_eq!(cpu.v, [0; REGISTER_COUNT]);
        assert_eq!(cpu.pc, LOADING_ADDRESS);
        assert_eq!(cpu.sp, 0);
        assert!(!cpu.is_waiting_for_key());
    }
}
