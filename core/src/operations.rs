use log::{debug, warn};
use rand::Rng;

use crate::constants::STACK_SIZE;
use crate::cpu::{Bus, Cpu};
use crate::memory::Memory;

/// One method per instruction. The pc has already been moved past the opcode
/// when these run, so skips add 2 and jumps overwrite it.
impl Cpu {
    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    /// Writes a result to Vx, then the flag to VF; when x is F the flag wins
    fn set_with_flag(&mut self, x: u8, value: u8, flag: bool) {
        self.v[x as usize] = value;
        self.v[0xF] = flag as u8;
    }

    /// machine code routine; there's no 1802 to run it on
    pub(crate) fn sys(&mut self, addr: u16) {
        warn!("ignoring machine code routine at {:#05X}", addr);
    }

    /// clear
    pub(crate) fn clr(&mut self, bus: &mut Bus) {
        bus.frame_buffer.clear();
    }

    /// PC = STACK.pop()
    pub(crate) fn rts(&mut self) {
        if self.sp == 0 {
            warn!("stack underflow at {:#05X}, wrapping", self.pc.wrapping_sub(2));
            self.sp = STACK_SIZE as u8;
        }
        self.sp -= 1;
        self.pc = self.stack[self.sp as usize];
    }

    /// PC = addr
    pub(crate) fn jump(&mut self, addr: u16) {
        self.pc = addr;
    }

    /// STACK.push(PC); PC = addr
    pub(crate) fn call(&mut self, addr: u16) {
        if self.sp as usize >= STACK_SIZE {
            warn!("stack overflow at {:#05X}, wrapping", self.pc.wrapping_sub(2));
            self.sp = 0;
        }
        self.stack[self.sp as usize] = self.pc;
        self.sp += 1;
        self.pc = addr;
    }

    /// if Vx == nn then pc += 2
    pub(crate) fn ske(&mut self, x: u8, nn: u8) {
        self.skip_if(self.v[x as usize] == nn);
    }

    /// if Vx != nn then pc += 2
    pub(crate) fn skne(&mut self, x: u8, nn: u8) {
        self.skip_if(self.v[x as usize] != nn);
    }

    /// if Vx == Vy then pc += 2
    pub(crate) fn skre(&mut self, x: u8, y: u8) {
        self.skip_if(self.v[x as usize] == self.v[y as usize]);
    }

    /// Vx = nn
    pub(crate) fn load(&mut self, x: u8, nn: u8) {
        self.v[x as usize] = nn;
    }

    /// Vx += nn
    /// Overflow is dropped and VF is left alone
    pub(crate) fn add(&mut self, x: u8, nn: u8) {
        self.v[x as usize] = self.v[x as usize].wrapping_add(nn);
    }

    /// Vx = Vy
    pub(crate) fn mv(&mut self, x: u8, y: u8) {
        self.v[x as usize] = self.v[y as usize];
    }

    /// Vx |= Vy
    pub(crate) fn or(&mut self, x: u8, y: u8) {
        self.v[x as usize] |= self.v[y as usize];
    }

    /// Vx &= Vy
    pub(crate) fn and(&mut self, x: u8, y: u8) {
        self.v[x as usize] &= self.v[y as usize];
    }

    /// Vx ^= Vy
    pub(crate) fn xor(&mut self, x: u8, y: u8) {
        self.v[x as usize] ^= self.v[y as usize];
    }

    /// Vx += Vy; VF = overflow
    pub(crate) fn addr(&mut self, x: u8, y: u8) {
        let (res, over) = self.v[x as usize].overflowing_add(self.v[y as usize]);
        self.set_with_flag(x, res, over);
    }

    /// Vx -= Vy; VF = !underflow
    pub(crate) fn sub(&mut self, x: u8, y: u8) {
        let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
        self.set_with_flag(x, vx.wrapping_sub(vy), vx >= vy);
    }

    /// Vx = Vy >> 1; VF = lsb(Vy)
    pub(crate) fn shr(&mut self, x: u8, y: u8) {
        let vy = self.v[y as usize];
        self.set_with_flag(x, vy >> 1, vy & 0x1 == 0x1);
    }

    /// Vx = Vy - Vx; VF = !underflow
    pub(crate) fn subn(&mut self, x: u8, y: u8) {
        let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
        self.set_with_flag(x, vy.wrapping_sub(vx), vy >= vx);
    }

    /// Vx = Vy << 1; VF = msb(Vy)
    pub(crate) fn shl(&mut self, x: u8, y: u8) {
        let vy = self.v[y as usize];
        self.set_with_flag(x, vy << 1, vy >> 7 == 0x1);
    }

    /// if Vx != Vy then pc += 2
    pub(crate) fn skrne(&mut self, x: u8, y: u8) {
        self.skip_if(self.v[x as usize] != self.v[y as usize]);
    }

    /// I = addr
    pub(crate) fn loadi(&mut self, addr: u16) {
        self.i = addr;
    }

    /// PC = V0 + addr
    pub(crate) fn jumpi(&mut self, addr: u16) {
        self.pc = addr + u16::from(self.v[0x0]);
    }

    /// Vx = rand_byte & nn
    pub(crate) fn rand(&mut self, x: u8, nn: u8) {
        let rand_byte: u8 = self.rng.gen();
        self.v[x as usize] = rand_byte & nn;
    }

    /// draw_sprite(x=Vx y=Vy size=n)
    /// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
    /// Sets VF if any pixels were erased
    pub(crate) fn draw(&mut self, x: u8, y: u8, n: u8, bus: &mut Bus) {
        let sprite = bus.memory.read_range(self.i, n as usize);
        let collision =
            bus.frame_buffer
                .draw_sprite(&sprite, self.v[x as usize], self.v[y as usize]);
        self.v[0xF] = collision as u8;
    }

    /// if Vx.pressed then pc += 2
    pub(crate) fn skpr(&mut self, x: u8, bus: &mut Bus) {
        let key = self.v[x as usize] & 0xF;
        self.skip_if(bus.keypad.is_key_down(key));
    }

    /// if !Vx.pressed then pc += 2
    pub(crate) fn skup(&mut self, x: u8, bus: &mut Bus) {
        let key = self.v[x as usize] & 0xF;
        self.skip_if(!bus.keypad.is_key_down(key));
    }

    /// Vx = DT
    pub(crate) fn moved(&mut self, x: u8) {
        self.v[x as usize] = self.delay_timer;
    }

    /// await keypress for Vx
    pub(crate) fn keyd(&mut self, x: u8) {
        debug!("waiting for a key for V{:X}", x);
        self.register_needing_key = Some(x);
    }

    /// DT = Vx
    pub(crate) fn loads(&mut self, x: u8) {
        self.delay_timer = self.v[x as usize];
    }

    /// ST = Vx
    pub(crate) fn ld(&mut self, x: u8) {
        self.sound_timer = self.v[x as usize];
    }

    /// I += Vx
    /// Wraps at 16 bits; memory accesses mask I down to 12
    pub(crate) fn addi(&mut self, x: u8) {
        self.i = self.i.wrapping_add(u16::from(self.v[x as usize]));
    }

    /// I = Vx * 5
    /// Set I to the memory address of the sprite for Vx
    pub(crate) fn ldspr(&mut self, x: u8) {
        self.i = Memory::font_address(self.v[x as usize]);
    }

    /// mem[I..I+3] = bcd(Vx)
    /// Hundreds at I, tens at I+1, ones at I+2; I is unchanged
    pub(crate) fn bcd(&mut self, x: u8, bus: &mut Bus) {
        let value = self.v[x as usize];
        let digits = [value / 100, value / 10 % 10, value % 10];
        for (offset, &digit) in digits.iter().enumerate() {
            bus.memory.write(self.i.wrapping_add(offset as u16), digit);
        }
    }

    /// mem[I..=I+x] = V0..=Vx; I += x + 1
    pub(crate) fn stor(&mut self, x: u8, bus: &mut Bus) {
        for register in 0..=x as u16 {
            bus.memory
                .write(self.i.wrapping_add(register), self.v[register as usize]);
        }
        self.i = self.i.wrapping_add(u16::from(x) + 1);
    }

    /// V0..=Vx = mem[I..=I+x]; I += x + 1
    pub(crate) fn read(&mut self, x: u8, bus: &mut Bus) {
        for register in 0..=x as u16 {
            self.v[register as usize] = bus.memory.read(self.i.wrapping_add(register));
        }
        self.i = self.i.wrapping_add(u16::from(x) + 1);
    }
}
