//! 8-bit ALU operations applied to the register file.

use crate::alu::{self, AluResult};
use crate::bus::Z180Bus;
use crate::flags::{CF, tables};

use super::Z180;

impl Z180 {
    fn set_a(&mut self, result: AluResult) {
        self.regs.a = result.value;
        self.regs.f = result.flags;
    }

    fn carry(&self) -> bool {
        self.regs.f & CF != 0
    }

    pub fn add(&mut self, value: u8) {
        self.set_a(alu::add8(self.regs.a, value, false));
    }

    pub fn adc(&mut self, value: u8) {
        self.set_a(alu::add8(self.regs.a, value, self.carry()));
    }

    pub fn sub(&mut self, value: u8) {
        self.set_a(alu::sub8(self.regs.a, value, false));
    }

    pub fn sbc(&mut self, value: u8) {
        self.set_a(alu::sub8(self.regs.a, value, self.carry()));
    }

    /// Compare with A. A is unchanged.
    pub fn cp(&mut self, value: u8) {
        self.regs.f = alu::cp8(self.regs.a, value);
    }

    pub fn and(&mut self, value: u8) {
        self.set_a(alu::and8(self.regs.a, value));
    }

    pub fn or(&mut self, value: u8) {
        self.set_a(alu::or8(self.regs.a, value));
    }

    pub fn xor(&mut self, value: u8) {
        self.set_a(alu::xor8(self.regs.a, value));
    }

    /// TST: AND without storing. A is unchanged.
    pub fn tst(&mut self, value: u8) {
        self.regs.f = alu::tst8(self.regs.a, value);
    }

    pub fn neg(&mut self) {
        self.set_a(alu::neg8(self.regs.a));
    }

    pub fn daa(&mut self) {
        self.set_a(alu::daa(self.regs.a, self.regs.f));
    }

    pub fn rlca(&mut self) {
        self.set_a(alu::rlca(self.regs.a, self.regs.f));
    }

    pub fn rrca(&mut self) {
        self.set_a(alu::rrca(self.regs.a, self.regs.f));
    }

    pub fn rla(&mut self) {
        self.set_a(alu::rla(self.regs.a, self.regs.f));
    }

    pub fn rra(&mut self) {
        self.set_a(alu::rra(self.regs.a, self.regs.f));
    }

    // Value-returning forms: flags are updated, the caller stores the byte.

    fn flags_from(&mut self, result: AluResult) -> u8 {
        self.regs.f = result.flags;
        result.value
    }

    pub fn inc(&mut self, value: u8) -> u8 {
        self.flags_from(alu::inc8(value, self.regs.f))
    }

    pub fn dec(&mut self, value: u8) -> u8 {
        self.flags_from(alu::dec8(value, self.regs.f))
    }

    pub fn rlc(&mut self, value: u8) -> u8 {
        self.flags_from(alu::rlc(value))
    }

    pub fn rrc(&mut self, value: u8) -> u8 {
        self.flags_from(alu::rrc(value))
    }

    pub fn rl(&mut self, value: u8) -> u8 {
        self.flags_from(alu::rl(value, self.regs.f))
    }

    pub fn rr(&mut self, value: u8) -> u8 {
        self.flags_from(alu::rr(value, self.regs.f))
    }

    pub fn sla(&mut self, value: u8) -> u8 {
        self.flags_from(alu::sla(value))
    }

    pub fn sra(&mut self, value: u8) -> u8 {
        self.flags_from(alu::sra(value))
    }

    pub fn sll(&mut self, value: u8) -> u8 {
        self.flags_from(alu::sll(value))
    }

    pub fn srl(&mut self, value: u8) -> u8 {
        self.flags_from(alu::srl(value))
    }

    /// BIT b on a register.
    pub fn bit(&mut self, bit: u8, value: u8) {
        self.regs.f = alu::bit(bit, value, self.regs.f);
    }

    /// BIT b on `(IX+d)`/`(IY+d)`. Uses the EA latched by `ea_ix`/`ea_iy`.
    pub fn bit_indexed(&mut self, bit: u8, value: u8) {
        self.regs.f = alu::bit_indexed(bit, value, self.regs.f, self.regs.ea);
    }

    /// RRD: rotate the low nibbles of A and `(HL)` right.
    pub fn rrd<B: Z180Bus>(&mut self, bus: &mut B) {
        let hl = self.regs.hl();
        let n = self.rm(bus, hl);
        self.wm(bus, hl, (n >> 4) | (self.regs.a << 4));
        self.regs.a = (self.regs.a & 0xF0) | (n & 0x0F);
        self.regs.f = (self.regs.f & CF) | tables().szp[self.regs.a as usize];
    }

    /// RLD: rotate the low nibbles of A and `(HL)` left.
    pub fn rld<B: Z180Bus>(&mut self, bus: &mut B) {
        let hl = self.regs.hl();
        let n = self.rm(bus, hl);
        self.wm(bus, hl, (n << 4) | (self.regs.a & 0x0F));
        self.regs.a = (self.regs.a & 0xF0) | (n >> 4);
        self.regs.f = (self.regs.f & CF) | tables().szp[self.regs.a as usize];
    }

    /// LD A,I. P/V reports IFF2.
    pub fn ld_a_i(&mut self) {
        self.regs.a = self.regs.i;
        self.regs.f = (self.regs.f & CF) | tables().sz[self.regs.a as usize] | self.iff2_pv();
    }

    /// LD A,R. Bit 7 comes from the last LD R,A.
    pub fn ld_a_r(&mut self) {
        self.regs.a = self.regs.r_visible();
        self.regs.f = (self.regs.f & CF) | tables().sz[self.regs.a as usize] | self.iff2_pv();
    }

    pub fn ld_i_a(&mut self) {
        self.regs.i = self.regs.a;
    }

    pub fn ld_r_a(&mut self) {
        self.regs.r = self.regs.a;
        self.regs.r2 = self.regs.a & 0x80;
    }

    /// Refresh cycle: bump the low 7 bits of R.
    pub fn inc_r(&mut self) {
        self.regs.r = (self.regs.r & 0x80) | (self.regs.r.wrapping_add(1) & 0x7F);
    }

    fn iff2_pv(&self) -> u8 {
        u8::from(self.regs.iff2) << 2
    }
}
