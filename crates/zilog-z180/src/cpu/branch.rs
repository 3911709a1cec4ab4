//! Jumps, calls, returns and the stack.

use crate::bus::Z180Bus;
use crate::outcome::{Condition, Outcome};
use crate::registers::Pair;

use super::Z180;

impl Z180 {
    /// Push a word: SP -= 2, then write.
    pub fn push_word<B: Z180Bus>(&mut self, bus: &mut B, value: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(2);
        self.wm16(bus, self.regs.sp, value);
    }

    /// Pop a word: read, then SP += 2.
    pub fn pop_word<B: Z180Bus>(&mut self, bus: &mut B) -> u16 {
        let value = self.rm16(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }

    pub fn push<B: Z180Bus>(&mut self, bus: &mut B, pair: Pair) {
        let value = self.regs.get16(pair);
        self.push_word(bus, value);
    }

    pub fn pop<B: Z180Bus>(&mut self, bus: &mut B, pair: Pair) {
        let value = self.pop_word(bus);
        self.regs.set16(pair, value);
    }

    /// JP nn.
    pub fn jp<B: Z180Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.arg16(bus);
    }

    /// JP cc,nn. The immediate is skipped unread when not taken.
    pub fn jp_cond<B: Z180Bus>(&mut self, bus: &mut B, cond: Condition) -> Outcome {
        if cond.holds(self.regs.f) {
            self.jp(bus);
            Outcome::Taken
        } else {
            self.regs.pc = self.regs.pc.wrapping_add(2);
            Outcome::Fallthrough
        }
    }

    /// JP (HL)/(IX)/(IY).
    pub fn jp_pair(&mut self, pair: Pair) {
        self.regs.pc = self.regs.get16(pair);
    }

    /// JR e. The displacement is relative to the following instruction.
    pub fn jr<B: Z180Bus>(&mut self, bus: &mut B) {
        let d = self.arg(bus) as i8;
        self.regs.pc = self.regs.pc.wrapping_add_signed(i16::from(d));
    }

    pub fn jr_cond<B: Z180Bus>(&mut self, bus: &mut B, cond: Condition) -> Outcome {
        if cond.holds(self.regs.f) {
            self.jr(bus);
            Outcome::Taken
        } else {
            self.regs.pc = self.regs.pc.wrapping_add(1);
            Outcome::Fallthrough
        }
    }

    /// CALL nn. The target is latched in EA.
    pub fn call<B: Z180Bus>(&mut self, bus: &mut B) {
        self.regs.ea = self.arg16(bus);
        self.push_word(bus, self.regs.pc);
        self.regs.pc = self.regs.ea;
    }

    pub fn call_cond<B: Z180Bus>(&mut self, bus: &mut B, cond: Condition) -> Outcome {
        if cond.holds(self.regs.f) {
            self.call(bus);
            Outcome::Taken
        } else {
            self.regs.pc = self.regs.pc.wrapping_add(2);
            Outcome::Fallthrough
        }
    }

    pub fn ret<B: Z180Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.pop_word(bus);
    }

    pub fn ret_cond<B: Z180Bus>(&mut self, bus: &mut B, cond: Condition) -> Outcome {
        if cond.holds(self.regs.f) {
            self.ret(bus);
            Outcome::Taken
        } else {
            Outcome::Fallthrough
        }
    }

    /// RETN: return and restore IFF1 from IFF2.
    pub fn retn<B: Z180Bus>(&mut self, bus: &mut B) {
        log::trace!("z180: RETN iff1={} iff2={}", self.regs.iff1, self.regs.iff2);
        self.ret(bus);
        self.regs.iff1 = self.regs.iff2;
    }

    /// RETI: return and notify the daisy chain. IFF1 is left as is.
    pub fn reti<B: Z180Bus>(&mut self, bus: &mut B) {
        self.ret(bus);
        log::trace!("z180: RETI to {:04X}", self.regs.pc);
        bus.reti();
    }

    /// RST p: push PC and jump to a fixed vector.
    pub fn rst<B: Z180Bus>(&mut self, bus: &mut B, addr: u16) {
        self.push_word(bus, self.regs.pc);
        self.regs.pc = addr;
    }
}
