//! Register exchanges.

use std::mem::swap;

use crate::bus::Z180Bus;
use crate::registers::Pair;

use super::Z180;

impl Z180 {
    /// EX AF,AF'.
    pub fn ex_af(&mut self) {
        let r = &mut self.regs;
        swap(&mut r.a, &mut r.a_alt);
        swap(&mut r.f, &mut r.f_alt);
    }

    /// EX DE,HL.
    pub fn ex_de_hl(&mut self) {
        let r = &mut self.regs;
        swap(&mut r.d, &mut r.h);
        swap(&mut r.e, &mut r.l);
    }

    /// EXX: swap BC, DE and HL with their alternates.
    pub fn exx(&mut self) {
        let r = &mut self.regs;
        swap(&mut r.b, &mut r.b_alt);
        swap(&mut r.c, &mut r.c_alt);
        swap(&mut r.d, &mut r.d_alt);
        swap(&mut r.e, &mut r.e_alt);
        swap(&mut r.h, &mut r.h_alt);
        swap(&mut r.l, &mut r.l_alt);
    }

    /// EX (SP),HL/IX/IY.
    pub fn ex_sp<B: Z180Bus>(&mut self, bus: &mut B, pair: Pair) {
        let sp = self.regs.sp;
        let top = self.rm16(bus, sp);
        self.wm16(bus, sp, self.regs.get16(pair));
        self.regs.set16(pair, top);
    }
}
