//! Block transfer, search and I/O instructions.
//!
//! Repeating forms run one iteration and rewind PC by 2 while there is work
//! left, so the dispatcher re-issues the instruction and interrupts can land
//! between iterations.

use crate::bus::Z180Bus;
use crate::flags::{CF, HF, NF, PF, SF, VF, XF, YF, ZF, tables};
use crate::outcome::Outcome;

use super::Z180;

/// P/V seed for INI/OUTI, indexed `[C & 3][io & 3]`.
const IREP_TMP1: [[u8; 4]; 4] = [[0, 0, 1, 0], [0, 1, 0, 1], [1, 0, 1, 1], [0, 1, 1, 0]];

/// P/V seed for IND/OUTD, indexed `[C & 3][io & 3]`.
const DREP_TMP1: [[u8; 4]; 4] = [[0, 1, 0, 0], [1, 0, 0, 1], [0, 0, 1, 0], [0, 1, 0, 1]];

/// P/V contribution of the (already decremented) B register.
#[rustfmt::skip]
const BREG_TMP2: [u8; 256] = [
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
];

/// Direction of a block step.
#[derive(Clone, Copy)]
enum Step {
    Up,
    Down,
}

impl Step {
    const fn apply(self, value: u16) -> u16 {
        match self {
            Step::Up => value.wrapping_add(1),
            Step::Down => value.wrapping_sub(1),
        }
    }

    const fn delta(self) -> i32 {
        match self {
            Step::Up => 1,
            Step::Down => -1,
        }
    }

    const fn parity_seed(self) -> &'static [[u8; 4]; 4] {
        match self {
            Step::Up => &IREP_TMP1,
            Step::Down => &DREP_TMP1,
        }
    }
}

impl Z180 {
    fn step_hl(&mut self, step: Step) {
        let hl = step.apply(self.regs.hl());
        self.regs.set_hl(hl);
    }

    fn block_ld<B: Z180Bus>(&mut self, bus: &mut B, step: Step) {
        let io = self.rm(bus, self.regs.hl());
        self.wm(bus, self.regs.de(), io);
        let n = self.regs.a.wrapping_add(io);
        let mut f = self.regs.f & (SF | ZF | CF);
        if n & 0x02 != 0 {
            f |= YF;
        }
        if n & 0x08 != 0 {
            f |= XF;
        }
        self.step_hl(step);
        let de = step.apply(self.regs.de());
        self.regs.set_de(de);
        let bc = self.regs.bc().wrapping_sub(1);
        self.regs.set_bc(bc);
        if bc != 0 {
            f |= VF;
        }
        self.regs.f = f;
    }

    fn block_cp<B: Z180Bus>(&mut self, bus: &mut B, step: Step) {
        let val = self.rm(bus, self.regs.hl());
        let a = self.regs.a;
        let mut res = a.wrapping_sub(val);
        self.step_hl(step);
        let bc = self.regs.bc().wrapping_sub(1);
        self.regs.set_bc(bc);
        let mut f = (self.regs.f & CF)
            | (tables().sz[res as usize] & !(YF | XF))
            | ((a ^ val ^ res) & HF)
            | NF;
        if f & HF != 0 {
            res = res.wrapping_sub(1);
        }
        if res & 0x02 != 0 {
            f |= YF;
        }
        if res & 0x08 != 0 {
            f |= XF;
        }
        if bc != 0 {
            f |= VF;
        }
        self.regs.f = f;
    }

    /// Flags shared by INI/IND/OUTI/OUTD, computed after B is decremented.
    fn block_io_flags(&mut self, io: u8, step: Step) {
        let b = self.regs.b;
        let c = self.regs.c;
        let mut f = tables().sz[b as usize];
        if io & SF != 0 {
            f |= NF;
        }
        if (i32::from(c) + i32::from(io) + step.delta()) & 0x100 != 0 {
            f |= HF | CF;
        }
        let seed = step.parity_seed()[(c & 3) as usize][(io & 3) as usize];
        if (seed ^ BREG_TMP2[b as usize] ^ (c >> 2) ^ (io >> 2)) & 1 != 0 {
            f |= PF;
        }
        self.regs.f = f;
    }

    fn block_in<B: Z180Bus>(&mut self, bus: &mut B, step: Step) {
        let io = self.input(bus, self.regs.bc());
        self.regs.b = self.regs.b.wrapping_sub(1);
        self.wm(bus, self.regs.hl(), io);
        self.step_hl(step);
        self.block_io_flags(io, step);
    }

    fn block_out<B: Z180Bus>(&mut self, bus: &mut B, step: Step) {
        let io = self.rm(bus, self.regs.hl());
        self.regs.b = self.regs.b.wrapping_sub(1);
        self.output(bus, self.regs.bc(), io);
        self.step_hl(step);
        self.block_io_flags(io, step);
    }

    fn block_out_m<B: Z180Bus>(&mut self, bus: &mut B, step: Step) {
        self.regs.b = self.regs.b.wrapping_sub(1);
        let io = self.rm(bus, self.regs.hl());
        self.output(bus, u16::from(self.regs.c), io);
        self.step_hl(step);
        self.regs.c = step.apply(u16::from(self.regs.c)) as u8;
        self.regs.f = if self.regs.b == 0 { NF | ZF } else { NF };
    }

    /// Rewind PC onto the two-byte instruction if it must run again.
    fn repeat_if(&mut self, again: bool) -> Outcome {
        if again {
            self.regs.pc = self.regs.pc.wrapping_sub(2);
        }
        Outcome::from_taken(again)
    }

    pub fn ldi<B: Z180Bus>(&mut self, bus: &mut B) {
        self.block_ld(bus, Step::Up);
    }

    pub fn ldd<B: Z180Bus>(&mut self, bus: &mut B) {
        self.block_ld(bus, Step::Down);
    }

    pub fn cpi<B: Z180Bus>(&mut self, bus: &mut B) {
        self.block_cp(bus, Step::Up);
    }

    pub fn cpd<B: Z180Bus>(&mut self, bus: &mut B) {
        self.block_cp(bus, Step::Down);
    }

    pub fn ini<B: Z180Bus>(&mut self, bus: &mut B) {
        self.block_in(bus, Step::Up);
    }

    pub fn ind<B: Z180Bus>(&mut self, bus: &mut B) {
        self.block_in(bus, Step::Down);
    }

    pub fn outi<B: Z180Bus>(&mut self, bus: &mut B) {
        self.block_out(bus, Step::Up);
    }

    pub fn outd<B: Z180Bus>(&mut self, bus: &mut B) {
        self.block_out(bus, Step::Down);
    }

    /// OTIM: output `(HL)` to port `C` (high byte zero), then step HL and C.
    pub fn otim<B: Z180Bus>(&mut self, bus: &mut B) {
        self.block_out_m(bus, Step::Up);
    }

    pub fn otdm<B: Z180Bus>(&mut self, bus: &mut B) {
        self.block_out_m(bus, Step::Down);
    }

    pub fn ldir<B: Z180Bus>(&mut self, bus: &mut B) -> Outcome {
        self.ldi(bus);
        self.repeat_if(self.regs.bc() != 0)
    }

    pub fn lddr<B: Z180Bus>(&mut self, bus: &mut B) -> Outcome {
        self.ldd(bus);
        self.repeat_if(self.regs.bc() != 0)
    }

    /// CPIR: stops on a match or when BC runs out.
    pub fn cpir<B: Z180Bus>(&mut self, bus: &mut B) -> Outcome {
        self.cpi(bus);
        self.repeat_if(self.regs.bc() != 0 && self.regs.f & ZF == 0)
    }

    pub fn cpdr<B: Z180Bus>(&mut self, bus: &mut B) -> Outcome {
        self.cpd(bus);
        self.repeat_if(self.regs.bc() != 0 && self.regs.f & ZF == 0)
    }

    pub fn inir<B: Z180Bus>(&mut self, bus: &mut B) -> Outcome {
        self.ini(bus);
        self.repeat_if(self.regs.b != 0)
    }

    pub fn indr<B: Z180Bus>(&mut self, bus: &mut B) -> Outcome {
        self.ind(bus);
        self.repeat_if(self.regs.b != 0)
    }

    pub fn otir<B: Z180Bus>(&mut self, bus: &mut B) -> Outcome {
        self.outi(bus);
        self.repeat_if(self.regs.b != 0)
    }

    pub fn otdr<B: Z180Bus>(&mut self, bus: &mut B) -> Outcome {
        self.outd(bus);
        self.repeat_if(self.regs.b != 0)
    }

    pub fn otimr<B: Z180Bus>(&mut self, bus: &mut B) -> Outcome {
        self.otim(bus);
        self.repeat_if(self.regs.b != 0)
    }

    pub fn otdmr<B: Z180Bus>(&mut self, bus: &mut B) -> Outcome {
        self.otdm(bus);
        self.repeat_if(self.regs.b != 0)
    }
}
