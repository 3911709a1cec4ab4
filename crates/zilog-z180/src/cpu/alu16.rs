//! 16-bit arithmetic.

use crate::flags::{CF, HF, NF, SF, VF, ZF};
use crate::registers::Pair;

use super::Z180;

impl Z180 {
    /// ADD HL/IX/IY,rr. S, Z and P/V are carried over; only H and C are
    /// computed. N, X and Y are cleared.
    pub fn add16(&mut self, dst: Pair, src: Pair) {
        let d = u32::from(self.regs.get16(dst));
        let s = u32::from(self.regs.get16(src));
        let res = d + s;
        self.regs.f = (self.regs.f & (SF | ZF | VF))
            | (((d ^ res ^ s) >> 8) as u8 & HF)
            | ((res >> 16) as u8 & CF);
        self.regs.set16(dst, res as u16);
    }

    /// ADC HL,rr.
    pub fn adc16(&mut self, src: Pair) {
        let hl = u32::from(self.regs.hl());
        let s = u32::from(self.regs.get16(src));
        let res = hl + s + u32::from(self.regs.f & CF);
        self.regs.f = (((hl ^ res ^ s) >> 8) as u8 & HF)
            | ((res >> 16) as u8 & CF)
            | ((res >> 8) as u8 & SF)
            | (if res & 0xFFFF == 0 { ZF } else { 0 })
            | (((s ^ hl ^ 0x8000) & (s ^ res) & 0x8000) >> 13) as u8;
        self.regs.set_hl(res as u16);
    }

    /// SBC HL,rr.
    pub fn sbc16(&mut self, src: Pair) {
        let hl = u32::from(self.regs.hl());
        let s = u32::from(self.regs.get16(src));
        let res = hl.wrapping_sub(s).wrapping_sub(u32::from(self.regs.f & CF));
        self.regs.f = (((hl ^ res ^ s) >> 8) as u8 & HF)
            | NF
            | ((res >> 16) as u8 & CF)
            | ((res >> 8) as u8 & SF)
            | (if res & 0xFFFF == 0 { ZF } else { 0 })
            | (((s ^ hl) & (hl ^ res) & 0x8000) >> 13) as u8;
        self.regs.set_hl(res as u16);
    }

    /// MLT rr: rr = high * low. Flags untouched.
    pub fn mlt(&mut self, pair: Pair) {
        let [lo, hi] = self.regs.get16(pair).to_le_bytes();
        self.regs.set16(pair, u16::from(hi) * u16::from(lo));
    }
}
