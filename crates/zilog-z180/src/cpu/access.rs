//! Memory and I/O access through the MMU and the internal I/O block.

use crate::bus::Z180Bus;

use super::{Z180, internal};

impl Z180 {
    /// Read a byte from a logical address.
    pub fn rm<B: Z180Bus>(&self, bus: &mut B, addr: u16) -> u8 {
        bus.read(self.mmu.translate(addr))
    }

    /// Write a byte to a logical address.
    pub fn wm<B: Z180Bus>(&self, bus: &mut B, addr: u16, value: u8) {
        bus.write(self.mmu.translate(addr), value);
    }

    /// Read a little-endian word. Each byte is translated on its own, so a
    /// word may straddle two differently-mapped pages.
    pub fn rm16<B: Z180Bus>(&self, bus: &mut B, addr: u16) -> u16 {
        let lo = self.rm(bus, addr);
        let hi = self.rm(bus, addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Write a little-endian word, low byte first.
    pub fn wm16<B: Z180Bus>(&self, bus: &mut B, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.wm(bus, addr, lo);
        self.wm(bus, addr.wrapping_add(1), hi);
    }

    /// Fetch an opcode byte at PC and advance PC.
    pub fn rop<B: Z180Bus>(&mut self, bus: &mut B) -> u8 {
        let addr = self.mmu.translate(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        bus.read_opcode(addr)
    }

    /// Fetch an argument byte at PC and advance PC.
    pub fn arg<B: Z180Bus>(&mut self, bus: &mut B) -> u8 {
        let addr = self.mmu.translate(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        bus.read_argument(addr)
    }

    /// Fetch a little-endian argument word and advance PC by 2.
    pub fn arg16<B: Z180Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.arg(bus);
        let hi = self.arg(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// `(IX+d)`: fetch the displacement and latch the effective address.
    pub fn ea_ix<B: Z180Bus>(&mut self, bus: &mut B) -> u16 {
        let d = self.arg(bus) as i8;
        self.regs.ea = self.regs.ix.wrapping_add_signed(i16::from(d));
        self.regs.ea
    }

    /// `(IY+d)`: fetch the displacement and latch the effective address.
    pub fn ea_iy<B: Z180Bus>(&mut self, bus: &mut B) -> u16 {
        let d = self.arg(bus) as i8;
        self.regs.ea = self.regs.iy.wrapping_add_signed(i16::from(d));
        self.regs.ea
    }

    /// True if `port` falls in the internal I/O block.
    #[must_use]
    pub const fn is_internal_port(&self, port: u16) -> bool {
        (port ^ self.icr() as u16) & 0xFFC0 == 0
    }

    /// Read an I/O port.
    pub fn input<B: Z180Bus>(&mut self, bus: &mut B, port: u16) -> u8 {
        if self.is_internal_port(port) {
            self.read_control(bus, (port & 0x3F) as u8)
        } else {
            bus.read_io(port)
        }
    }

    /// Write an I/O port.
    pub fn output<B: Z180Bus>(&mut self, bus: &mut B, port: u16, value: u8) {
        if self.is_internal_port(port) {
            self.write_control(bus, (port & 0x3F) as u8, value);
        } else {
            bus.write_io(port, value);
        }
    }

    fn read_control<B: Z180Bus>(&self, bus: &mut B, reg: u8) -> u8 {
        match reg {
            internal::CBR => self.mmu.cbr(),
            internal::BBR => self.mmu.bbr(),
            internal::CBAR => self.mmu.cbar(),
            internal::ICR => self.icr(),
            _ => bus.read_internal(reg),
        }
    }

    fn write_control<B: Z180Bus>(&mut self, bus: &mut B, reg: u8, value: u8) {
        match reg {
            internal::CBR => self.mmu.set_cbr(value),
            internal::BBR => self.mmu.set_bbr(value),
            internal::CBAR => self.mmu.set_cbar(value),
            internal::ICR => self.set_icr(value),
            _ => bus.write_internal(reg, value),
        }
    }
}
