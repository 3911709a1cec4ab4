//! Interrupt enable state, HALT and SLEEP.

use crate::bus::Z180Bus;
use crate::registers::HaltState;

use super::Z180;

/// NMI restart address.
pub const NMI_VECTOR: u16 = 0x0066;

/// IM 1 restart address.
pub const IM1_VECTOR: u16 = 0x0038;

impl Z180 {
    /// EI. Interrupts stay blocked until the next instruction completes.
    pub fn ei(&mut self) {
        self.regs.iff1 = true;
        self.regs.iff2 = true;
        self.regs.after_ei = true;
    }

    pub fn di(&mut self) {
        self.regs.iff1 = false;
        self.regs.iff2 = false;
    }

    /// IM 0/1/2. Any other mode is ignored.
    pub fn im(&mut self, mode: u8) {
        if mode <= 2 {
            self.regs.im = mode;
        } else {
            log::debug!("z180: ignoring IM {mode}");
        }
    }

    /// HALT. PC is held on the HALT opcode until an interrupt or reset.
    pub fn halt(&mut self) {
        self.regs.pc = self.regs.pc.wrapping_sub(1);
        self.regs.halt = HaltState::Halted;
        log::trace!("z180: halted at {:04X}", self.regs.pc);
    }

    /// SLP. Also empties the cycle budget so the scheduler gets control
    /// back at once.
    pub fn slp(&mut self) {
        self.regs.halt = HaltState::Sleeping;
        self.set_budget(0);
        log::trace!("z180: sleeping, resume at {:04X}", self.regs.pc);
    }

    /// Leave HALT or SLEEP. Either way PC steps forward by one.
    pub fn leave_halt(&mut self) {
        if self.is_halted() {
            self.regs.pc = self.regs.pc.wrapping_add(1);
            self.regs.halt = HaltState::Running;
        }
    }

    #[must_use]
    pub const fn is_halted(&self) -> bool {
        !matches!(self.regs.halt, HaltState::Running)
    }

    /// Call before each instruction. Closes the window opened by EI.
    pub fn begin_instruction(&mut self) {
        self.regs.after_ei = false;
    }

    /// Would a maskable interrupt be taken now?
    #[must_use]
    pub const fn accepts_interrupt(&self) -> bool {
        self.regs.iff1 && !self.regs.after_ei
    }

    /// Take a maskable interrupt. `data` is the byte the device puts on the
    /// bus: an RST opcode in IM 0, the vector low byte in IM 2.
    ///
    /// The caller checks [`accepts_interrupt`](Self::accepts_interrupt)
    /// first.
    pub fn accept_interrupt<B: Z180Bus>(&mut self, bus: &mut B, data: u8) {
        self.leave_halt();
        self.regs.iff1 = false;
        self.regs.iff2 = false;
        let target = match self.regs.im {
            0 => u16::from(data & 0x38),
            1 => IM1_VECTOR,
            _ => {
                let table = u16::from(self.regs.i) << 8 | u16::from(data);
                self.rm16(bus, table)
            }
        };
        log::trace!(
            "z180: IM{} interrupt, data={data:02X}, {:04X} -> {target:04X}",
            self.regs.im,
            self.regs.pc
        );
        self.push_word(bus, self.regs.pc);
        self.regs.pc = target;
    }

    /// Take a non-maskable interrupt.
    pub fn nmi<B: Z180Bus>(&mut self, bus: &mut B) {
        self.leave_halt();
        self.regs.iff2 = self.regs.iff1;
        self.regs.iff1 = false;
        log::trace!("z180: NMI at {:04X}", self.regs.pc);
        self.push_word(bus, self.regs.pc);
        self.regs.pc = NMI_VECTOR;
    }
}
