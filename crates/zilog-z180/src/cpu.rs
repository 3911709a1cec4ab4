//! Z180 CPU core.
//!
//! The core owns the register file, the MMU and the I/O control register.
//! It has no fetch/decode loop: a host dispatcher reads opcodes with
//! [`Z180::rop`] and calls one operation per instruction, charging the
//! cycle cost it looks up for the opcode. Operations that can take two
//! paths return an [`Outcome`](crate::Outcome) so the host knows which cost
//! to charge.
//!
//! The CPU does not own the bus. Every operation that touches memory or
//! I/O takes it as a parameter.

mod access;
mod alu16;
mod arith;
mod block;
mod branch;
mod exchange;
mod interrupt;

pub use interrupt::{IM1_VECTOR, NMI_VECTOR};

use emu_core::{Observable, Value};

use crate::config::Z180Config;
use crate::flags::{CF, HF, NF, PF, SF, XF, YF, ZF};
use crate::mmu::Mmu;
use crate::registers::Registers;
use crate::snapshot::{Snapshot, SnapshotError};

/// Offsets of the control registers the core owns, within the internal
/// I/O block.
pub mod internal {
    /// MMU common base register.
    pub const CBR: u8 = 0x38;
    /// MMU bank base register.
    pub const BBR: u8 = 0x39;
    /// MMU common/bank area register.
    pub const CBAR: u8 = 0x3A;
    /// I/O control register.
    pub const ICR: u8 = 0x3F;
}

/// Writable bits of ICR: IOA7, IOA6 and IOSTP.
pub const ICR_MASK: u8 = 0xE0;

/// Z180 CPU.
pub struct Z180 {
    pub(crate) regs: Registers,
    pub(crate) mmu: Mmu,
    /// I/O control register. Bits 7..6 place the internal I/O block.
    icr: u8,
    /// Remaining cycles in the current time slice.
    budget: i64,
    config: Z180Config,
}

impl Z180 {
    /// Create a Z180 in its hardware reset state.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Z180Config::default())
    }

    /// Create a Z180 whose reset state comes from `config`.
    #[must_use]
    pub fn with_config(config: Z180Config) -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            mmu: Mmu::new(),
            icr: 0,
            budget: 0,
            config,
        };
        cpu.reset();
        cpu
    }

    /// Return to the configured power-on state. The cycle budget is left
    /// alone; it belongs to the scheduler.
    pub fn reset(&mut self) {
        self.regs = Registers {
            sp: self.config.sp,
            ..Registers::default()
        };
        self.mmu = Mmu::with_registers(self.config.cbar, self.config.cbr, self.config.bbr);
        self.icr = self.config.icr & ICR_MASK;
        log::debug!("z180: reset, icr={:02X}", self.icr);
    }

    #[must_use]
    pub const fn config(&self) -> &Z180Config {
        &self.config
    }

    #[must_use]
    pub const fn regs(&self) -> &Registers {
        &self.regs
    }

    /// Direct register access for hosts, debuggers and interrupt vector
    /// delivery.
    pub fn regs_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    #[must_use]
    pub const fn mmu(&self) -> &Mmu {
        &self.mmu
    }

    /// MMU access for hosts. The setters keep the page table current.
    pub fn mmu_mut(&mut self) -> &mut Mmu {
        &mut self.mmu
    }

    #[must_use]
    pub const fn icr(&self) -> u8 {
        self.icr
    }

    /// Set ICR. Only bits 7..5 are stored.
    pub fn set_icr(&mut self, value: u8) {
        self.icr = value & ICR_MASK;
        log::debug!("z180: icr={:02X}, internal I/O at {:02X}", self.icr, self.icr & 0xC0);
    }

    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.regs.pc
    }

    pub fn set_pc(&mut self, value: u16) {
        self.regs.pc = value;
    }

    #[must_use]
    pub const fn sp(&self) -> u16 {
        self.regs.sp
    }

    pub fn set_sp(&mut self, value: u16) {
        self.regs.sp = value;
    }

    /// Cycles left in the current slice. Goes negative on overrun.
    #[must_use]
    pub const fn budget(&self) -> i64 {
        self.budget
    }

    pub fn set_budget(&mut self, cycles: i64) {
        self.budget = cycles;
    }

    /// Consume `cycles` from the budget.
    pub fn charge(&mut self, cycles: u32) {
        self.budget -= i64::from(cycles);
    }

    /// Copy out the register file and owned control registers.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            regs: self.regs,
            icr: self.icr,
            cbar: self.mmu.cbar(),
            cbr: self.mmu.cbr(),
            bbr: self.mmu.bbr(),
        }
    }

    /// Load a snapshot. The MMU page table is rebuilt from it. An invalid
    /// snapshot leaves the CPU untouched.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        snapshot.validate()?;
        self.regs = snapshot.regs;
        self.regs.r2 &= 0x80;
        self.mmu = Mmu::with_registers(snapshot.cbar, snapshot.cbr, snapshot.bbr);
        self.icr = snapshot.icr & ICR_MASK;
        Ok(())
    }
}

impl Default for Z180 {
    fn default() -> Self {
        Self::new()
    }
}

/// All query paths supported by the Z180.
const Z180_QUERY_PATHS: &[&str] = &[
    // Main registers
    "a", "f", "b", "c", "d", "e", "h", "l",
    // Register pairs
    "af", "bc", "de", "hl",
    // Alternate pairs
    "af'", "bc'", "de'", "hl'",
    // Index registers
    "ix", "iy",
    // Other registers
    "sp", "pc", "i", "r", "ea",
    // Flags (individual)
    "flags.s", "flags.z", "flags.y", "flags.h",
    "flags.x", "flags.p", "flags.n", "flags.c",
    // Interrupt state
    "iff1", "iff2", "im", "after_ei",
    // CPU state
    "halt", "budget",
    // Control registers
    "icr", "mmu.cbar", "mmu.cbr", "mmu.bbr", "mmu.pc",
];

const fn pair(hi: u8, lo: u8) -> u16 {
    (hi as u16) << 8 | lo as u16
}

impl Observable for Z180 {
    fn query(&self, path: &str) -> Option<Value> {
        let r = &self.regs;
        match path {
            "a" => Some(r.a.into()),
            "f" => Some(r.f.into()),
            "b" => Some(r.b.into()),
            "c" => Some(r.c.into()),
            "d" => Some(r.d.into()),
            "e" => Some(r.e.into()),
            "h" => Some(r.h.into()),
            "l" => Some(r.l.into()),

            "af" => Some(r.af().into()),
            "bc" => Some(r.bc().into()),
            "de" => Some(r.de().into()),
            "hl" => Some(r.hl().into()),

            "af'" => Some(pair(r.a_alt, r.f_alt).into()),
            "bc'" => Some(pair(r.b_alt, r.c_alt).into()),
            "de'" => Some(pair(r.d_alt, r.e_alt).into()),
            "hl'" => Some(pair(r.h_alt, r.l_alt).into()),

            "ix" => Some(r.ix.into()),
            "iy" => Some(r.iy.into()),

            "sp" => Some(r.sp.into()),
            "pc" => Some(r.pc.into()),
            "i" => Some(r.i.into()),
            "r" => Some(r.r_visible().into()),
            "ea" => Some(r.ea.into()),

            "flags.s" => Some((r.f & SF != 0).into()),
            "flags.z" => Some((r.f & ZF != 0).into()),
            "flags.y" => Some((r.f & YF != 0).into()),
            "flags.h" => Some((r.f & HF != 0).into()),
            "flags.x" => Some((r.f & XF != 0).into()),
            "flags.p" => Some((r.f & PF != 0).into()),
            "flags.n" => Some((r.f & NF != 0).into()),
            "flags.c" => Some((r.f & CF != 0).into()),

            "iff1" => Some(r.iff1.into()),
            "iff2" => Some(r.iff2.into()),
            "im" => Some(r.im.into()),
            "after_ei" => Some(r.after_ei.into()),

            "halt" => Some(r.halt.name().into()),
            // Saturated; the budget never legitimately leaves this range.
            "budget" => Some((self.budget.clamp(0, i64::from(u32::MAX)) as u32).into()),

            "icr" => Some(self.icr.into()),
            "mmu.cbar" => Some(self.mmu.cbar().into()),
            "mmu.cbr" => Some(self.mmu.cbr().into()),
            "mmu.bbr" => Some(self.mmu.bbr().into()),
            // Physical address of the next opcode
            "mmu.pc" => Some(self.mmu.translate(r.pc).into()),

            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        Z180_QUERY_PATHS
    }
}
