//! Zilog Z180 / Hitachi HD64180 instruction-semantics core.
//!
//! Byte-accurate register, flag, memory and I/O effects of every Z180
//! operation, including the MMU and the undocumented flag bits. Fetch,
//! decode and cycle tables belong to the host: it calls one operation per
//! instruction and charges cycles from the returned [`Outcome`].

pub mod alu;
mod bus;
mod config;
mod cpu;
pub mod flags;
mod mmu;
mod outcome;
mod registers;
mod snapshot;

pub use bus::Z180Bus;
pub use config::Z180Config;
pub use cpu::{ICR_MASK, IM1_VECTOR, NMI_VECTOR, Z180, internal};
pub use flags::{CF, HF, NF, PF, SF, VF, XF, YF, ZF};
pub use mmu::{Mmu, PHYS_MASK};
pub use outcome::{Condition, Outcome};
pub use registers::{HaltState, Pair, Reg8, Registers};
pub use snapshot::{Snapshot, SnapshotError};
