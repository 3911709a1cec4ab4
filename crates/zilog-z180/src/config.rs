//! Z180 power-on configuration.

use crate::mmu::Mmu;

/// Values loaded into the core at reset.
///
/// `Default` matches the hardware reset state. Boot code on real boards
/// usually reprograms the MMU straight away; a host that starts from a
/// saved mapping can describe it here instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Z180Config {
    /// I/O control register. Bits 7..6 relocate the internal I/O block.
    pub icr: u8,
    pub cbar: u8,
    pub cbr: u8,
    pub bbr: u8,
    /// Initial stack pointer.
    pub sp: u16,
}

impl Default for Z180Config {
    fn default() -> Self {
        Self {
            icr: 0x00,
            cbar: Mmu::RESET_CBAR,
            cbr: 0x00,
            bbr: 0x00,
            sp: 0x0000,
        }
    }
}
