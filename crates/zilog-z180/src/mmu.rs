//! Memory management unit.
//!
//! The logical 64K space is split into 4K pages. CBAR divides those pages
//! into three areas:
//!
//! ```text
//!   page 0 ......... BA-1   common area 0 (no offset)
//!   page BA ........ CA-1   bank area     (+ BBR << 12)
//!   page CA ........ 15     common area 1 (+ CBR << 12)
//! ```
//!
//! where BA is the low nibble of CBAR and CA the high nibble. Physical
//! addresses are 20 bits wide.

/// Physical address mask (1 MiB).
pub const PHYS_MASK: u32 = 0xF_FFFF;

/// MMU control registers and the page table derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mmu {
    cbar: u8,
    cbr: u8,
    bbr: u8,
    pages: [u32; 16],
}

impl Mmu {
    /// CBAR value after reset: bank area starts at page 0, common area 1 at
    /// page 15, both with zero offset.
    pub const RESET_CBAR: u8 = 0xF0;

    #[must_use]
    pub fn new() -> Self {
        Self::with_registers(Self::RESET_CBAR, 0, 0)
    }

    #[must_use]
    pub fn with_registers(cbar: u8, cbr: u8, bbr: u8) -> Self {
        let mut mmu = Self {
            cbar,
            cbr,
            bbr,
            pages: [0; 16],
        };
        mmu.recompute();
        mmu
    }

    #[must_use]
    pub const fn cbar(&self) -> u8 {
        self.cbar
    }

    #[must_use]
    pub const fn cbr(&self) -> u8 {
        self.cbr
    }

    #[must_use]
    pub const fn bbr(&self) -> u8 {
        self.bbr
    }

    /// Bank area base page (low nibble of CBAR).
    #[must_use]
    pub const fn bank_base(&self) -> u8 {
        self.cbar & 0x0F
    }

    /// Common area 1 base page (high nibble of CBAR).
    #[must_use]
    pub const fn common_base(&self) -> u8 {
        self.cbar >> 4
    }

    pub fn set_cbar(&mut self, value: u8) {
        self.cbar = value;
        self.recompute();
    }

    pub fn set_cbr(&mut self, value: u8) {
        self.cbr = value;
        self.recompute();
    }

    pub fn set_bbr(&mut self, value: u8) {
        self.bbr = value;
        self.recompute();
    }

    /// Physical base of a logical 4K page.
    #[must_use]
    pub const fn page_base(&self, page: usize) -> u32 {
        self.pages[page & 0x0F]
    }

    /// Translate a logical address to a 20-bit physical address.
    #[must_use]
    pub const fn translate(&self, logical: u16) -> u32 {
        self.pages[(logical >> 12) as usize & 0x0F] | (logical as u32 & 0x0FFF)
    }

    fn recompute(&mut self) {
        let bank_base = u32::from(self.bank_base());
        let common_base = u32::from(self.common_base());
        for (page, base) in (0u32..).zip(self.pages.iter_mut()) {
            let mut addr = page << 12;
            if page >= bank_base {
                if page >= common_base {
                    addr += u32::from(self.cbr) << 12;
                } else {
                    addr += u32::from(self.bbr) << 12;
                }
            }
            *base = addr & PHYS_MASK;
        }
        log::debug!(
            "mmu: cbar={:02X} cbr={:02X} bbr={:02X}",
            self.cbar,
            self.cbr,
            self.bbr
        );
    }
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}
