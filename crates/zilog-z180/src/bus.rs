//! Host-side bus hooks for the Z180.

use emu_core::{IoBus, SimpleBus};

/// The bus a Z180 runs against.
///
/// Memory addresses passed in are physical (already through the MMU). The
/// extra hooks have defaults so a plain `IoBus` only needs an empty impl.
pub trait Z180Bus: IoBus {
    /// Opcode fetch. Defaults to an ordinary read.
    fn read_opcode(&mut self, address: u32) -> u8 {
        self.read(address)
    }

    /// Opcode argument fetch. Defaults to an ordinary read.
    fn read_argument(&mut self, address: u32) -> u8 {
        self.read(address)
    }

    /// Read an on-chip register the core does not own (ASCI, CSIO, PRT,
    /// DMA, ...). `reg` is the offset within the internal block, 0x00-0x3F.
    fn read_internal(&mut self, _reg: u8) -> u8 {
        0xFF
    }

    /// Write an on-chip register the core does not own.
    fn write_internal(&mut self, _reg: u8, _value: u8) {}

    /// Called once per RETI so an interrupt daisy chain can re-arm.
    fn reti(&mut self) {}
}

impl Z180Bus for SimpleBus {}
