//! Memory and I/O bus interfaces.

/// Memory bus.
///
/// Components access memory through this trait. The bus handles address
/// decoding and routing to the appropriate device. Addresses are physical:
/// a CPU with an MMU translates before calling in, so the width depends on
/// the part (20 bits for the Z180).
pub trait Bus {
    /// Read a byte from the given physical address.
    fn read(&mut self, address: u32) -> u8;

    /// Write a byte to the given physical address.
    fn write(&mut self, address: u32, value: u8);
}

/// A bus that also has a separate I/O port space.
///
/// Z80-family parts reach peripherals through IN and OUT with a 16-bit port
/// address (the upper byte usually carries B or A).
pub trait IoBus: Bus {
    /// Read a byte from the given I/O port.
    fn read_io(&mut self, port: u16) -> u8;

    /// Write a byte to the given I/O port.
    fn write_io(&mut self, port: u16, value: u8);
}

/// Flat RAM bus with a latched port space.
///
/// Out-of-range addresses wrap at the RAM size, which must be a power of
/// two. Port writes are latched and read back, and every write is recorded
/// in order so tests can assert on I/O traffic.
pub struct SimpleBus {
    ram: Vec<u8>,
    mask: u32,
    ports: Vec<u8>,
    io_log: Vec<(u16, u8)>,
}

impl SimpleBus {
    /// 1 MiB of RAM, the full 20-bit physical space.
    pub const DEFAULT_SIZE: usize = 1 << 20;

    #[must_use]
    pub fn new() -> Self {
        Self::with_size(Self::DEFAULT_SIZE)
    }

    /// Create a bus with `size` bytes of RAM (rounded up to a power of two).
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        let size = size.max(1).next_power_of_two();
        Self {
            ram: vec![0; size],
            mask: (size - 1) as u32,
            ports: vec![0xFF; 0x1_0000],
            io_log: Vec::new(),
        }
    }

    /// Copy `data` into RAM starting at physical `address`.
    pub fn load(&mut self, address: u32, data: &[u8]) {
        for (offset, &byte) in data.iter().enumerate() {
            let addr = address.wrapping_add(offset as u32) & self.mask;
            self.ram[addr as usize] = byte;
        }
    }

    /// Read RAM without going through the `Bus` trait.
    #[must_use]
    pub fn peek(&self, address: u32) -> u8 {
        self.ram[(address & self.mask) as usize]
    }

    /// Preset the value a later port read will return.
    pub fn set_port(&mut self, port: u16, value: u8) {
        self.ports[port as usize] = value;
    }

    /// Every port write seen so far, oldest first.
    #[must_use]
    pub fn io_log(&self) -> &[(u16, u8)] {
        &self.io_log
    }
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, address: u32) -> u8 {
        self.ram[(address & self.mask) as usize]
    }

    fn write(&mut self, address: u32, value: u8) {
        self.ram[(address & self.mask) as usize] = value;
    }
}

impl IoBus for SimpleBus {
    fn read_io(&mut self, port: u16) -> u8 {
        self.ports[port as usize]
    }

    fn write_io(&mut self, port: u16, value: u8) {
        self.ports[port as usize] = value;
        self.io_log.push((port, value));
    }
}
