//! Z180 register file.

use crate::flags::ZF;

/// 8-bit register identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
}

/// 16-bit register identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pair {
    AF,
    BC,
    DE,
    HL,
    IX,
    IY,
    SP,
}

/// Run state of the instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HaltState {
    #[default]
    Running,
    /// HALT executed; PC points back at the HALT opcode.
    Halted,
    /// SLP executed; low-power halt.
    Sleeping,
}

impl HaltState {
    /// Stable numeric encoding used by snapshots (0, 1, 2).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            HaltState::Running => 0,
            HaltState::Halted => 1,
            HaltState::Sleeping => 2,
        }
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(HaltState::Running),
            1 => Some(HaltState::Halted),
            2 => Some(HaltState::Sleeping),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            HaltState::Running => "running",
            HaltState::Halted => "halted",
            HaltState::Sleeping => "sleeping",
        }
    }
}

/// Z180 registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registers {
    // Main registers
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,

    // Alternate registers
    pub a_alt: u8,
    pub f_alt: u8,
    pub b_alt: u8,
    pub c_alt: u8,
    pub d_alt: u8,
    pub e_alt: u8,
    pub h_alt: u8,
    pub l_alt: u8,

    // Index registers
    pub ix: u16,
    pub iy: u16,

    // Other registers
    pub sp: u16,
    pub pc: u16,
    pub i: u8,
    /// Refresh counter. Only the low 7 bits count; see `r2`.
    pub r: u8,
    /// Bit 7 of R as last written by LD R,A.
    pub r2: u8,

    /// Effective address of the last `(IX+d)`/`(IY+d)` or CALL target.
    /// BIT on an indexed operand copies X/Y from its high byte.
    pub ea: u16,

    // Interrupt state
    pub iff1: bool,
    pub iff2: bool,
    pub im: u8,
    /// EI was the previous instruction; interrupts wait one more.
    pub after_ei: bool,

    pub halt: HaltState,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            a: 0,
            f: ZF,
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            a_alt: 0,
            f_alt: 0,
            b_alt: 0,
            c_alt: 0,
            d_alt: 0,
            e_alt: 0,
            h_alt: 0,
            l_alt: 0,
            ix: 0xFFFF,
            iy: 0xFFFF,
            sp: 0,
            pc: 0,
            i: 0,
            r: 0,
            r2: 0,
            ea: 0,
            iff1: false,
            iff2: false,
            im: 0,
            after_ei: false,
            halt: HaltState::Running,
        }
    }
}

impl Registers {
    /// Get AF register pair.
    #[must_use]
    pub const fn af(&self) -> u16 {
        (self.a as u16) << 8 | self.f as u16
    }

    /// Get BC register pair.
    #[must_use]
    pub const fn bc(&self) -> u16 {
        (self.b as u16) << 8 | self.c as u16
    }

    /// Get DE register pair.
    #[must_use]
    pub const fn de(&self) -> u16 {
        (self.d as u16) << 8 | self.e as u16
    }

    /// Get HL register pair.
    #[must_use]
    pub const fn hl(&self) -> u16 {
        (self.h as u16) << 8 | self.l as u16
    }

    /// Set AF register pair.
    pub fn set_af(&mut self, value: u16) {
        self.a = (value >> 8) as u8;
        self.f = value as u8;
    }

    /// Set BC register pair.
    pub fn set_bc(&mut self, value: u16) {
        self.b = (value >> 8) as u8;
        self.c = value as u8;
    }

    /// Set DE register pair.
    pub fn set_de(&mut self, value: u16) {
        self.d = (value >> 8) as u8;
        self.e = value as u8;
    }

    /// Set HL register pair.
    pub fn set_hl(&mut self, value: u16) {
        self.h = (value >> 8) as u8;
        self.l = value as u8;
    }

    #[must_use]
    pub const fn get8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.a,
            Reg8::F => self.f,
            Reg8::B => self.b,
            Reg8::C => self.c,
            Reg8::D => self.d,
            Reg8::E => self.e,
            Reg8::H => self.h,
            Reg8::L => self.l,
        }
    }

    pub fn set8(&mut self, reg: Reg8, value: u8) {
        match reg {
            Reg8::A => self.a = value,
            Reg8::F => self.f = value,
            Reg8::B => self.b = value,
            Reg8::C => self.c = value,
            Reg8::D => self.d = value,
            Reg8::E => self.e = value,
            Reg8::H => self.h = value,
            Reg8::L => self.l = value,
        }
    }

    #[must_use]
    pub const fn get16(&self, pair: Pair) -> u16 {
        match pair {
            Pair::AF => self.af(),
            Pair::BC => self.bc(),
            Pair::DE => self.de(),
            Pair::HL => self.hl(),
            Pair::IX => self.ix,
            Pair::IY => self.iy,
            Pair::SP => self.sp,
        }
    }

    pub fn set16(&mut self, pair: Pair, value: u16) {
        match pair {
            Pair::AF => self.set_af(value),
            Pair::BC => self.set_bc(value),
            Pair::DE => self.set_de(value),
            Pair::HL => self.set_hl(value),
            Pair::IX => self.ix = value,
            Pair::IY => self.iy = value,
            Pair::SP => self.sp = value,
        }
    }

    /// R as software sees it: live low 7 bits, bit 7 from the last LD R,A.
    #[must_use]
    pub const fn r_visible(&self) -> u8 {
        (self.r & 0x7F) | self.r2
    }
}
