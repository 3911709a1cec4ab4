//! Flat register snapshot.
//!
//! Byte layout (version 1), all words little-endian:
//!
//! ```text
//!  0      version
//!  1..9   A F B C D E H L
//!  9..17  A' F' B' C' D' E' H' L'
//! 17..25  IX IY SP PC
//! 25..28  I R R2
//! 28..30  EA
//! 30..35  IFF1 IFF2 IM after-EI halt
//! 35..39  ICR CBAR CBR BBR
//! ```

use thiserror::Error;

use crate::registers::{HaltState, Registers};

/// Errors from decoding a snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot is {actual} bytes, expected {expected}")]
    Length { expected: usize, actual: usize },
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u8),
    #[error("invalid halt state {0}")]
    InvalidHaltState(u8),
    #[error("invalid interrupt mode {0}")]
    InvalidInterruptMode(u8),
}

/// Register file plus the control registers the core owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub regs: Registers,
    pub icr: u8,
    pub cbar: u8,
    pub cbr: u8,
    pub bbr: u8,
}

impl Snapshot {
    pub const VERSION: u8 = 1;
    pub const LEN: usize = 39;

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let r = &self.regs;
        let mut out = Vec::with_capacity(Self::LEN);
        out.push(Self::VERSION);
        out.extend_from_slice(&[r.a, r.f, r.b, r.c, r.d, r.e, r.h, r.l]);
        out.extend_from_slice(&[
            r.a_alt, r.f_alt, r.b_alt, r.c_alt, r.d_alt, r.e_alt, r.h_alt, r.l_alt,
        ]);
        for word in [r.ix, r.iy, r.sp, r.pc] {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out.extend_from_slice(&[r.i, r.r, r.r2]);
        out.extend_from_slice(&r.ea.to_le_bytes());
        out.extend_from_slice(&[
            u8::from(r.iff1),
            u8::from(r.iff2),
            r.im,
            u8::from(r.after_ei),
            r.halt.code(),
        ]);
        out.extend_from_slice(&[self.icr, self.cbar, self.cbr, self.bbr]);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        if let Some(&version) = bytes.first()
            && version != Self::VERSION
        {
            return Err(SnapshotError::UnsupportedVersion(version));
        }
        if bytes.len() != Self::LEN {
            return Err(SnapshotError::Length {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }

        let byte = |i: usize| bytes[i];
        let word = |i: usize| u16::from_le_bytes([bytes[i], bytes[i + 1]]);

        let halt = HaltState::from_code(byte(34)).ok_or(SnapshotError::InvalidHaltState(byte(34)))?;

        let regs = Registers {
            a: byte(1),
            f: byte(2),
            b: byte(3),
            c: byte(4),
            d: byte(5),
            e: byte(6),
            h: byte(7),
            l: byte(8),
            a_alt: byte(9),
            f_alt: byte(10),
            b_alt: byte(11),
            c_alt: byte(12),
            d_alt: byte(13),
            e_alt: byte(14),
            h_alt: byte(15),
            l_alt: byte(16),
            ix: word(17),
            iy: word(19),
            sp: word(21),
            pc: word(23),
            i: byte(25),
            r: byte(26),
            r2: byte(27) & 0x80,
            ea: word(28),
            iff1: byte(30) != 0,
            iff2: byte(31) != 0,
            im: byte(32),
            after_ei: byte(33) != 0,
            halt,
        };

        let snapshot = Self {
            regs,
            icr: byte(35),
            cbar: byte(36),
            cbr: byte(37),
            bbr: byte(38),
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check fields whose type admits values the CPU cannot hold.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.regs.im > 2 {
            return Err(SnapshotError::InvalidInterruptMode(self.regs.im));
        }
        Ok(())
    }
}
