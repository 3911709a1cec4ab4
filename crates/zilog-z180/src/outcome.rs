//! Branch conditions and the taken/not-taken result of conditional and
//! repeating operations.

use crate::flags::{CF, PF, SF, ZF};

/// Which path a conditional or repeating operation took.
///
/// For repeating block instructions `Taken` means the instruction rewound
/// PC and will be issued again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Taken,
    Fallthrough,
}

impl Outcome {
    #[must_use]
    pub const fn from_taken(taken: bool) -> Self {
        if taken {
            Outcome::Taken
        } else {
            Outcome::Fallthrough
        }
    }

    #[must_use]
    pub const fn taken(self) -> bool {
        matches!(self, Outcome::Taken)
    }

    /// Cycle cost of this path: `base` always, plus `extra` when taken.
    #[must_use]
    pub const fn cycles(self, base: u32, extra: u32) -> u32 {
        match self {
            Outcome::Taken => base + extra,
            Outcome::Fallthrough => base,
        }
    }
}

/// Branch condition, in opcode encoding order (bits 5..3 of the opcode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    NZ,
    Z,
    NC,
    C,
    /// Parity odd.
    PO,
    /// Parity even.
    PE,
    /// Sign positive.
    P,
    /// Sign negative.
    M,
}

impl Condition {
    /// Decode the 3-bit condition field.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code & 7 {
            0 => Condition::NZ,
            1 => Condition::Z,
            2 => Condition::NC,
            3 => Condition::C,
            4 => Condition::PO,
            5 => Condition::PE,
            6 => Condition::P,
            _ => Condition::M,
        }
    }

    /// Evaluate against a flag byte.
    #[must_use]
    pub const fn holds(self, flags: u8) -> bool {
        match self {
            Condition::NZ => flags & ZF == 0,
            Condition::Z => flags & ZF != 0,
            Condition::NC => flags & CF == 0,
            Condition::C => flags & CF != 0,
            Condition::PO => flags & PF == 0,
            Condition::PE => flags & PF != 0,
            Condition::P => flags & SF == 0,
            Condition::M => flags & SF != 0,
        }
    }
}
