//! Z180 flag register bits and the precomputed flag tables.
//!
//! Every flag-producing operation is a single table lookup. The tables are
//! built once per process on first use and never change afterwards.

use std::sync::OnceLock;

/// Sign flag (bit 7) - set if result is negative.
pub const SF: u8 = 0b1000_0000;

/// Zero flag (bit 6) - set if result is zero.
pub const ZF: u8 = 0b0100_0000;

/// Undocumented flag (bit 5) - copy of bit 5 of result.
pub const YF: u8 = 0b0010_0000;

/// Half-carry flag (bit 4) - carry from bit 3 to bit 4.
pub const HF: u8 = 0b0001_0000;

/// Undocumented flag (bit 3) - copy of bit 3 of result.
pub const XF: u8 = 0b0000_1000;

/// Parity/Overflow flag (bit 2) - parity or overflow depending on instruction.
pub const PF: u8 = 0b0000_0100;

/// Overflow view of the shared P/V bit.
pub const VF: u8 = PF;

/// Add/Subtract flag (bit 1) - set if last operation was subtraction.
pub const NF: u8 = 0b0000_0010;

/// Carry flag (bit 0) - carry out of bit 7.
pub const CF: u8 = 0b0000_0001;

/// Compute parity of a byte (true if even number of 1 bits).
#[must_use]
pub const fn parity(value: u8) -> bool {
    value.count_ones().is_multiple_of(2)
}

/// Precomputed flag results.
///
/// The wide add/sub tables are indexed `carry_in << 16 | old_a << 8 | result`
/// so one lookup covers ADD, ADC, SUB, SBC and CP.
pub struct FlagTables {
    /// S, Z, Y, X for a byte.
    pub sz: [u8; 256],
    /// As `sz`, but a zero value also sets P/V (BIT on a masked value).
    pub sz_bit: [u8; 256],
    /// S, Z, Y, X and even parity for a byte.
    pub szp: [u8; 256],
    /// Flags after INC, indexed by the result.
    pub szhv_inc: [u8; 256],
    /// Flags after DEC, indexed by the result.
    pub szhv_dec: [u8; 256],
    /// Flags after ADD/ADC, indexed `carry_in << 16 | old_a << 8 | result`.
    pub szhvc_add: Box<[u8]>,
    /// Flags after SUB/SBC/CP, indexed `carry_in << 16 | old_a << 8 | result`.
    pub szhvc_sub: Box<[u8]>,
}

const WIDE_LEN: usize = 2 * 256 * 256;

/// The process-wide flag tables.
#[must_use]
pub fn tables() -> &'static FlagTables {
    static TABLES: OnceLock<FlagTables> = OnceLock::new();
    TABLES.get_or_init(FlagTables::build)
}

impl FlagTables {
    fn build() -> Self {
        let mut t = Self {
            sz: [0; 256],
            sz_bit: [0; 256],
            szp: [0; 256],
            szhv_inc: [0; 256],
            szhv_dec: [0; 256],
            szhvc_add: vec![0; WIDE_LEN].into_boxed_slice(),
            szhvc_sub: vec![0; WIDE_LEN].into_boxed_slice(),
        };

        for i in 0..=255u8 {
            let idx = i as usize;
            let undoc = i & (YF | XF);

            t.sz[idx] = (if i == 0 { ZF } else { i & SF }) | undoc;
            t.sz_bit[idx] = (if i == 0 { ZF | PF } else { i & SF }) | undoc;
            t.szp[idx] = t.sz[idx] | if parity(i) { PF } else { 0 };

            t.szhv_inc[idx] = t.sz[idx];
            if i == 0x80 {
                t.szhv_inc[idx] |= VF;
            }
            if i & 0x0F == 0x00 {
                t.szhv_inc[idx] |= HF;
            }

            t.szhv_dec[idx] = t.sz[idx] | NF;
            if i == 0x7F {
                t.szhv_dec[idx] |= VF;
            }
            if i & 0x0F == 0x0F {
                t.szhv_dec[idx] |= HF;
            }
        }

        for carry in 0..=1u8 {
            for old in 0..=255u8 {
                for result in 0..=255u8 {
                    let idx = (usize::from(carry) << 16)
                        | (usize::from(old) << 8)
                        | usize::from(result);
                    // Recover the operand that produced `result` from `old`.
                    let add_operand = result.wrapping_sub(old).wrapping_sub(carry);
                    let sub_operand = old.wrapping_sub(result).wrapping_sub(carry);
                    t.szhvc_add[idx] = add_flags(old, add_operand, carry, result);
                    t.szhvc_sub[idx] = sub_flags(old, sub_operand, carry, result);
                }
            }
        }

        t
    }
}

fn sz_of(result: u8) -> u8 {
    (if result == 0 { ZF } else { result & SF }) | (result & (YF | XF))
}

fn add_flags(a: u8, b: u8, carry: u8, result: u8) -> u8 {
    let mut flags = sz_of(result);
    if (a & 0x0F) + (b & 0x0F) + carry > 0x0F {
        flags |= HF;
    }
    if u16::from(a) + u16::from(b) + u16::from(carry) > 0xFF {
        flags |= CF;
    }
    // Both operands same sign, result different sign
    if (a ^ b) & 0x80 == 0 && (a ^ result) & 0x80 != 0 {
        flags |= VF;
    }
    flags
}

fn sub_flags(a: u8, b: u8, carry: u8, result: u8) -> u8 {
    let mut flags = sz_of(result) | NF;
    if (a & 0x0F) < (b & 0x0F) + carry {
        flags |= HF;
    }
    if u16::from(a) < u16::from(b) + u16::from(carry) {
        flags |= CF;
    }
    // Operands differ in sign and result sign differs from minuend
    if (a ^ b) & 0x80 != 0 && (a ^ result) & 0x80 != 0 {
        flags |= VF;
    }
    flags
}
