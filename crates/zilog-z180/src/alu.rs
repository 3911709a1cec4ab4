//! ALU operations for the Z180.
//!
//! Pure functions of their inputs. Anything that depends on the incoming
//! flags takes them explicitly; the CPU decides where the result goes.

#![allow(clippy::cast_possible_truncation)] // Intentional truncation for low byte extraction.

use crate::flags::{CF, HF, NF, PF, SF, XF, YF, ZF, tables};

/// Result of an ALU operation with flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult {
    pub value: u8,
    pub flags: u8,
}

const fn wide_index(carry: bool, old: u8, result: u8) -> usize {
    (carry as usize) << 16 | (old as usize) << 8 | result as usize
}

/// Add with optional carry in.
#[must_use]
pub fn add8(a: u8, value: u8, carry: bool) -> AluResult {
    let result = a.wrapping_add(value).wrapping_add(u8::from(carry));
    AluResult {
        value: result,
        flags: tables().szhvc_add[wide_index(carry, a, result)],
    }
}

/// Subtract with optional borrow in.
#[must_use]
pub fn sub8(a: u8, value: u8, carry: bool) -> AluResult {
    let result = a.wrapping_sub(value).wrapping_sub(u8::from(carry));
    AluResult {
        value: result,
        flags: tables().szhvc_sub[wide_index(carry, a, result)],
    }
}

/// Compare: flags of `a - value`, X/Y from the difference.
#[must_use]
pub fn cp8(a: u8, value: u8) -> u8 {
    sub8(a, value, false).flags
}

#[must_use]
pub fn and8(a: u8, value: u8) -> AluResult {
    let result = a & value;
    AluResult {
        value: result,
        flags: tables().szp[result as usize] | HF,
    }
}

#[must_use]
pub fn or8(a: u8, value: u8) -> AluResult {
    let result = a | value;
    AluResult {
        value: result,
        flags: tables().szp[result as usize],
    }
}

#[must_use]
pub fn xor8(a: u8, value: u8) -> AluResult {
    let result = a ^ value;
    AluResult {
        value: result,
        flags: tables().szp[result as usize],
    }
}

/// TST: flags of `a & value`, nothing stored.
#[must_use]
pub fn tst8(a: u8, value: u8) -> u8 {
    and8(a, value).flags
}

#[must_use]
pub fn neg8(a: u8) -> AluResult {
    sub8(0, a, false)
}

/// Decimal adjust after BCD add or subtract.
///
/// Carry out reports whether A was above 0x99 before the adjustment, in
/// both directions. N and the incoming carry are kept.
#[must_use]
pub fn daa(a: u8, flags: u8) -> AluResult {
    let low_adjust = flags & HF != 0 || a & 0x0F > 9;
    let high_adjust = flags & CF != 0 || a > 0x99;
    let mut r = a;
    if flags & NF != 0 {
        if low_adjust {
            r = r.wrapping_sub(0x06);
        }
        if high_adjust {
            r = r.wrapping_sub(0x60);
        }
    } else {
        if low_adjust {
            r = r.wrapping_add(0x06);
        }
        if high_adjust {
            r = r.wrapping_add(0x60);
        }
    }
    let carry = if a > 0x99 { CF } else { 0 };
    AluResult {
        value: r,
        flags: (flags & (NF | CF)) | carry | ((a ^ r) & HF) | tables().szp[r as usize],
    }
}

/// INC r. Carry is kept from `flags`.
#[must_use]
pub fn inc8(value: u8, flags: u8) -> AluResult {
    let result = value.wrapping_add(1);
    AluResult {
        value: result,
        flags: (flags & CF) | tables().szhv_inc[result as usize],
    }
}

/// DEC r. Carry is kept from `flags`.
#[must_use]
pub fn dec8(value: u8, flags: u8) -> AluResult {
    let result = value.wrapping_sub(1);
    AluResult {
        value: result,
        flags: (flags & CF) | tables().szhv_dec[result as usize],
    }
}

// Accumulator rotates keep S, Z and P/V.
const KEEP_SZP: u8 = SF | ZF | PF;

#[must_use]
pub fn rlca(a: u8, flags: u8) -> AluResult {
    let result = a.rotate_left(1);
    AluResult {
        value: result,
        flags: (flags & KEEP_SZP) | (result & (YF | XF | CF)),
    }
}

/// RRCA. X/Y come from A before the rotate.
#[must_use]
pub fn rrca(a: u8, flags: u8) -> AluResult {
    AluResult {
        value: a.rotate_right(1),
        flags: (flags & KEEP_SZP) | (a & (YF | XF | CF)),
    }
}

#[must_use]
pub fn rla(a: u8, flags: u8) -> AluResult {
    let result = (a << 1) | (flags & CF);
    let carry = if a & 0x80 != 0 { CF } else { 0 };
    AluResult {
        value: result,
        flags: (flags & KEEP_SZP) | carry | (result & (YF | XF)),
    }
}

#[must_use]
pub fn rra(a: u8, flags: u8) -> AluResult {
    let result = (a >> 1) | (flags << 7);
    let carry = if a & 0x01 != 0 { CF } else { 0 };
    AluResult {
        value: result,
        flags: (flags & KEEP_SZP) | carry | (result & (YF | XF)),
    }
}

fn shifted(result: u8, carry_out: bool) -> AluResult {
    AluResult {
        value: result,
        flags: tables().szp[result as usize] | u8::from(carry_out),
    }
}

#[must_use]
pub fn rlc(value: u8) -> AluResult {
    shifted(value.rotate_left(1), value & 0x80 != 0)
}

#[must_use]
pub fn rrc(value: u8) -> AluResult {
    shifted(value.rotate_right(1), value & 0x01 != 0)
}

#[must_use]
pub fn rl(value: u8, flags: u8) -> AluResult {
    shifted((value << 1) | (flags & CF), value & 0x80 != 0)
}

#[must_use]
pub fn rr(value: u8, flags: u8) -> AluResult {
    shifted((value >> 1) | (flags << 7), value & 0x01 != 0)
}

#[must_use]
pub fn sla(value: u8) -> AluResult {
    shifted(value << 1, value & 0x80 != 0)
}

#[must_use]
pub fn sra(value: u8) -> AluResult {
    shifted((value >> 1) | (value & 0x80), value & 0x01 != 0)
}

/// Undocumented shift left that feeds a 1 into bit 0.
#[must_use]
pub fn sll(value: u8) -> AluResult {
    shifted((value << 1) | 0x01, value & 0x80 != 0)
}

#[must_use]
pub fn srl(value: u8) -> AluResult {
    shifted(value >> 1, value & 0x01 != 0)
}

/// BIT b,r. Returns the new flags.
#[must_use]
pub fn bit(bit: u8, value: u8, flags: u8) -> u8 {
    (flags & CF) | HF | tables().sz_bit[(value & (1 << (bit & 7))) as usize]
}

/// BIT b,(IX/IY+d). X/Y come from the high byte of the effective address.
#[must_use]
pub fn bit_indexed(bit: u8, value: u8, flags: u8, ea: u16) -> u8 {
    let tested = tables().sz_bit[(value & (1 << (bit & 7))) as usize];
    (flags & CF) | HF | (tested & !(YF | XF)) | ((ea >> 8) as u8 & (YF | XF))
}

/// RES b. No flags change, so the result is the bare byte.
#[must_use]
pub const fn res(bit: u8, value: u8) -> u8 {
    value & !(1 << (bit & 7))
}

/// SET b. No flags change.
#[must_use]
pub const fn set(bit: u8, value: u8) -> u8 {
    value | (1 << (bit & 7))
}
