//! Read-only state inspection.
//!
//! Debuggers and test harnesses query a component by dotted path. Queries
//! never affect emulation state.

use std::fmt;

/// A dynamically-typed value returned by a state query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    /// Physical addresses and other values wider than a register.
    U32(u32),
    /// Symbolic state such as `"halted"`.
    Str(&'static str),
}

impl Value {
    /// Numeric view of the value, if it has one.
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Value::Bool(v) => Some(u32::from(v)),
            Value::U8(v) => Some(u32::from(v)),
            Value::U16(v) => Some(u32::from(v)),
            Value::U32(v) => Some(v),
            Value::Str(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v:#04X}"),
            Value::U16(v) => write!(f, "{v:#06X}"),
            Value::U32(v) => write!(f, "{v:#07X}"),
            Value::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<&'static str> for Value {
    fn from(v: &'static str) -> Self {
        Value::Str(v)
    }
}

/// A component whose state can be inspected.
pub trait Observable {
    /// Query a property by path, e.g. `pc`, `hl`, `flags.z`, `mmu.cbar`.
    ///
    /// Returns `None` if the path is not recognised.
    fn query(&self, path: &str) -> Option<Value>;

    /// All paths `query()` understands.
    fn query_paths(&self) -> &'static [&'static str];
}
