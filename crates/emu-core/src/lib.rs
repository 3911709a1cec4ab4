//! Core traits and types shared by the CPU cores.
//!
//! A core never owns its memory. Hosts hand it a bus on every operation, and
//! every core exposes its state for inspection through [`Observable`].

mod bus;
mod observable;

pub use bus::{Bus, IoBus, SimpleBus};
pub use observable::{Observable, Value};
