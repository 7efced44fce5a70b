//! Bus-side abstractions
//!
//! This module defines what sits on the other end of the wires
//! ([`Peripheral`]) and the byte-level driver that repeats the engine's
//! single-byte handshake on behalf of a caller.

mod driver;
mod traits;

pub use driver::{SpiDriver, FILL_BYTE};
pub use traits::*;
