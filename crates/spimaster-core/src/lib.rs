//! spimaster-core - Cycle-accurate multi-slave SPI master engine
//!
//! This crate models an SPI master as a synchronous state machine advanced
//! one driving-clock tick at a time. It serves up to eight slaves, each with
//! its own clock mode, bit order and chip-select polarity, and exchanges one
//! byte per request. It is `no_std` and allocation-free unless the `alloc`
//! or `std` features are enabled.
//!
//! # Features
//!
//! - `std` - Enable standard library support and TOML bank files (includes `alloc`)
//! - `alloc` - Allow boxed peripherals
//!
//! # Example
//!
//! ```
//! use spimaster_core::bus::{Loopback, SpiDriver};
//! use spimaster_core::config::{EngineParams, SlaveIndex};
//! use spimaster_core::engine::Engine;
//!
//! let engine = Engine::new(EngineParams::new(4, 2)?);
//! let mut driver = SpiDriver::new(engine, Loopback::new());
//! let slave = SlaveIndex::new(3)?;
//! assert_eq!(driver.transfer_byte(slave, 0xA5)?, 0xA5);
//! # Ok::<(), spimaster_core::Error>(())
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod bus;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod mux;
pub mod signals;

pub use error::{Error, Result};

#[cfg(test)]
mod proptests;
