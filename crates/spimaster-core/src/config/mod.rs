//! Engine configuration
//!
//! This module provides the per-slave configuration record, the register
//! bank that holds one record per slave, and the construction-time timing
//! parameters.

mod bank;
mod params;
mod slave;
#[cfg(feature = "std")]
mod toml;

pub use bank::ConfigBank;
pub use params::{EngineParams, DEFAULT_CLOCKS_PER_BIT, DEFAULT_INACTIVE_GAP_TICKS};
pub use slave::{
    BitOrder, ConfigBits, CsPolarity, EdgeRole, SlaveConfig, SlaveIndex, SpiMode, NUM_SLAVES,
};
#[cfg(feature = "std")]
pub use self::toml::BankFile;
