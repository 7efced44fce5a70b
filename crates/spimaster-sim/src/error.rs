//! Error types for the simulation models

use spimaster_core::config::{BitOrder, SlaveIndex};
use thiserror::Error;

/// Simulation errors
#[derive(Debug, Error)]
pub enum SimError {
    /// Error from the engine or its driver
    #[error(transparent)]
    Core(#[from] spimaster_core::Error),

    /// A device is already attached at this slave index
    #[error("Slave {0} already has a device attached")]
    SlaveIndexTaken(SlaveIndex),

    /// A looped-back byte came back different
    #[error("Loopback mismatch in mode {mode} ({order:?}): sent 0x{sent:02X}, received 0x{received:02X}")]
    LoopbackMismatch {
        mode: u8,
        order: BitOrder,
        sent: u8,
        received: u8,
    },
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;
