//! spimaster-sim - Simulated SPI slaves and bus tracing
//!
//! Models that plug into [`spimaster_core::bus::SpiDriver`] in place of real
//! hardware: a mode-aware shift-register slave, a shared bus carrying up to
//! eight of them, and a recorder that keeps every tick for inspection.

pub mod bus;
pub mod error;
pub mod slave;
pub mod sweep;
pub mod trace;

pub use bus::SlaveBus;
pub use error::{Result, SimError};
pub use slave::ShiftRegisterSlave;
pub use spimaster_core::bus::Loopback;
pub use sweep::{sweep, SweepDevice, SweepReport};
pub use trace::{Signal, TraceRecorder, TraceSample};
