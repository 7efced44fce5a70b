//! Construction-time engine parameters

use crate::clock::EDGES_PER_BYTE;
use crate::error::{Error, Result};

/// Default driving-clock ticks per SPI bit
pub const DEFAULT_CLOCKS_PER_BIT: u32 = 4;

/// Default inactive gap between a request and the first bus clock edge
pub const DEFAULT_INACTIVE_GAP_TICKS: u32 = 2;

/// Timing parameters fixed for the lifetime of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineParams {
    clocks_per_bit: u32,
    inactive_gap_ticks: u32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            clocks_per_bit: DEFAULT_CLOCKS_PER_BIT,
            inactive_gap_ticks: DEFAULT_INACTIVE_GAP_TICKS,
        }
    }
}

impl EngineParams {
    /// Validate and create engine parameters
    ///
    /// `clocks_per_bit` must be even and non-zero: the bus clock toggles
    /// every `clocks_per_bit / 2` driving-clock ticks.
    pub const fn new(clocks_per_bit: u32, inactive_gap_ticks: u32) -> Result<Self> {
        if clocks_per_bit == 0 {
            return Err(Error::ClocksPerBitZero);
        }
        if clocks_per_bit % 2 != 0 {
            return Err(Error::ClocksPerBitOdd(clocks_per_bit));
        }
        Ok(Self {
            clocks_per_bit,
            inactive_gap_ticks,
        })
    }

    /// Driving-clock ticks per SPI bit
    pub const fn clocks_per_bit(&self) -> u32 {
        self.clocks_per_bit
    }

    /// Driving-clock ticks per bus clock half period
    pub const fn half_bit_ticks(&self) -> u32 {
        self.clocks_per_bit / 2
    }

    /// Ticks spent in the gap state before the bus clock starts
    pub const fn inactive_gap_ticks(&self) -> u32 {
        self.inactive_gap_ticks
    }

    /// Ticks from an accepted request to the `rx_data_valid` pulse, inclusive
    ///
    /// One latch tick, the gap, the edge train, and one tick for the
    /// generator to report it has stopped.
    pub const fn transaction_ticks(&self) -> u64 {
        let edges = (EDGES_PER_BYTE as u64) * (self.half_bit_ticks() as u64);
        1 + self.inactive_gap_ticks as u64 + edges + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_and_odd() {
        assert_eq!(EngineParams::new(0, 1), Err(Error::ClocksPerBitZero));
        assert_eq!(EngineParams::new(3, 1), Err(Error::ClocksPerBitOdd(3)));
        assert_eq!(EngineParams::new(1, 1), Err(Error::ClocksPerBitOdd(1)));
    }

    #[test]
    fn test_accepts_even() {
        let p = EngineParams::new(2, 0).unwrap();
        assert_eq!(p.half_bit_ticks(), 1);
        assert_eq!(p.inactive_gap_ticks(), 0);

        let p = EngineParams::new(10, 5).unwrap();
        assert_eq!(p.clocks_per_bit(), 10);
        assert_eq!(p.half_bit_ticks(), 5);
    }

    #[test]
    fn test_transaction_ticks() {
        // 1 latch + 2 gap + 16 edges * 2 ticks + 1 stop
        let p = EngineParams::new(4, 2).unwrap();
        assert_eq!(p.transaction_ticks(), 36);
    }
}
