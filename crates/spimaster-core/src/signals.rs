//! Synchronous signal contract
//!
//! Everything the engine samples and drives on one driving-clock tick.

use bitflags::bitflags;

use crate::config::{SlaveConfig, SlaveIndex};
use crate::error::Result;

bitflags! {
    /// Chip select vector, one line per slave
    ///
    /// A set bit means the line is high. Whether high selects or deselects
    /// a slave depends on that slave's configured polarity.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChipSelects: u8 {
        /// Slave 0 line
        const CS0 = 1 << 0;
        /// Slave 1 line
        const CS1 = 1 << 1;
        /// Slave 2 line
        const CS2 = 1 << 2;
        /// Slave 3 line
        const CS3 = 1 << 3;
        /// Slave 4 line
        const CS4 = 1 << 4;
        /// Slave 5 line
        const CS5 = 1 << 5;
        /// Slave 6 line
        const CS6 = 1 << 6;
        /// Slave 7 line
        const CS7 = 1 << 7;
    }
}

impl Default for ChipSelects {
    fn default() -> Self {
        ChipSelects::empty()
    }
}

impl ChipSelects {
    /// The single line belonging to `slave`
    pub const fn line_of(slave: SlaveIndex) -> Self {
        Self::from_bits_truncate(1 << slave.get())
    }

    /// Level of the line belonging to `slave`
    pub fn level(&self, slave: SlaveIndex) -> bool {
        self.contains(Self::line_of(slave))
    }
}

/// Configuration write presented on the config port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigWrite {
    /// Target slave
    pub slave: SlaveIndex,
    /// New configuration
    pub config: SlaveConfig,
}

impl ConfigWrite {
    /// Decode a raw port value: slave index plus packed 4-bit configuration
    pub fn from_raw(slave: u8, bits: u8) -> Result<Self> {
        Ok(Self {
            slave: SlaveIndex::new(slave)?,
            config: SlaveConfig::from_bits(bits)?,
        })
    }
}

/// Transfer request presented on the request port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    /// Target slave
    pub slave: SlaveIndex,
    /// Byte to shift out
    pub byte: u8,
}

impl TransferRequest {
    /// Decode a raw port value
    pub fn from_raw(slave: u8, byte: u8) -> Result<Self> {
        Ok(Self {
            slave: SlaveIndex::new(slave)?,
            byte,
        })
    }
}

/// Inputs sampled on one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInputs {
    /// Synchronous reset
    pub reset: bool,
    /// Configuration write pulse
    pub config_write: Option<ConfigWrite>,
    /// Transfer request pulse
    pub transfer_request: Option<TransferRequest>,
    /// MISO line level
    pub miso: bool,
}

impl TickInputs {
    /// No pulses, MISO at `miso`
    pub fn idle(miso: bool) -> Self {
        Self {
            miso,
            ..Default::default()
        }
    }

    /// Assert reset
    pub fn with_reset(mut self) -> Self {
        self.reset = true;
        self
    }

    /// Assert a configuration write
    pub fn with_config_write(mut self, slave: SlaveIndex, config: SlaveConfig) -> Self {
        self.config_write = Some(ConfigWrite { slave, config });
        self
    }

    /// Assert a transfer request
    pub fn with_request(mut self, slave: SlaveIndex, byte: u8) -> Self {
        self.transfer_request = Some(TransferRequest { slave, byte });
        self
    }

    /// Set the MISO level
    pub fn with_miso(mut self, miso: bool) -> Self {
        self.miso = miso;
        self
    }
}

/// Outputs driven after one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusOutputs {
    /// Engine is idle and accepts config writes and transfer requests
    pub ready: bool,
    /// One-tick pulse marking `rx_byte` as freshly received
    pub rx_data_valid: bool,
    /// Last received byte
    pub rx_byte: u8,
    /// Bus clock line
    pub sclk: bool,
    /// Chip select lines
    pub chip_selects: ChipSelects,
    /// MOSI line
    pub mosi: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_chip_select_lines() {
        let s2 = SlaveIndex::new(2).unwrap();
        assert_eq!(ChipSelects::line_of(s2), ChipSelects::CS2);
        let cs = ChipSelects::CS2 | ChipSelects::CS7;
        assert!(cs.level(s2));
        assert!(!cs.level(SlaveIndex::new(3).unwrap()));
    }

    #[test]
    fn test_raw_port_decoding() {
        let w = ConfigWrite::from_raw(4, 0b1011).unwrap();
        assert_eq!(w.slave.get(), 4);
        assert!(w.config.clock_polarity);
        assert!(!w.config.clock_phase);

        assert_eq!(
            ConfigWrite::from_raw(9, 0),
            Err(Error::SlaveIndexOutOfRange(9))
        );
        assert_eq!(
            ConfigWrite::from_raw(0, 0x1F),
            Err(Error::ConfigBitsOutOfRange(0x1F))
        );
        assert_eq!(TransferRequest::from_raw(6, 0xA5).unwrap().byte, 0xA5);
    }
}
