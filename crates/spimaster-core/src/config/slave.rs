//! Per-slave configuration record

use bitflags::bitflags;

use crate::clock::Edge;
use crate::error::{Error, Result};

/// Number of slave select lines driven by the engine
pub const NUM_SLAVES: usize = 8;

/// Index of a slave on the bus (0..=7)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlaveIndex(u8);

impl SlaveIndex {
    /// Create a slave index, rejecting values above 7
    pub const fn new(index: u8) -> Result<Self> {
        if (index as usize) < NUM_SLAVES {
            Ok(Self(index))
        } else {
            Err(Error::SlaveIndexOutOfRange(index))
        }
    }

    /// The raw index
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The index as a `usize`, for array access
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all slave indices in ascending order
    pub fn all() -> impl Iterator<Item = SlaveIndex> {
        (0..NUM_SLAVES as u8).map(SlaveIndex)
    }
}

impl TryFrom<u8> for SlaveIndex {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self> {
        Self::new(index)
    }
}

impl core::fmt::Display for SlaveIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order in which the bits of a byte are put on the wire
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BitOrder {
    /// Bit 7 first
    #[default]
    MsbFirst,
    /// Bit 0 first
    LsbFirst,
}

impl BitOrder {
    /// Bit position transferred first
    pub const fn first_bit(self) -> u8 {
        match self {
            Self::MsbFirst => 7,
            Self::LsbFirst => 0,
        }
    }

    /// Bit position following `bit`, or `None` once the byte is exhausted
    pub const fn next_bit(self, bit: u8) -> Option<u8> {
        match self {
            Self::MsbFirst => bit.checked_sub(1),
            Self::LsbFirst => {
                if bit >= 7 {
                    None
                } else {
                    Some(bit + 1)
                }
            }
        }
    }
}

/// Level at which a chip select line selects its slave
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CsPolarity {
    /// Slave is selected while its line is low
    #[default]
    ActiveLow,
    /// Slave is selected while its line is high
    ActiveHigh,
}

impl CsPolarity {
    /// Line level while the slave is selected
    pub const fn active_level(self) -> bool {
        matches!(self, Self::ActiveHigh)
    }

    /// Line level while the slave is not selected
    pub const fn inactive_level(self) -> bool {
        !self.active_level()
    }
}

/// SPI mode (combined polarity and phase)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpiMode {
    /// Mode 0: CPOL=0, CPHA=0
    #[default]
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl SpiMode {
    /// All four modes in numeric order
    pub const ALL: [SpiMode; 4] = [Self::Mode0, Self::Mode1, Self::Mode2, Self::Mode3];

    /// Build a mode from its conventional number (0-3)
    pub const fn from_number(n: u8) -> Result<Self> {
        match n {
            0 => Ok(Self::Mode0),
            1 => Ok(Self::Mode1),
            2 => Ok(Self::Mode2),
            3 => Ok(Self::Mode3),
            _ => Err(Error::ModeOutOfRange(n)),
        }
    }

    /// Build a mode from clock polarity and phase
    pub const fn from_cpol_cpha(cpol: bool, cpha: bool) -> Self {
        match (cpol, cpha) {
            (false, false) => Self::Mode0,
            (false, true) => Self::Mode1,
            (true, false) => Self::Mode2,
            (true, true) => Self::Mode3,
        }
    }

    /// Conventional mode number
    pub const fn number(self) -> u8 {
        match self {
            Self::Mode0 => 0,
            Self::Mode1 => 1,
            Self::Mode2 => 2,
            Self::Mode3 => 3,
        }
    }

    /// Idle level of the bus clock (CPOL)
    pub const fn clock_polarity(self) -> bool {
        matches!(self, Self::Mode2 | Self::Mode3)
    }

    /// Clock phase (CPHA)
    pub const fn clock_phase(self) -> bool {
        matches!(self, Self::Mode1 | Self::Mode3)
    }
}

bitflags! {
    /// Packed 4-bit configuration as it appears on the config write port
    ///
    /// Layout from bit 3 down to bit 0: `[cpol, cpha, bit_order, cs_polarity]`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConfigBits: u8 {
        /// Chip select is active high
        const CS_ACTIVE_HIGH = 1 << 0;
        /// Least significant bit first
        const LSB_FIRST      = 1 << 1;
        /// Clock phase (CPHA)
        const CPHA           = 1 << 2;
        /// Clock polarity (CPOL)
        const CPOL           = 1 << 3;
    }
}

/// Role a bus clock edge plays for a given clock phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeRole {
    /// Drive the next output bit onto MOSI
    Shift,
    /// Capture MISO into the receive byte
    Sample,
}

/// Configuration of one slave
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SlaveConfig {
    /// Idle level of the bus clock
    pub clock_polarity: bool,
    /// Whether the first edge after idle shifts (true) or samples (false)
    pub clock_phase: bool,
    /// Bit order on the wire
    pub bit_order: BitOrder,
    /// Chip select polarity
    pub cs_polarity: CsPolarity,
}

impl SlaveConfig {
    /// Power-on configuration: mode 0, MSB first, active-low chip select
    pub const POWER_ON: Self = Self {
        clock_polarity: false,
        clock_phase: false,
        bit_order: BitOrder::MsbFirst,
        cs_polarity: CsPolarity::ActiveLow,
    };

    /// Create a configuration from a mode, bit order and chip select polarity
    pub const fn new(mode: SpiMode, bit_order: BitOrder, cs_polarity: CsPolarity) -> Self {
        Self {
            clock_polarity: mode.clock_polarity(),
            clock_phase: mode.clock_phase(),
            bit_order,
            cs_polarity,
        }
    }

    /// SPI mode formed by polarity and phase
    pub const fn mode(&self) -> SpiMode {
        SpiMode::from_cpol_cpha(self.clock_polarity, self.clock_phase)
    }

    /// Decode a packed 4-bit configuration
    pub fn from_bits(bits: u8) -> Result<Self> {
        let flags = ConfigBits::from_bits(bits).ok_or(Error::ConfigBitsOutOfRange(bits))?;
        Ok(Self::from(flags))
    }

    /// Encode as a packed 4-bit configuration
    pub fn to_bits(&self) -> u8 {
        ConfigBits::from(*self).bits()
    }

    /// Whether `edge` shifts out or samples in under this configuration
    ///
    /// CPHA=0 samples on the leading edge and shifts on the trailing edge,
    /// CPHA=1 the other way round.
    pub const fn edge_role(&self, edge: Edge) -> EdgeRole {
        match (edge, self.clock_phase) {
            (Edge::Leading, false) | (Edge::Trailing, true) => EdgeRole::Sample,
            (Edge::Leading, true) | (Edge::Trailing, false) => EdgeRole::Shift,
        }
    }
}

impl From<ConfigBits> for SlaveConfig {
    fn from(flags: ConfigBits) -> Self {
        Self {
            clock_polarity: flags.contains(ConfigBits::CPOL),
            clock_phase: flags.contains(ConfigBits::CPHA),
            bit_order: if flags.contains(ConfigBits::LSB_FIRST) {
                BitOrder::LsbFirst
            } else {
                BitOrder::MsbFirst
            },
            cs_polarity: if flags.contains(ConfigBits::CS_ACTIVE_HIGH) {
                CsPolarity::ActiveHigh
            } else {
                CsPolarity::ActiveLow
            },
        }
    }
}

impl From<SlaveConfig> for ConfigBits {
    fn from(config: SlaveConfig) -> Self {
        let mut flags = ConfigBits::empty();
        flags.set(ConfigBits::CPOL, config.clock_polarity);
        flags.set(ConfigBits::CPHA, config.clock_phase);
        flags.set(ConfigBits::LSB_FIRST, config.bit_order == BitOrder::LsbFirst);
        flags.set(
            ConfigBits::CS_ACTIVE_HIGH,
            config.cs_polarity == CsPolarity::ActiveHigh,
        );
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_on_is_all_zero() {
        assert_eq!(SlaveConfig::POWER_ON, SlaveConfig::default());
        assert_eq!(SlaveConfig::POWER_ON.to_bits(), 0);
        assert_eq!(SlaveConfig::POWER_ON.mode(), SpiMode::Mode0);
    }

    #[test]
    fn test_bit_layout() {
        let cfg = SlaveConfig::from_bits(0b1000).unwrap();
        assert!(cfg.clock_polarity);
        assert!(!cfg.clock_phase);

        let cfg = SlaveConfig::from_bits(0b0100).unwrap();
        assert!(cfg.clock_phase);

        let cfg = SlaveConfig::from_bits(0b0010).unwrap();
        assert_eq!(cfg.bit_order, BitOrder::LsbFirst);

        let cfg = SlaveConfig::from_bits(0b0001).unwrap();
        assert_eq!(cfg.cs_polarity, CsPolarity::ActiveHigh);
    }

    #[test]
    fn test_all_encodings_decode() {
        for bits in 0..16u8 {
            let cfg = SlaveConfig::from_bits(bits).unwrap();
            assert_eq!(cfg.to_bits(), bits);
        }
        assert_eq!(
            SlaveConfig::from_bits(0x10),
            Err(Error::ConfigBitsOutOfRange(0x10))
        );
    }

    #[test]
    fn test_mode_numbers() {
        for mode in SpiMode::ALL {
            assert_eq!(SpiMode::from_number(mode.number()).unwrap(), mode);
            let cfg = SlaveConfig::new(mode, BitOrder::MsbFirst, CsPolarity::ActiveLow);
            assert_eq!(cfg.mode(), mode);
        }
        assert_eq!(SpiMode::from_number(4), Err(Error::ModeOutOfRange(4)));
        assert!(SpiMode::Mode2.clock_polarity());
        assert!(!SpiMode::Mode2.clock_phase());
        assert!(SpiMode::Mode1.clock_phase());
    }

    #[test]
    fn test_edge_roles() {
        let cpha0 = SlaveConfig::new(SpiMode::Mode0, BitOrder::MsbFirst, CsPolarity::ActiveLow);
        assert_eq!(cpha0.edge_role(Edge::Leading), EdgeRole::Sample);
        assert_eq!(cpha0.edge_role(Edge::Trailing), EdgeRole::Shift);

        let cpha1 = SlaveConfig::new(SpiMode::Mode3, BitOrder::MsbFirst, CsPolarity::ActiveLow);
        assert_eq!(cpha1.edge_role(Edge::Leading), EdgeRole::Shift);
        assert_eq!(cpha1.edge_role(Edge::Trailing), EdgeRole::Sample);
    }

    #[test]
    fn test_bit_order_walk() {
        let mut bits = [0u8; 8];
        let mut cur = Some(BitOrder::MsbFirst.first_bit());
        for slot in bits.iter_mut() {
            *slot = cur.unwrap();
            cur = BitOrder::MsbFirst.next_bit(*slot);
        }
        assert_eq!(bits, [7, 6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(cur, None);

        assert_eq!(BitOrder::LsbFirst.first_bit(), 0);
        assert_eq!(BitOrder::LsbFirst.next_bit(6), Some(7));
        assert_eq!(BitOrder::LsbFirst.next_bit(7), None);
    }

    #[test]
    fn test_slave_index_range() {
        assert_eq!(SlaveIndex::new(7).unwrap().get(), 7);
        assert_eq!(SlaveIndex::new(8), Err(Error::SlaveIndexOutOfRange(8)));
        assert_eq!(SlaveIndex::all().count(), NUM_SLAVES);
    }
}
