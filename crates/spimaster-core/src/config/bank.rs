//! Configuration register bank
//!
//! Holds one [`SlaveConfig`] per slave index. The bank is persistent state:
//! a global reset of the engine never touches it. Writes from the bus side
//! are gated on the engine being ready, which the engine enforces; the bank
//! itself is plain storage so it can be assembled before an engine exists.

use super::slave::{SlaveConfig, SlaveIndex, NUM_SLAVES};

/// Per-slave configuration storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigBank {
    slaves: [SlaveConfig; NUM_SLAVES],
}

impl Default for ConfigBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBank {
    /// Create a bank with every slave at its power-on configuration
    pub const fn new() -> Self {
        Self {
            slaves: [SlaveConfig::POWER_ON; NUM_SLAVES],
        }
    }

    /// Configuration of `slave`
    pub fn get(&self, slave: SlaveIndex) -> SlaveConfig {
        self.slaves[slave.as_usize()]
    }

    /// Replace the configuration of `slave`
    pub fn set(&mut self, slave: SlaveIndex, config: SlaveConfig) {
        self.slaves[slave.as_usize()] = config;
    }

    /// Builder-style variant of [`ConfigBank::set`]
    pub fn with(mut self, slave: SlaveIndex, config: SlaveConfig) -> Self {
        self.set(slave, config);
        self
    }

    /// Iterate over `(index, config)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (SlaveIndex, SlaveConfig)> + '_ {
        SlaveIndex::all().zip(self.slaves.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BitOrder, CsPolarity, SpiMode};

    #[test]
    fn test_power_on_defaults() {
        let bank = ConfigBank::new();
        for (_, cfg) in bank.iter() {
            assert_eq!(cfg, SlaveConfig::POWER_ON);
        }
    }

    #[test]
    fn test_set_is_per_slave() {
        let s3 = SlaveIndex::new(3).unwrap();
        let cfg = SlaveConfig::new(SpiMode::Mode3, BitOrder::LsbFirst, CsPolarity::ActiveHigh);
        let bank = ConfigBank::new().with(s3, cfg);

        for (idx, got) in bank.iter() {
            if idx == s3 {
                assert_eq!(got, cfg);
            } else {
                assert_eq!(got, SlaveConfig::POWER_ON);
            }
        }
    }
}
