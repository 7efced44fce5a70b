//! In-flight transaction bookkeeping

use crate::config::{SlaveConfig, SlaveIndex};

/// State of the single transaction in flight
///
/// The slave index and byte are latched together when a request is
/// accepted. The slave's configuration is captured when the bus clock
/// starts and is not re-read per bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionContext {
    selected_slave: SlaveIndex,
    tx_byte: u8,
    config: SlaveConfig,
    tx_bit: Option<u8>,
    rx_bit: Option<u8>,
    rx_shift: u8,
}

impl TransactionContext {
    /// Latch a new request, discarding anything left from the previous one
    pub(crate) fn latch(slave: SlaveIndex, byte: u8) -> Self {
        Self {
            selected_slave: slave,
            tx_byte: byte,
            ..Default::default()
        }
    }

    /// Capture the slave configuration and set up the bit cursors
    ///
    /// Returns the level of the first output bit, which goes on MOSI before
    /// any edge fires. With CPHA=0 the slave samples that bit on the first
    /// leading edge, so the tx cursor moves past it. With CPHA=1 the first
    /// leading edge is a shift edge and drives the same bit again.
    pub(crate) fn begin(&mut self, config: SlaveConfig) -> bool {
        let order = config.bit_order;
        let first = order.first_bit();

        self.config = config;
        self.tx_bit = if config.clock_phase {
            Some(first)
        } else {
            order.next_bit(first)
        };
        self.rx_bit = Some(first);
        self.rx_shift = 0;

        bit_of(self.tx_byte, first)
    }

    /// Next output bit level, or `None` once all eight bits have gone out
    pub(crate) fn shift_out(&mut self) -> Option<bool> {
        let bit = self.tx_bit?;
        self.tx_bit = self.config.bit_order.next_bit(bit);
        Some(bit_of(self.tx_byte, bit))
    }

    /// Capture one input bit; extra samples past the eighth are ignored
    pub(crate) fn sample_in(&mut self, level: bool) {
        if let Some(bit) = self.rx_bit {
            if level {
                self.rx_shift |= 1 << bit;
            } else {
                self.rx_shift &= !(1 << bit);
            }
            self.rx_bit = self.config.bit_order.next_bit(bit);
        }
    }

    /// Drop cursors once the byte is published; the slave stays latched
    pub(crate) fn finish(&mut self) {
        self.tx_bit = None;
        self.rx_bit = None;
    }

    /// Slave latched by the most recent request
    pub fn selected_slave(&self) -> SlaveIndex {
        self.selected_slave
    }

    /// Byte latched by the most recent request
    pub fn tx_byte(&self) -> u8 {
        self.tx_byte
    }

    /// Configuration captured when the bus clock started
    pub fn config(&self) -> &SlaveConfig {
        &self.config
    }

    /// Bit position the next shift edge drives
    pub fn tx_bit_index(&self) -> Option<u8> {
        self.tx_bit
    }

    /// Bit position the next sample edge captures
    pub fn rx_bit_index(&self) -> Option<u8> {
        self.rx_bit
    }

    /// Received bits accumulated so far
    pub fn rx_partial(&self) -> u8 {
        self.rx_shift
    }
}

fn bit_of(byte: u8, bit: u8) -> bool {
    (byte >> bit) & 1 != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BitOrder, CsPolarity, SpiMode};

    fn ctx(byte: u8, mode: SpiMode, order: BitOrder) -> (TransactionContext, bool) {
        let mut ctx = TransactionContext::latch(SlaveIndex::new(0).unwrap(), byte);
        let first = ctx.begin(SlaveConfig::new(mode, order, CsPolarity::ActiveLow));
        (ctx, first)
    }

    #[test]
    fn test_cpha0_initial_indices() {
        let (c, first) = ctx(0x80, SpiMode::Mode0, BitOrder::MsbFirst);
        assert!(first);
        assert_eq!(c.tx_bit_index(), Some(6));
        assert_eq!(c.rx_bit_index(), Some(7));

        let (c, first) = ctx(0x01, SpiMode::Mode2, BitOrder::LsbFirst);
        assert!(first);
        assert_eq!(c.tx_bit_index(), Some(1));
        assert_eq!(c.rx_bit_index(), Some(0));
    }

    #[test]
    fn test_cpha1_redrives_first_bit() {
        let (mut c, first) = ctx(0x80, SpiMode::Mode1, BitOrder::MsbFirst);
        assert!(first);
        assert_eq!(c.tx_bit_index(), Some(7));
        assert_eq!(c.shift_out(), Some(true));
        assert_eq!(c.tx_bit_index(), Some(6));
    }

    #[test]
    fn test_shift_out_sequence_and_exhaustion() {
        let (mut c, first) = ctx(0b1011_0010, SpiMode::Mode0, BitOrder::MsbFirst);
        let mut seen = [first; 8];
        for slot in seen.iter_mut().skip(1) {
            *slot = c.shift_out().unwrap();
        }
        assert_eq!(seen, [true, false, true, true, false, false, true, false]);
        assert_eq!(c.shift_out(), None);
    }

    #[test]
    fn test_sample_in_lsb_first() {
        let (mut c, _) = ctx(0, SpiMode::Mode0, BitOrder::LsbFirst);
        for level in [true, true, false, false, true, false, true, false] {
            c.sample_in(level);
        }
        assert_eq!(c.rx_partial(), 0b0101_0011);
        assert_eq!(c.rx_bit_index(), None);
        c.sample_in(true);
        assert_eq!(c.rx_partial(), 0b0101_0011);
    }

    #[test]
    fn test_latch_discards_previous() {
        let (mut c, _) = ctx(0xFF, SpiMode::Mode0, BitOrder::MsbFirst);
        c.sample_in(true);
        let s5 = SlaveIndex::new(5).unwrap();
        let c = TransactionContext::latch(s5, 0x42);
        assert_eq!(c.selected_slave(), s5);
        assert_eq!(c.tx_byte(), 0x42);
        assert_eq!(c.rx_partial(), 0);
        assert_eq!(c.tx_bit_index(), None);
    }
}
