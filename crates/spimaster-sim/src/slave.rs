//! Shift-register SPI slave
//!
//! A device model that only sees the wires. It decodes its own chip select,
//! finds bus clock edges by comparing consecutive SCLK levels, and samples
//! or shifts according to its own mode, independently of the engine's
//! bookkeeping. One byte is exchanged per chip-select assertion.

use std::collections::VecDeque;

use spimaster_core::bus::Peripheral;
use spimaster_core::clock::Edge;
use spimaster_core::config::{EdgeRole, SlaveConfig, SlaveIndex};
use spimaster_core::signals::BusOutputs;

/// SPI slave with an 8-bit shift register
#[derive(Debug, Clone)]
pub struct ShiftRegisterSlave {
    index: SlaveIndex,
    config: SlaveConfig,
    responses: VecDeque<u8>,
    received: Vec<u8>,
    last_received: u8,
    aborted: usize,

    selected: bool,
    sclk: bool,
    miso: bool,
    tx_byte: u8,
    tx_bit: Option<u8>,
    rx_bit: Option<u8>,
    rx_shift: u8,
}

impl ShiftRegisterSlave {
    /// Create a slave answering on `index` in the given configuration
    ///
    /// With no queued responses the slave answers with the last byte it
    /// received, starting from 0x00.
    pub fn new(index: SlaveIndex, config: SlaveConfig) -> Self {
        Self {
            index,
            config,
            responses: VecDeque::new(),
            received: Vec::new(),
            last_received: 0x00,
            aborted: 0,
            selected: false,
            sclk: config.clock_polarity,
            miso: true,
            tx_byte: 0,
            tx_bit: None,
            rx_bit: None,
            rx_shift: 0,
        }
    }

    /// Slave index this device answers on
    pub fn index(&self) -> SlaveIndex {
        self.index
    }

    /// Configuration the device runs in
    pub fn config(&self) -> &SlaveConfig {
        &self.config
    }

    /// Queue a byte to send on a later transaction
    pub fn queue_response(&mut self, byte: u8) {
        self.responses.push_back(byte);
    }

    /// Queue several response bytes in order
    pub fn queue_responses(&mut self, bytes: &[u8]) {
        self.responses.extend(bytes.iter().copied());
    }

    /// Bytes received in completed transactions
    pub fn received(&self) -> &[u8] {
        &self.received
    }

    /// Take the received bytes, leaving the log empty
    pub fn take_received(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.received)
    }

    /// Transactions cut short by chip select going inactive
    pub fn aborted(&self) -> usize {
        self.aborted
    }

    /// Whether chip select is currently active for this device
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn select(&mut self, sclk: bool) {
        let order = self.config.bit_order;
        let first = order.first_bit();

        self.selected = true;
        self.sclk = sclk;
        self.tx_byte = self.responses.pop_front().unwrap_or(self.last_received);
        self.rx_bit = Some(first);
        self.rx_shift = 0;

        if self.config.clock_phase {
            self.tx_bit = Some(first);
        } else {
            // CPHA=0 puts the first bit out before any clock edge
            self.miso = bit_of(self.tx_byte, first);
            self.tx_bit = order.next_bit(first);
        }
        log::trace!("slave {}: selected, loaded 0x{:02X}", self.index, self.tx_byte);
    }

    fn deselect(&mut self) {
        if self.rx_bit.is_some() {
            self.aborted += 1;
            log::debug!(
                "slave {}: deselected with partial byte 0x{:02X}",
                self.index,
                self.rx_shift
            );
        }
        self.selected = false;
        self.tx_bit = None;
        self.rx_bit = None;
    }

    fn clock_edge(&mut self, edge: Edge, mosi: bool) {
        let order = self.config.bit_order;
        match self.config.edge_role(edge) {
            EdgeRole::Shift => {
                if let Some(bit) = self.tx_bit {
                    self.miso = bit_of(self.tx_byte, bit);
                    self.tx_bit = order.next_bit(bit);
                }
            }
            EdgeRole::Sample => {
                if let Some(bit) = self.rx_bit {
                    if mosi {
                        self.rx_shift |= 1 << bit;
                    }
                    self.rx_bit = order.next_bit(bit);
                    if self.rx_bit.is_none() {
                        self.complete();
                    }
                }
            }
        }
    }

    fn complete(&mut self) {
        log::debug!(
            "slave {}: received 0x{:02X}, sent 0x{:02X}",
            self.index,
            self.rx_shift,
            self.tx_byte
        );
        self.received.push(self.rx_shift);
        self.last_received = self.rx_shift;
    }
}

impl Peripheral for ShiftRegisterSlave {
    fn miso(&self) -> bool {
        self.miso
    }

    fn observe(&mut self, outputs: &BusOutputs) {
        let active =
            outputs.chip_selects.level(self.index) == self.config.cs_polarity.active_level();

        match (self.selected, active) {
            (false, true) => self.select(outputs.sclk),
            (true, false) => self.deselect(),
            (true, true) if outputs.sclk != self.sclk => {
                self.sclk = outputs.sclk;
                let edge = if outputs.sclk != self.config.clock_polarity {
                    Edge::Leading
                } else {
                    Edge::Trailing
                };
                self.clock_edge(edge, outputs.mosi);
            }
            _ => {}
        }
    }
}

fn bit_of(byte: u8, bit: u8) -> bool {
    (byte >> bit) & 1 != 0
}
