//! Bus clock divider and edge generator
//!
//! Derives the SPI bus clock from the driving clock. Once started, the
//! generator toggles its clock line every `clocks_per_bit / 2` ticks and
//! reports each toggle as a leading or trailing edge, stopping after
//! [`EDGES_PER_BYTE`] edges.

use crate::config::EngineParams;

/// Bus clock edges per 8-bit word (two per bit)
pub const EDGES_PER_BYTE: u8 = 16;

/// A bus clock transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// First transition of a bit period (away from the idle level)
    Leading,
    /// Second transition of a bit period (back to the idle level)
    Trailing,
}

/// What the generator produced on one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeTick {
    /// Edge fired on this tick, if any
    pub edge: Option<Edge>,
    /// Whether the generator still counts as active on this tick
    pub running: bool,
}

/// Bus clock edge generator
#[derive(Debug, Clone)]
pub struct EdgeGenerator {
    clocks_per_bit: u32,
    half_bit: u32,
    /// Position within the current bit period, 0..clocks_per_bit
    counter: u32,
    edges_remaining: u8,
    sclk: bool,
    running: bool,
}

impl EdgeGenerator {
    /// Create an idle generator for the given parameters
    pub fn new(params: &EngineParams) -> Self {
        Self {
            clocks_per_bit: params.clocks_per_bit(),
            half_bit: params.half_bit_ticks(),
            counter: 0,
            edges_remaining: 0,
            sclk: false,
            running: false,
        }
    }

    /// Begin a 16-edge train with the clock resting at `clock_polarity`
    ///
    /// The generator reports running from this tick on.
    pub fn start(&mut self, clock_polarity: bool) {
        self.counter = 0;
        self.edges_remaining = EDGES_PER_BYTE;
        self.sclk = clock_polarity;
        self.running = true;
    }

    /// Stop immediately and forget any edges still owed
    pub fn reset(&mut self) {
        self.counter = 0;
        self.edges_remaining = 0;
        self.running = false;
    }

    /// Advance by one driving-clock tick
    pub fn tick(&mut self) -> EdgeTick {
        let mut edge = None;

        if self.edges_remaining > 0 {
            if self.counter == self.clocks_per_bit - 1 {
                edge = Some(Edge::Trailing);
                self.counter = 0;
            } else if self.counter == self.half_bit - 1 {
                edge = Some(Edge::Leading);
                self.counter += 1;
            } else {
                self.counter += 1;
            }

            if edge.is_some() {
                self.sclk = !self.sclk;
                self.edges_remaining -= 1;
            }
        }

        self.running = edge.is_some() || self.edges_remaining > 0;
        if let Some(edge) = edge {
            log::trace!("sclk {:?} edge, {} remaining", edge, self.edges_remaining);
        }

        EdgeTick {
            edge,
            running: self.running,
        }
    }

    /// Current level of the generated clock
    pub fn sclk(&self) -> bool {
        self.sclk
    }

    /// Whether the generator is active
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Edges left in the current train
    pub fn edges_remaining(&self) -> u8 {
        self.edges_remaining
    }
}
