//! Tick-by-tick bus recording
//!
//! [`TraceRecorder`] sits between the driver and any peripheral and keeps
//! every tick's outputs together with the MISO level that was presented on
//! that tick. The recorded trace can be queried or rendered as an ASCII
//! waveform.

use std::fmt;
use std::ops::Range;

use spimaster_core::bus::Peripheral;
use spimaster_core::config::{CsPolarity, SlaveIndex};
use spimaster_core::signals::BusOutputs;

/// One recorded tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSample {
    /// Outputs driven on this tick
    pub outputs: BusOutputs,
    /// MISO level the engine sampled on this tick
    pub miso: bool,
}

/// A line that can be drawn in a waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Engine ready
    Ready,
    /// Received byte valid strobe
    Valid,
    /// Bus clock
    Sclk,
    /// Master out
    Mosi,
    /// Master in
    Miso,
    /// Raw level of one chip select line
    Cs(SlaveIndex),
}

impl Signal {
    /// The lines worth looking at for a transaction with `slave`
    pub fn standard(slave: SlaveIndex) -> [Signal; 6] {
        [
            Signal::Ready,
            Signal::Cs(slave),
            Signal::Sclk,
            Signal::Mosi,
            Signal::Miso,
            Signal::Valid,
        ]
    }

    fn level(&self, sample: &TraceSample) -> bool {
        match self {
            Signal::Ready => sample.outputs.ready,
            Signal::Valid => sample.outputs.rx_data_valid,
            Signal::Sclk => sample.outputs.sclk,
            Signal::Mosi => sample.outputs.mosi,
            Signal::Miso => sample.miso,
            Signal::Cs(slave) => sample.outputs.chip_selects.level(*slave),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Ready => write!(f, "ready"),
            Signal::Valid => write!(f, "valid"),
            Signal::Sclk => write!(f, "sclk"),
            Signal::Mosi => write!(f, "mosi"),
            Signal::Miso => write!(f, "miso"),
            Signal::Cs(slave) => write!(f, "cs{}", slave),
        }
    }
}

/// Peripheral wrapper that records every tick
#[derive(Debug, Clone, Default)]
pub struct TraceRecorder<P> {
    inner: P,
    samples: Vec<TraceSample>,
}

impl<P: Peripheral> TraceRecorder<P> {
    /// Wrap `inner`
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            samples: Vec::new(),
        }
    }

    /// The wrapped peripheral
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// The wrapped peripheral, mutably
    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.inner
    }

    /// Unwrap, dropping the trace
    pub fn into_inner(self) -> P {
        self.inner
    }

    /// Recorded ticks, oldest first
    pub fn samples(&self) -> &[TraceSample] {
        &self.samples
    }

    /// Number of recorded ticks
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Forget everything recorded so far
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of SCLK level changes between consecutive ticks
    pub fn sclk_edges(&self) -> usize {
        self.samples
            .windows(2)
            .filter(|w| w[0].outputs.sclk != w[1].outputs.sclk)
            .count()
    }

    /// Tick ranges during which `slave`'s chip select was active
    pub fn select_spans(&self, slave: SlaveIndex, polarity: CsPolarity) -> Vec<Range<usize>> {
        let active = polarity.active_level();
        let mut spans = Vec::new();
        let mut start = None;

        for (i, sample) in self.samples.iter().enumerate() {
            let selected = sample.outputs.chip_selects.level(slave) == active;
            match (start, selected) {
                (None, true) => start = Some(i),
                (Some(s), false) => {
                    spans.push(s..i);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            spans.push(s..self.samples.len());
        }
        spans
    }

    /// Ticks on which `rx_data_valid` was high
    pub fn valid_ticks(&self) -> Vec<usize> {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, s)| s.outputs.rx_data_valid)
            .map(|(i, _)| i)
            .collect()
    }

    /// Ticks on which the engine was busy
    pub fn busy_ticks(&self) -> usize {
        self.samples.iter().filter(|s| !s.outputs.ready).count()
    }

    /// Render the chosen lines, one character per tick
    ///
    /// High is drawn as `-`, low as `_`. A tick ruler is printed every ten
    /// ticks above the first line.
    pub fn render(&self, signals: &[Signal]) -> String {
        let width = signals
            .iter()
            .map(|s| s.to_string().len())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        out.push_str(&format!("{:>width$} ", ""));
        for i in 0..self.samples.len() {
            out.push(if i % 10 == 0 { '|' } else { ' ' });
        }
        out.push('\n');

        for signal in signals {
            out.push_str(&format!("{:>width$} ", signal.to_string()));
            for sample in &self.samples {
                out.push(if signal.level(sample) { '-' } else { '_' });
            }
            out.push('\n');
        }
        out
    }
}

impl<P: Peripheral> Peripheral for TraceRecorder<P> {
    fn miso(&self) -> bool {
        self.inner.miso()
    }

    fn observe(&mut self, outputs: &BusOutputs) {
        // inner has not seen this tick yet, so miso() is still the sampled level
        self.samples.push(TraceSample {
            outputs: *outputs,
            miso: self.inner.miso(),
        });
        self.inner.observe(outputs);
    }
}
