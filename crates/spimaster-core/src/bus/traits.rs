//! Peripheral trait definitions

use crate::signals::BusOutputs;

/// Something attached to the far side of the bus
///
/// The driver asks for the MISO level before every tick and hands the
/// engine's outputs back after it, so a peripheral sees every SCLK, CS and
/// MOSI transition one tick after the engine drives it.
pub trait Peripheral {
    /// Level presented on MISO for the coming tick
    fn miso(&self) -> bool;

    /// Observe the outputs the engine drove on the tick just finished
    fn observe(&mut self, outputs: &BusOutputs);
}

impl<P: Peripheral + ?Sized> Peripheral for &mut P {
    fn miso(&self) -> bool {
        (**self).miso()
    }

    fn observe(&mut self, outputs: &BusOutputs) {
        (**self).observe(outputs)
    }
}

#[cfg(feature = "alloc")]
impl<P: Peripheral + ?Sized> Peripheral for alloc::boxed::Box<P> {
    fn miso(&self) -> bool {
        (**self).miso()
    }

    fn observe(&mut self, outputs: &BusOutputs) {
        (**self).observe(outputs)
    }
}

/// MISO tied to a fixed level, e.g. a pull-up with nothing driving the line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tied(pub bool);

impl Peripheral for Tied {
    fn miso(&self) -> bool {
        self.0
    }

    fn observe(&mut self, _outputs: &BusOutputs) {}
}

/// MISO wired straight to MOSI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Loopback {
    mosi: bool,
}

impl Loopback {
    /// Create a loopback with the line initially low
    pub fn new() -> Self {
        Self::default()
    }
}

impl Peripheral for Loopback {
    fn miso(&self) -> bool {
        self.mosi
    }

    fn observe(&mut self, outputs: &BusOutputs) {
        self.mosi = outputs.mosi;
    }
}
