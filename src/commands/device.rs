//! Simulated device selection

use crate::cli::DeviceArg;
use spimaster_core::bus::{Loopback, Peripheral, Tied};
use spimaster_core::config::{SlaveConfig, SlaveIndex};
use spimaster_core::signals::BusOutputs;
use spimaster_sim::ShiftRegisterSlave;

/// Whatever the command attached to the bus
#[derive(Debug)]
pub enum Device {
    /// MISO wired to MOSI
    Loopback(Loopback),
    /// Mode-aware slave device
    Slave(ShiftRegisterSlave),
    /// Nothing attached
    Open(Tied),
}

impl Device {
    /// Build the device named on the command line
    ///
    /// A slave device runs `config` on `slave` and answers with `respond`
    /// before falling back to echoing.
    pub fn new(arg: DeviceArg, slave: SlaveIndex, config: SlaveConfig, respond: &[u8]) -> Self {
        match arg {
            DeviceArg::Loopback => Device::Loopback(Loopback::new()),
            DeviceArg::Slave => {
                let mut device = ShiftRegisterSlave::new(slave, config);
                device.queue_responses(respond);
                Device::Slave(device)
            }
            DeviceArg::Open => Device::Open(Tied(true)),
        }
    }

    /// The slave device, if one is attached
    pub fn slave(&self) -> Option<&ShiftRegisterSlave> {
        match self {
            Device::Slave(device) => Some(device),
            _ => None,
        }
    }
}

impl Peripheral for Device {
    fn miso(&self) -> bool {
        match self {
            Device::Loopback(p) => p.miso(),
            Device::Slave(p) => p.miso(),
            Device::Open(p) => p.miso(),
        }
    }

    fn observe(&mut self, outputs: &BusOutputs) {
        match self {
            Device::Loopback(p) => p.observe(outputs),
            Device::Slave(p) => p.observe(outputs),
            Device::Open(p) => p.observe(outputs),
        }
    }
}
