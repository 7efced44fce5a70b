//! Shared bus with several slave devices
//!
//! Every device sees every tick. MISO is pulled up and each selected device
//! can only pull it low, so an idle bus reads 0xFF and two devices selected
//! at once produce the wired-AND of their outputs.

use spimaster_core::bus::Peripheral;
use spimaster_core::config::{SlaveIndex, NUM_SLAVES};
use spimaster_core::signals::BusOutputs;

use crate::error::{Result, SimError};
use crate::slave::ShiftRegisterSlave;

/// Up to eight slave devices on one set of wires
#[derive(Debug, Clone, Default)]
pub struct SlaveBus {
    devices: Vec<ShiftRegisterSlave>,
}

impl SlaveBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a device at its slave index
    pub fn attach(&mut self, device: ShiftRegisterSlave) -> Result<()> {
        if self.device(device.index()).is_some() {
            return Err(SimError::SlaveIndexTaken(device.index()));
        }
        log::debug!(
            "attached slave {} in mode {}",
            device.index(),
            device.config().mode().number()
        );
        self.devices.push(device);
        self.devices.sort_by_key(|d| d.index());
        Ok(())
    }

    /// Attach a device, builder style
    pub fn with(mut self, device: ShiftRegisterSlave) -> Result<Self> {
        self.attach(device)?;
        Ok(self)
    }

    /// Device attached at `index`
    pub fn device(&self, index: SlaveIndex) -> Option<&ShiftRegisterSlave> {
        self.devices.iter().find(|d| d.index() == index)
    }

    /// Device attached at `index`, mutably
    pub fn device_mut(&mut self, index: SlaveIndex) -> Option<&mut ShiftRegisterSlave> {
        self.devices.iter_mut().find(|d| d.index() == index)
    }

    /// All attached devices in index order
    pub fn devices(&self) -> &[ShiftRegisterSlave] {
        &self.devices
    }

    /// Number of attached devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether no device is attached
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Whether every slave index has a device
    pub fn is_full(&self) -> bool {
        self.devices.len() == NUM_SLAVES
    }
}

impl Peripheral for SlaveBus {
    fn miso(&self) -> bool {
        self.devices
            .iter()
            .filter(|d| d.is_selected())
            .all(|d| d.miso())
    }

    fn observe(&mut self, outputs: &BusOutputs) {
        for device in &mut self.devices {
            device.observe(outputs);
        }
    }
}
