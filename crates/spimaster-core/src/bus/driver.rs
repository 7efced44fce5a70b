//! Byte-level driver
//!
//! The engine only moves one byte per handshake. [`SpiDriver`] plays the
//! external caller: it polls ready, pulses the request, ticks until
//! `rx_data_valid`, and repeats that for every byte of a buffer.

use crate::config::{SlaveConfig, SlaveIndex};
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::signals::{BusOutputs, TickInputs};

use super::traits::Peripheral;

/// Byte shifted out while only reading
pub const FILL_BYTE: u8 = 0x00;

/// Engine plus the peripheral wired to it
#[derive(Debug)]
pub struct SpiDriver<P> {
    engine: Engine,
    peripheral: P,
    budget: u64,
}

impl<P: Peripheral> SpiDriver<P> {
    /// Wire `peripheral` to `engine`
    ///
    /// The tick budget for each wait defaults to one full transaction.
    pub fn new(engine: Engine, peripheral: P) -> Self {
        let budget = engine.params().transaction_ticks() + 1;
        Self {
            engine,
            peripheral,
            budget,
        }
    }

    /// Override the per-wait tick budget
    pub fn with_budget(mut self, ticks: u64) -> Self {
        self.budget = ticks;
        self
    }

    /// The engine
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The peripheral
    pub fn peripheral(&self) -> &P {
        &self.peripheral
    }

    /// The peripheral, mutably
    pub fn peripheral_mut(&mut self) -> &mut P {
        &mut self.peripheral
    }

    /// Take the engine and peripheral apart again
    pub fn into_parts(self) -> (Engine, P) {
        (self.engine, self.peripheral)
    }

    /// Run one tick with MISO taken from the peripheral
    pub fn tick(&mut self, inputs: TickInputs) -> BusOutputs {
        let inputs = inputs.with_miso(self.peripheral.miso());
        let outputs = self.engine.tick(&inputs);
        self.peripheral.observe(&outputs);
        outputs
    }

    /// Tick until the engine reports ready
    pub fn wait_ready(&mut self) -> Result<()> {
        for _ in 0..self.budget {
            if self.engine.is_ready() {
                return Ok(());
            }
            self.tick(TickInputs::default());
        }
        if self.engine.is_ready() {
            Ok(())
        } else {
            log::warn!("engine not ready after {} ticks", self.budget);
            Err(Error::Timeout)
        }
    }

    /// Write the configuration of `slave` once the engine is ready
    pub fn configure(&mut self, slave: SlaveIndex, config: SlaveConfig) -> Result<()> {
        self.wait_ready()?;
        self.tick(TickInputs::default().with_config_write(slave, config));
        Ok(())
    }

    /// Exchange one byte with `slave`
    pub fn transfer_byte(&mut self, slave: SlaveIndex, byte: u8) -> Result<u8> {
        self.wait_ready()?;
        let mut outputs = self.tick(TickInputs::default().with_request(slave, byte));
        let mut waited = 0;
        while !outputs.rx_data_valid {
            if waited == self.budget {
                log::warn!(
                    "no rx_data_valid from slave {} after {} ticks",
                    slave,
                    self.budget
                );
                return Err(Error::Timeout);
            }
            outputs = self.tick(TickInputs::default());
            waited += 1;
        }
        Ok(outputs.rx_byte)
    }

    /// Full-duplex transfer, one handshake per byte
    ///
    /// Runs for the longer of the two buffers: missing write bytes are sent
    /// as [`FILL_BYTE`], surplus received bytes are dropped.
    pub fn transfer(&mut self, slave: SlaveIndex, write: &[u8], read: &mut [u8]) -> Result<()> {
        let len = write.len().max(read.len());
        for i in 0..len {
            let out = write.get(i).copied().unwrap_or(FILL_BYTE);
            let received = self.transfer_byte(slave, out)?;
            if let Some(slot) = read.get_mut(i) {
                *slot = received;
            }
        }
        Ok(())
    }

    /// Transfer `data` and replace it with the received bytes
    pub fn transfer_in_place(&mut self, slave: SlaveIndex, data: &mut [u8]) -> Result<()> {
        for byte in data.iter_mut() {
            *byte = self.transfer_byte(slave, *byte)?;
        }
        Ok(())
    }

    /// Write bytes, discarding what comes back
    pub fn write(&mut self, slave: SlaveIndex, data: &[u8]) -> Result<()> {
        for &byte in data {
            self.transfer_byte(slave, byte)?;
        }
        Ok(())
    }

    /// Read bytes, shifting out [`FILL_BYTE`]
    pub fn read(&mut self, slave: SlaveIndex, buf: &mut [u8]) -> Result<()> {
        for byte in buf.iter_mut() {
            *byte = self.transfer_byte(slave, FILL_BYTE)?;
        }
        Ok(())
    }

    /// Pulse reset
    pub fn reset(&mut self) -> BusOutputs {
        self.tick(TickInputs::default().with_reset())
    }
}
