//! Exhaustive mode, bit order and byte sweeps

use spimaster_core::bus::{Loopback, SpiDriver};
use spimaster_core::config::{
    BitOrder, ConfigBank, CsPolarity, EngineParams, SlaveConfig, SlaveIndex, SpiMode,
};
use spimaster_core::engine::Engine;

use crate::error::{Result, SimError};
use crate::slave::ShiftRegisterSlave;

/// Bit orders covered by a sweep
pub const BIT_ORDERS: [BitOrder; 2] = [BitOrder::MsbFirst, BitOrder::LsbFirst];

/// Transfers performed by a full sweep
pub const SWEEP_TRANSFERS: u64 = (SpiMode::ALL.len() * BIT_ORDERS.len() * 256) as u64;

/// What sits on the far end of the bus during a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepDevice {
    /// MISO wired to MOSI
    #[default]
    Loopback,
    /// A shift-register slave in the same mode, echoing the previous byte
    Slave,
}

/// Outcome of a successful sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Bytes exchanged
    pub transfers: u64,
    /// Driving-clock ticks spent
    pub ticks: u64,
}

/// Exchange every byte value in every mode and bit order
///
/// `progress` is called after each transfer with the number done so far.
/// Stops at the first byte that comes back wrong.
pub fn sweep(
    params: EngineParams,
    slave: SlaveIndex,
    device: SweepDevice,
    mut progress: impl FnMut(u64),
) -> Result<SweepReport> {
    let mut report = SweepReport {
        transfers: 0,
        ticks: 0,
    };

    for mode in SpiMode::ALL {
        for order in BIT_ORDERS {
            let config = SlaveConfig::new(mode, order, CsPolarity::ActiveLow);
            log::debug!("sweeping slave {} mode {} {:?}", slave, mode.number(), order);

            let ticks = match device {
                SweepDevice::Loopback => {
                    sweep_loopback(params, slave, config, &mut report, &mut progress)?
                }
                SweepDevice::Slave => {
                    sweep_slave(params, slave, config, &mut report, &mut progress)?
                }
            };
            report.ticks += ticks;
        }
    }
    Ok(report)
}

fn sweep_loopback(
    params: EngineParams,
    slave: SlaveIndex,
    config: SlaveConfig,
    report: &mut SweepReport,
    progress: &mut impl FnMut(u64),
) -> Result<u64> {
    let mut drv = SpiDriver::new(Engine::new(params), Loopback::new());
    drv.configure(slave, config)?;

    for byte in 0..=u8::MAX {
        let received = drv.transfer_byte(slave, byte)?;
        check(config, byte, received)?;
        report.transfers += 1;
        progress(report.transfers);
    }
    Ok(drv.engine().ticks())
}

fn sweep_slave(
    params: EngineParams,
    slave: SlaveIndex,
    config: SlaveConfig,
    report: &mut SweepReport,
    progress: &mut impl FnMut(u64),
) -> Result<u64> {
    let bank = ConfigBank::new().with(slave, config);
    let mut drv = SpiDriver::new(
        Engine::with_bank(params, bank),
        ShiftRegisterSlave::new(slave, config),
    );

    let mut previous = 0x00;
    for byte in 0..=u8::MAX {
        let received = drv.transfer_byte(slave, byte)?;
        check(config, previous, received)?;
        previous = byte;
        report.transfers += 1;
        progress(report.transfers);
    }

    // what the slave saw must match what was sent, in order
    for (sent, &seen) in (0..=u8::MAX).zip(drv.peripheral().received()) {
        check(config, sent, seen)?;
    }
    Ok(drv.engine().ticks())
}

fn check(config: SlaveConfig, sent: u8, received: u8) -> Result<()> {
    if sent == received {
        return Ok(());
    }
    log::warn!(
        "mode {} {:?}: expected 0x{:02X}, got 0x{:02X}",
        config.mode().number(),
        config.bit_order,
        sent,
        received
    );
    Err(SimError::LoopbackMismatch {
        mode: config.mode().number(),
        order: config.bit_order,
        sent,
        received,
    })
}
