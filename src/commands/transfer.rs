//! Transfer command implementation

use super::{describe, hex, resolve_slave, Device};
use crate::cli::{DeviceArg, SlaveArgs};
use spimaster_core::bus::SpiDriver;
use spimaster_core::config::BankFile;
use spimaster_core::engine::Engine;

/// Run the transfer command
pub fn run_transfer(
    file: &BankFile,
    args: &SlaveArgs,
    device: DeviceArg,
    respond: &[u8],
    bytes: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let (slave, config) = resolve_slave(file, args)?;
    if args.has_overrides() {
        log::debug!("slave {} overridden on the command line", slave);
    }

    // engine and device must agree on chip select polarity from the first tick
    let bank = file.bank.with(slave, config);
    let mut drv = SpiDriver::new(
        Engine::with_bank(file.params, bank),
        Device::new(device, slave, config, respond),
    );

    println!("Slave {}: {}", slave, describe(&config));

    let start = drv.engine().ticks();
    let mut received = vec![0u8; bytes.len()];
    drv.transfer(slave, bytes, &mut received)?;
    let ticks = drv.engine().ticks() - start;

    for (sent, got) in bytes.iter().zip(&received) {
        println!("  0x{:02X} -> 0x{:02X}", sent, got);
    }
    println!("{} byte(s) in {} ticks", bytes.len(), ticks);

    if let Some(device) = drv.peripheral().slave() {
        println!("Slave saw: {}", hex(device.received()));
    }

    Ok(())
}
