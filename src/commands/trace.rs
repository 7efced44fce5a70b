//! Trace command implementation

use super::{describe, resolve_slave, Device};
use crate::cli::{DeviceArg, SlaveArgs};
use spimaster_core::bus::SpiDriver;
use spimaster_core::config::BankFile;
use spimaster_core::engine::Engine;
use spimaster_sim::{Signal, TraceRecorder};

/// Run the trace command
pub fn run_trace(
    file: &BankFile,
    args: &SlaveArgs,
    device: DeviceArg,
    byte: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let (slave, config) = resolve_slave(file, args)?;
    let bank = file.bank.with(slave, config);
    let recorder = TraceRecorder::new(Device::new(device, slave, config, &[]));
    let mut drv = SpiDriver::new(Engine::with_bank(file.params, bank), recorder);

    let received = drv.transfer_byte(slave, byte)?;
    let trace = drv.peripheral();

    println!("Slave {}: {}", slave, describe(&config));
    println!();
    print!("{}", trace.render(&Signal::standard(slave)));
    println!();
    println!("Sent 0x{:02X}, received 0x{:02X}", byte, received);
    println!("{} ticks, {} SCLK edges", trace.len(), trace.sclk_edges());
    for span in trace.select_spans(slave, config.cs_polarity) {
        println!("CS{} active on ticks {}..{}", slave, span.start, span.end);
    }

    Ok(())
}
