//! Sweep command implementation

use indicatif::{ProgressBar, ProgressStyle};
use spimaster_core::config::{BankFile, SlaveIndex};
use spimaster_sim::sweep::SWEEP_TRANSFERS;
use spimaster_sim::{sweep, SweepDevice};

/// Run the sweep command
pub fn run_sweep(
    file: &BankFile,
    slave: u8,
    with_slave: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let slave = SlaveIndex::new(slave)?;
    let device = if with_slave {
        SweepDevice::Slave
    } else {
        SweepDevice::Loopback
    };

    println!(
        "Sweeping slave {} against {:?} ({} ticks per bit, {} gap ticks)",
        slave,
        device,
        file.params.clocks_per_bit(),
        file.params.inactive_gap_ticks()
    );

    let pb = ProgressBar::new(SWEEP_TRANSFERS);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}, {eta})")?
            .progress_chars("#>-"),
    );

    match sweep(file.params, slave, device, |done| pb.set_position(done)) {
        Ok(report) => {
            pb.finish_with_message("Sweep complete");
            println!(
                "{} transfers in {} ticks, every byte matched",
                report.transfers, report.ticks
            );
            Ok(())
        }
        Err(e) => {
            pb.abandon();
            Err(e.into())
        }
    }
}
