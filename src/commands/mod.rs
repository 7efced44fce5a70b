//! CLI command implementations
//!
//! Every command builds an engine from the loaded bank, wires a simulated
//! device to it through [`SpiDriver`](spimaster_core::bus::SpiDriver) and
//! reports what happened on the bus.

pub mod bank;
mod device;
pub mod sweep;
pub mod trace;
pub mod transfer;

pub use device::Device;

use crate::cli::{CsArg, OrderArg, SlaveArgs};
use spimaster_core::config::{
    BankFile, BitOrder, CsPolarity, EngineParams, SlaveConfig, SlaveIndex, SpiMode,
};
use std::path::Path;

/// Load the bank file, if any, and apply timing overrides
pub fn load_bank(
    path: Option<&Path>,
    clocks_per_bit: Option<u32>,
    gap: Option<u32>,
) -> Result<BankFile, Box<dyn std::error::Error>> {
    let mut file = match path {
        Some(path) => {
            let file = BankFile::from_toml_file(path)
                .map_err(|e| format!("Failed to load bank file {}: {}", path.display(), e))?;
            log::info!("Loaded bank file {}", path.display());
            file
        }
        None => BankFile::default(),
    };

    if clocks_per_bit.is_some() || gap.is_some() {
        file.params = EngineParams::new(
            clocks_per_bit.unwrap_or(file.params.clocks_per_bit()),
            gap.unwrap_or(file.params.inactive_gap_ticks()),
        )?;
    }
    log::debug!(
        "engine: {} ticks per bit, {} gap ticks",
        file.params.clocks_per_bit(),
        file.params.inactive_gap_ticks()
    );

    Ok(file)
}

/// Resolve the target slave and its configuration
///
/// Starts from the bank entry and applies whatever the command line overrides.
pub fn resolve_slave(
    file: &BankFile,
    args: &SlaveArgs,
) -> Result<(SlaveIndex, SlaveConfig), Box<dyn std::error::Error>> {
    let slave = SlaveIndex::new(args.slave)?;
    let mut config = file.bank.get(slave);

    if let Some(mode) = args.mode {
        let mode = SpiMode::from_number(mode)?;
        config.clock_polarity = mode.clock_polarity();
        config.clock_phase = mode.clock_phase();
    }
    if let Some(order) = args.order {
        config.bit_order = match order {
            OrderArg::Msb => BitOrder::MsbFirst,
            OrderArg::Lsb => BitOrder::LsbFirst,
        };
    }
    if let Some(cs) = args.cs {
        config.cs_polarity = match cs {
            CsArg::Low => CsPolarity::ActiveLow,
            CsArg::High => CsPolarity::ActiveHigh,
        };
    }

    Ok((slave, config))
}

/// One-line description of a slave configuration
pub fn describe(config: &SlaveConfig) -> String {
    format!(
        "mode {} (CPOL={} CPHA={}), {}, CS {}",
        config.mode().number(),
        config.clock_polarity as u8,
        config.clock_phase as u8,
        match config.bit_order {
            BitOrder::MsbFirst => "MSB first",
            BitOrder::LsbFirst => "LSB first",
        },
        match config.cs_polarity {
            CsPolarity::ActiveLow => "active low",
            CsPolarity::ActiveHigh => "active high",
        }
    )
}

/// Bytes as space-separated hex
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
