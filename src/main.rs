//! spimaster - Cycle-accurate multi-slave SPI master simulator
//!
//! Drives the `spimaster-core` engine tick by tick against simulated
//! devices from `spimaster-sim`.
//!
//! # Architecture
//!
//! Every command loads an optional bank file (engine timing plus per-slave
//! configuration), applies command-line overrides, and then talks to the
//! engine only through its synchronous port contract: ready, request,
//! config write, `rx_data_valid`.

mod cli;
mod commands;

use clap::Parser;
use cli::{BankCommands, Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let bank = commands::load_bank(cli.bank.as_deref(), cli.clocks_per_bit, cli.gap)?;

    match cli.command {
        Commands::Transfer {
            slave,
            device,
            respond,
            bytes,
        } => commands::transfer::run_transfer(&bank, &slave, device, &respond, &bytes),
        Commands::Sweep { slave, with_slave } => {
            commands::sweep::run_sweep(&bank, slave, with_slave)
        }
        Commands::Trace {
            slave,
            device,
            byte,
        } => commands::trace::run_trace(&bank, &slave, device, byte),
        Commands::Bank(subcmd) => match subcmd {
            BankCommands::Show { file } => {
                let shown = match file {
                    Some(path) => commands::load_bank(Some(&path), cli.clocks_per_bit, cli.gap)?,
                    None => bank,
                };
                commands::bank::cmd_show(&shown);
                Ok(())
            }
            BankCommands::Template { output } => commands::bank::cmd_template(output.as_deref()),
        },
    }
}
