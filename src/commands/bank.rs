//! Bank command implementations

use super::describe;
use spimaster_core::config::BankFile;
use std::path::Path;

/// Show a bank
pub fn cmd_show(file: &BankFile) {
    println!(
        "Engine: {} ticks per bit, {} gap ticks, {} ticks per transaction",
        file.params.clocks_per_bit(),
        file.params.inactive_gap_ticks(),
        file.params.transaction_ticks()
    );
    println!();
    println!("{:<6} {:>4}  {}", "Slave", "Bits", "Configuration");
    println!("{}", "-".repeat(60));

    for (index, config) in file.bank.iter() {
        println!(
            "{:<6} {:>4}  {}",
            index.get(),
            format!("0x{:X}", config.to_bits()),
            describe(&config)
        );
    }
}

/// Write a bank file with default values
pub fn cmd_template(output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let file = BankFile::default();
    match output {
        Some(path) => {
            file.write_toml_file(path)?;
            println!("Wrote bank template to {}", path.display());
        }
        None => print!("{}", file.to_toml_string()?),
    }
    Ok(())
}
