//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a string as a hex or decimal byte
fn parse_hex_u8(s: &str) -> Result<u8, String> {
    let value = parse_hex_u32(s)?;
    u8::try_from(value).map_err(|_| format!("Value does not fit in a byte: {}", s))
}

/// Parse a slave index (0-7)
fn parse_slave(s: &str) -> Result<u8, String> {
    match parse_hex_u8(s)? {
        n @ 0..=7 => Ok(n),
        n => Err(format!("Slave index out of range (0-7): {}", n)),
    }
}

/// Parse an SPI mode number (0-3)
fn parse_mode(s: &str) -> Result<u8, String> {
    match parse_hex_u8(s)? {
        n @ 0..=3 => Ok(n),
        n => Err(format!("SPI mode out of range (0-3): {}", n)),
    }
}

#[derive(Parser)]
#[command(name = "spimaster")]
#[command(author, version, about = "Cycle-accurate multi-slave SPI master simulator", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Bank file (TOML) with engine timing and slave configurations
    #[arg(long, global = true)]
    pub bank: Option<PathBuf>,

    /// Driving-clock ticks per SPI bit (even, overrides the bank file)
    #[arg(long, global = true, value_parser = parse_hex_u32)]
    pub clocks_per_bit: Option<u32>,

    /// Idle ticks between a request and the first clock edge (overrides the bank file)
    #[arg(long, global = true, value_parser = parse_hex_u32)]
    pub gap: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Bit order on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    /// Most significant bit first
    Msb,
    /// Least significant bit first
    Lsb,
}

/// Chip select polarity on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsArg {
    /// Selected when low
    Low,
    /// Selected when high
    High,
}

/// What to attach to the bus
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceArg {
    /// MISO wired to MOSI
    #[default]
    Loopback,
    /// Shift-register slave running the same configuration
    Slave,
    /// Nothing attached, MISO pulled up
    Open,
}

/// Slave selection and per-slave overrides
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SlaveArgs {
    /// Slave index (0-7)
    #[arg(short, long, default_value = "0", value_parser = parse_slave)]
    pub slave: u8,

    /// SPI mode (0-3)
    #[arg(short, long, value_parser = parse_mode)]
    pub mode: Option<u8>,

    /// Bit order
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Chip select polarity
    #[arg(long, value_enum)]
    pub cs: Option<CsArg>,
}

impl SlaveArgs {
    /// Whether any configuration override was given
    pub fn has_overrides(&self) -> bool {
        self.mode.is_some() || self.order.is_some() || self.cs.is_some()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Exchange bytes with one slave
    Transfer {
        #[command(flatten)]
        slave: SlaveArgs,

        /// Device on the bus
        #[arg(short, long, value_enum, default_value_t)]
        device: DeviceArg,

        /// Bytes the slave device answers with (comma-separated)
        #[arg(long, value_delimiter = ',', value_parser = parse_hex_u8)]
        respond: Vec<u8>,

        /// Bytes to send (hex or decimal)
        #[arg(required = true, value_parser = parse_hex_u8)]
        bytes: Vec<u8>,
    },

    /// Loop every byte through every mode and bit order
    Sweep {
        /// Slave index (0-7)
        #[arg(short, long, default_value = "0", value_parser = parse_slave)]
        slave: u8,

        /// Use a shift-register slave instead of a loopback
        #[arg(long)]
        with_slave: bool,
    },

    /// Print the waveform of one transaction
    Trace {
        #[command(flatten)]
        slave: SlaveArgs,

        /// Device on the bus
        #[arg(short, long, value_enum, default_value_t)]
        device: DeviceArg,

        /// Byte to send
        #[arg(value_parser = parse_hex_u8)]
        byte: u8,
    },

    /// Bank file operations
    #[command(subcommand)]
    Bank(BankCommands),
}

#[derive(Subcommand)]
pub enum BankCommands {
    /// Show the engine timing and every slave configuration
    Show {
        /// Bank file to show (defaults to --bank, then power-on values)
        file: Option<PathBuf>,
    },

    /// Write a bank file with default values
    Template {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_number_parsers() {
        assert_eq!(parse_hex_u8("0xA5"), Ok(0xA5));
        assert_eq!(parse_hex_u8("200"), Ok(200));
        assert!(parse_hex_u8("0x100").is_err());
        assert_eq!(parse_slave("7"), Ok(7));
        assert!(parse_slave("8").is_err());
        assert_eq!(parse_mode("0x3"), Ok(3));
        assert!(parse_mode("4").is_err());
    }

    #[test]
    fn test_parse_transfer() {
        let cli = Cli::try_parse_from([
            "spimaster", "-vv", "--gap", "0", "transfer", "-s", "3", "--mode", "2", "--order",
            "lsb", "--device", "slave", "--respond", "0x01,0x02", "0xA5", "0x5A",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.gap, Some(0));
        match cli.command {
            Commands::Transfer {
                slave,
                device,
                respond,
                bytes,
            } => {
                assert_eq!(slave.slave, 3);
                assert_eq!(slave.mode, Some(2));
                assert_eq!(slave.order, Some(OrderArg::Lsb));
                assert!(slave.cs.is_none());
                assert!(slave.has_overrides());
                assert_eq!(device, DeviceArg::Slave);
                assert_eq!(respond, vec![0x01, 0x02]);
                assert_eq!(bytes, vec![0xA5, 0x5A]);
            }
            _ => panic!("expected transfer"),
        }
    }

    #[test]
    fn test_transfer_needs_bytes() {
        assert!(Cli::try_parse_from(["spimaster", "transfer"]).is_err());
    }
}
