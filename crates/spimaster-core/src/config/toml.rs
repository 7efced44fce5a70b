//! TOML bank file parsing
//!
//! A bank file carries the engine parameters and the configuration of any
//! number of slaves. Slaves not listed keep their power-on configuration.
//!
//! ```toml
//! [engine]
//! clocks_per_bit = 4
//! inactive_gap_ticks = 2
//!
//! [[slave]]
//! index = 0
//! mode = 0
//! bit_order = "msb"
//! cs = "active-low"
//!
//! [[slave]]
//! index = 0x3
//! mode = 3
//! bit_order = "lsb"
//! cs = "active-high"
//! ```

use std::format;
use std::fs;
use std::path::Path;
use std::string::String;
use std::vec::Vec;

use serde::{Deserialize, Serialize};

use super::{
    BitOrder, ConfigBank, CsPolarity, EngineParams, SlaveConfig, SlaveIndex, SpiMode,
    DEFAULT_CLOCKS_PER_BIT, DEFAULT_INACTIVE_GAP_TICKS,
};
use crate::error::{Error, Result};

/// TOML bank file structure
#[derive(Debug, Default, Deserialize, Serialize)]
struct TomlBankFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    engine: Option<TomlEngine>,
    #[serde(default)]
    slave: Vec<TomlSlave>,
}

/// Engine timing section
#[derive(Debug, Deserialize, Serialize)]
struct TomlEngine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clocks_per_bit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inactive_gap_ticks: Option<u32>,
}

/// Slave definition in TOML
#[derive(Debug, Deserialize, Serialize)]
struct TomlSlave {
    #[serde(deserialize_with = "deserialize_hex_u8")]
    index: u8,
    #[serde(default)]
    mode: u8,
    #[serde(default)]
    bit_order: TomlBitOrder,
    #[serde(default)]
    cs: TomlCs,
}

#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum TomlBitOrder {
    #[default]
    #[serde(alias = "msb-first")]
    Msb,
    #[serde(alias = "lsb-first")]
    Lsb,
}

#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum TomlCs {
    #[default]
    ActiveLow,
    ActiveHigh,
}

/// Deserialize a u8 that can be hex (0x...) or decimal
fn deserialize_hex_u8<'de, D>(deserializer: D) -> core::result::Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HexOrInt {
        Int(u8),
        Str(String),
    }

    match HexOrInt::deserialize(deserializer)? {
        HexOrInt::Int(n) => Ok(n),
        HexOrInt::Str(s) => parse_number(&s).map_err(serde::de::Error::custom),
    }
}

/// Parse a number that can be hex (0x...) or decimal
fn parse_number(s: &str) -> core::result::Result<u8, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).map_err(|e| format!("invalid hex: {}", e))
    } else {
        s.parse().map_err(|e| format!("invalid number: {}", e))
    }
}

impl TomlSlave {
    fn to_config(&self) -> Result<(SlaveIndex, SlaveConfig)> {
        let index = SlaveIndex::new(self.index)?;
        let mode = SpiMode::from_number(self.mode)?;
        let bit_order = match self.bit_order {
            TomlBitOrder::Msb => BitOrder::MsbFirst,
            TomlBitOrder::Lsb => BitOrder::LsbFirst,
        };
        let cs_polarity = match self.cs {
            TomlCs::ActiveLow => CsPolarity::ActiveLow,
            TomlCs::ActiveHigh => CsPolarity::ActiveHigh,
        };
        Ok((index, SlaveConfig::new(mode, bit_order, cs_polarity)))
    }

    fn from_config(index: SlaveIndex, config: &SlaveConfig) -> Self {
        Self {
            index: index.get(),
            mode: config.mode().number(),
            bit_order: match config.bit_order {
                BitOrder::MsbFirst => TomlBitOrder::Msb,
                BitOrder::LsbFirst => TomlBitOrder::Lsb,
            },
            cs: match config.cs_polarity {
                CsPolarity::ActiveLow => TomlCs::ActiveLow,
                CsPolarity::ActiveHigh => TomlCs::ActiveHigh,
            },
        }
    }
}

/// Engine parameters plus slave configurations loaded from a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BankFile {
    /// Engine timing
    pub params: EngineParams,
    /// Slave configurations
    pub bank: ConfigBank,
}

impl BankFile {
    /// Load a bank file from disk
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|_| Error::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parse a bank file from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TomlBankFile = toml::from_str(content).map_err(|e| {
            log::debug!("bank file parse error: {}", e);
            Error::ConfigParse
        })?;

        let params = match file.engine {
            Some(engine) => EngineParams::new(
                engine.clocks_per_bit.unwrap_or(DEFAULT_CLOCKS_PER_BIT),
                engine
                    .inactive_gap_ticks
                    .unwrap_or(DEFAULT_INACTIVE_GAP_TICKS),
            )?,
            None => EngineParams::default(),
        };

        let mut bank = ConfigBank::new();
        let mut seen = [false; super::NUM_SLAVES];
        for toml_slave in &file.slave {
            let (index, config) = toml_slave.to_config()?;
            if seen[index.as_usize()] {
                log::warn!("bank file lists slave {} more than once", index);
                return Err(Error::ConfigParse);
            }
            seen[index.as_usize()] = true;
            bank.set(index, config);
        }

        Ok(Self { params, bank })
    }

    /// Render as TOML, listing every slave
    pub fn to_toml_string(&self) -> Result<String> {
        let file = TomlBankFile {
            engine: Some(TomlEngine {
                clocks_per_bit: Some(self.params.clocks_per_bit()),
                inactive_gap_ticks: Some(self.params.inactive_gap_ticks()),
            }),
            slave: self
                .bank
                .iter()
                .map(|(index, config)| TomlSlave::from_config(index, &config))
                .collect(),
        };
        toml::to_string(&file).map_err(|e| {
            log::debug!("bank file render error: {}", e);
            Error::ConfigParse
        })
    }

    /// Write the bank file to disk
    pub fn write_toml_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|_| Error::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("7").unwrap(), 7);
        assert_eq!(parse_number("0x7").unwrap(), 7);
        assert_eq!(parse_number(" 0X0a ").unwrap(), 10);
        assert!(parse_number("0x100").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[engine]
clocks_per_bit = 6
inactive_gap_ticks = 3

[[slave]]
index = 1
mode = 2
bit_order = "lsb"
cs = "active-high"

[[slave]]
index = "0x7"
mode = 1
"#;
        let file = BankFile::from_toml_str(toml).unwrap();
        assert_eq!(file.params.clocks_per_bit(), 6);
        assert_eq!(file.params.inactive_gap_ticks(), 3);

        let s1 = file.bank.get(SlaveIndex::new(1).unwrap());
        assert_eq!(s1.mode(), SpiMode::Mode2);
        assert_eq!(s1.bit_order, BitOrder::LsbFirst);
        assert_eq!(s1.cs_polarity, CsPolarity::ActiveHigh);

        let s7 = file.bank.get(SlaveIndex::new(7).unwrap());
        assert_eq!(s7.mode(), SpiMode::Mode1);
        assert_eq!(s7.bit_order, BitOrder::MsbFirst);
        assert_eq!(s7.cs_polarity, CsPolarity::ActiveLow);

        assert_eq!(file.bank.get(SlaveIndex::new(0).unwrap()), SlaveConfig::POWER_ON);
    }

    #[test]
    fn test_defaults_without_engine_section() {
        let file = BankFile::from_toml_str("").unwrap();
        assert_eq!(file.params, EngineParams::default());
        assert_eq!(file.bank, ConfigBank::new());
    }

    #[test]
    fn test_rejects_bad_values() {
        let odd = "[engine]\nclocks_per_bit = 5\n";
        assert_eq!(BankFile::from_toml_str(odd), Err(Error::ClocksPerBitOdd(5)));

        let index = "[[slave]]\nindex = 8\n";
        assert_eq!(
            BankFile::from_toml_str(index),
            Err(Error::SlaveIndexOutOfRange(8))
        );

        let mode = "[[slave]]\nindex = 0\nmode = 4\n";
        assert_eq!(BankFile::from_toml_str(mode), Err(Error::ModeOutOfRange(4)));

        let dup = "[[slave]]\nindex = 2\n[[slave]]\nindex = 2\n";
        assert_eq!(BankFile::from_toml_str(dup), Err(Error::ConfigParse));
    }

    #[test]
    fn test_render_reparses() {
        let s5 = SlaveIndex::new(5).unwrap();
        let file = BankFile {
            params: EngineParams::new(8, 0).unwrap(),
            bank: ConfigBank::new().with(
                s5,
                SlaveConfig::new(SpiMode::Mode3, BitOrder::LsbFirst, CsPolarity::ActiveHigh),
            ),
        };
        let text = file.to_toml_string().unwrap();
        assert!(text.contains("[[slave]]"));
        assert_eq!(BankFile::from_toml_str(&text).unwrap(), file);
    }
}
