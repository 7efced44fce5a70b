//! Error types for spimaster-core
//!
//! The engine tick itself never fails: requests and config writes that
//! arrive while the engine is busy are dropped, and a reset is an abort.
//! Errors only come from construction-time validation, from decoding
//! externally supplied values, and from the blocking driver.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Construction errors
    /// `clocks_per_bit` was zero
    ClocksPerBitZero,
    /// `clocks_per_bit` was odd; the half-bit period must be a whole tick count
    ClocksPerBitOdd(u32),

    // Decoding errors
    /// Slave index is not in 0..=7
    SlaveIndexOutOfRange(u8),
    /// Packed configuration value does not fit in 4 bits
    ConfigBitsOutOfRange(u8),
    /// SPI mode number is not in 0..=3
    ModeOutOfRange(u8),

    // Driver errors
    /// The engine did not reach the expected state within the tick budget
    Timeout,

    // Bank file errors
    /// Bank file could not be parsed
    ConfigParse,
    /// I/O error while reading or writing a bank file
    Io,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClocksPerBitZero => write!(f, "clocks per SPI bit must not be zero"),
            Self::ClocksPerBitOdd(n) => {
                write!(f, "clocks per SPI bit must be even, got {}", n)
            }
            Self::SlaveIndexOutOfRange(i) => {
                write!(f, "slave index {} out of range (0-7)", i)
            }
            Self::ConfigBitsOutOfRange(b) => {
                write!(f, "configuration value 0x{:02X} does not fit in 4 bits", b)
            }
            Self::ModeOutOfRange(m) => write!(f, "SPI mode {} out of range (0-3)", m),
            Self::Timeout => write!(f, "engine handshake timed out"),
            Self::ConfigParse => write!(f, "failed to parse bank file"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
