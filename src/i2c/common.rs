// Licensed under the Apache-2.0 license

//! Common types and constants for the I2C bus layer and the TCA9544A driver.
//!
//! This module provides the shared error type, scan result container and the
//! multiplexer configuration builder.

use core::fmt;
use embedded_hal::i2c::{ErrorKind, SevenBitAddress};

/// Lowest address probed by a bus scan (0x00-0x07 are reserved).
pub const SCAN_FIRST_ADDRESS: SevenBitAddress = 0x08;
/// Highest address probed by a bus scan (0x78-0x7F are reserved).
pub const SCAN_LAST_ADDRESS: SevenBitAddress = 0x77;
/// Number of addresses a scan can report.
pub const SCAN_CAPACITY: usize = (SCAN_LAST_ADDRESS - SCAN_FIRST_ADDRESS + 1) as usize;

/// Addresses that acknowledged during a scan, in ascending order.
pub type ScanResult = heapless::Vec<SevenBitAddress, SCAN_CAPACITY>;

/// 7-bit base address of the TCA9544A with A2..A0 tied low.
pub const DEFAULT_ADDRESS: SevenBitAddress = 0x70;
/// The default address in 8-bit (write address) notation, as some vendor
/// material lists it.
pub const DEFAULT_ADDRESS_8BIT: u8 = 0xE0;

/// Errors returned by the multiplexer driver.
///
/// `E` is the upstream bus error, passed through untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Channel index outside `0..=3`.
    InvalidChannel(u8),
    /// A forwarded transfer targeted the multiplexer's own address.
    MuxAddress(SevenBitAddress),
    /// Error raised by the upstream bus.
    Bus(E),
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Error::Bus(err)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidChannel(index) => {
                write!(f, "channel must be in the range 0-3, got {index}")
            }
            Error::MuxAddress(address) => write!(
                f,
                "device address {address:#04x} must differ from the multiplexer address"
            ),
            Error::Bus(err) => write!(f, "upstream bus error: {err:?}"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}

impl<E: embedded_hal::i2c::Error> embedded_hal::i2c::Error for Error<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidChannel(_) | Error::MuxAddress(_) => ErrorKind::Other,
            Error::Bus(err) => err.kind(),
        }
    }
}

/// Construction-time settings for a [`Tca9544a`](crate::tca9544a::Tca9544a).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tca9544aConfig {
    pub address: SevenBitAddress,
}

impl Default for Tca9544aConfig {
    fn default() -> Self {
        Tca9544aConfigBuilder::new().build()
    }
}

pub struct Tca9544aConfigBuilder {
    address: SevenBitAddress,
}

impl Default for Tca9544aConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Tca9544aConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
        }
    }
    /// Raw 7-bit address.
    #[must_use]
    pub fn address(mut self, address: SevenBitAddress) -> Self {
        self.address = address;
        self
    }
    /// Address selected by the A2..A0 strap pins (`0x70..=0x77`).
    #[must_use]
    pub fn hardware_address(mut self, pins: u8) -> Self {
        self.address = DEFAULT_ADDRESS | (pins & 0x7);
        self
    }
    /// Address given in 8-bit notation, e.g. `0xE0`.
    #[must_use]
    pub fn eight_bit_address(mut self, address: u8) -> Self {
        self.address = address >> 1;
        self
    }
    #[must_use]
    pub fn build(self) -> Tca9544aConfig {
        Tca9544aConfig {
            address: self.address,
        }
    }
}
