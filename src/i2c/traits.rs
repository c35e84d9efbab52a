// Licensed under the Apache-2.0 license

//! # Shared I2C Bus Abstraction
//!
//! [`I2cBus`] is the capability set the multiplexer driver needs from the bus it
//! sits on. It is deliberately shaped like a *shared* bus rather than an owned
//! one: every method takes `&self`, and exclusive use is negotiated through the
//! non-blocking [`try_lock`](I2cBus::try_lock) / [`unlock`](I2cBus::unlock)
//! pair.
//!
//! ## Implementors
//!
//! ```text
//! I2cBus
//!     ├── SharedBus<I>      (any embedded-hal I2c + lock flag)
//!     └── Channel<'_, B, L> (one TCA9544A downstream port, decorating B)
//! ```
//!
//! Because a multiplexer channel is itself an `I2cBus`, a second multiplexer can
//! be placed behind a channel of the first one.

use crate::i2c::common::ScanResult;
use embedded_hal::i2c::{Operation, SevenBitAddress};

/// Lockable I2C bus shared between several users.
///
/// # Examples
///
/// ```rust
/// use tca9544a::i2c::I2cBus;
///
/// fn read_id<B: I2cBus>(bus: &B) -> nb::Result<u8, B::Error> {
///     if !bus.try_lock()? {
///         return Err(nb::Error::WouldBlock);
///     }
///     let mut id = [0u8; 1];
///     let result = bus.write_read(0x48, &[0x0F], &mut id);
///     bus.unlock()?;
///     result?;
///     Ok(id[0])
/// }
/// ```
pub trait I2cBus {
    /// Bus error; must be usable as an embedded-hal I2C error.
    type Error: embedded_hal::i2c::Error;

    /// Try to take exclusive use of the bus without waiting.
    ///
    /// Returns `Ok(false)` if someone else holds the lock. Implementations that
    /// need to perform I/O while locking (a multiplexer channel selecting
    /// itself) report failures of that I/O as `Err`, in which case the lock is
    /// not held afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus could be locked but the I/O that goes with
    /// it failed.
    fn try_lock(&self) -> Result<bool, Self::Error>;

    /// Give up exclusive use of the bus.
    ///
    /// The lock is released even if the method returns an error.
    ///
    /// # Errors
    ///
    /// Returns an error if I/O performed while unlocking failed.
    fn unlock(&self) -> Result<(), Self::Error>;

    /// Write `bytes` to the device at `address`.
    ///
    /// # Errors
    ///
    /// Propagates the bus error (missing acknowledge, arbitration loss, ...).
    fn write(&self, address: SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Fill `buffer` from the device at `address`.
    ///
    /// # Errors
    ///
    /// Propagates the bus error.
    fn read(&self, address: SevenBitAddress, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `bytes`, then read into `buffer` after a repeated start.
    ///
    /// # Errors
    ///
    /// Propagates the bus error.
    fn write_read(
        &self,
        address: SevenBitAddress,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Run `operations` against `address` as one transaction.
    ///
    /// # Errors
    ///
    /// Propagates the bus error.
    fn transaction(
        &self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error>;

    /// Probe the bus and report every address that acknowledged.
    ///
    /// # Errors
    ///
    /// Propagates bus errors other than a missing acknowledge.
    fn scan(&self) -> Result<ScanResult, Self::Error>;
}
