// Licensed under the Apache-2.0 license

//! Downstream channel proxy.
//!
//! A [`Channel`] stands in for one of the four buses behind the multiplexer.
//! It implements [`I2cBus`] by decorating the upstream bus: locking the channel
//! locks the upstream bus and writes the select byte, unlocking writes the
//! deselect byte and unlocks the upstream bus. Transfers in between go straight
//! through, except that the multiplexer's own address is refused.
//!
//! [`Channel::lock`] wraps the same protocol in a guard that implements
//! `embedded_hal::i2c::I2c`, so ordinary device drivers can be handed a
//! channel.

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{Error, ScanResult};
use crate::i2c::traits::I2cBus;
use crate::tca9544a::register::ControlRegister;
use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};

pub struct Channel<'a, B: I2cBus, L: Logger = NoOpLogger> {
    bus: &'a B,
    mux_address: SevenBitAddress,
    index: u8,
    select: ControlRegister,
    logger: L,
}

impl<'a, B: I2cBus, L: Logger> Channel<'a, B, L> {
    pub(crate) fn new(bus: &'a B, mux_address: SevenBitAddress, index: u8, logger: L) -> Self {
        Self {
            bus,
            mux_address,
            index,
            select: ControlRegister::select(index),
            logger,
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn mux_address(&self) -> SevenBitAddress {
        self.mux_address
    }

    /// Control byte written to connect this channel.
    pub fn select_byte(&self) -> u8 {
        self.select.bits()
    }

    /// Lock the upstream bus and connect this channel.
    ///
    /// Never waits: if the upstream lock is taken this returns
    /// `nb::Error::WouldBlock` without touching the bus, and the caller decides
    /// whether to retry (`nb::block!` spins). Every successful call must be
    /// paired with [`release`](Self::release), otherwise the multiplexer stays
    /// connected to this channel and the upstream bus stays locked.
    ///
    /// # Errors
    ///
    /// Returns `Error::Bus` if the select write fails. The upstream lock has
    /// been released again in that case.
    pub fn acquire(&self) -> nb::Result<(), Error<B::Error>> {
        if !self.bus.try_lock().map_err(Error::Bus)? {
            self.logger.debug(format_args!(
                "tca9544a@{:#04x}: channel {} busy",
                self.mux_address, self.index
            ));
            return Err(nb::Error::WouldBlock);
        }

        if let Err(err) = self.bus.write(self.mux_address, &[self.select.bits()]) {
            // Select failed; hand the bus back so nobody is locked out.
            let _ = self.bus.unlock();
            self.logger.error(format_args!(
                "tca9544a@{:#04x}: select of channel {} failed",
                self.mux_address, self.index
            ));
            return Err(nb::Error::Other(Error::Bus(err)));
        }

        self.logger.debug(format_args!(
            "tca9544a@{:#04x}: channel {} selected ({:#04x})",
            self.mux_address,
            self.index,
            self.select.bits()
        ));
        Ok(())
    }

    /// Disconnect all channels and unlock the upstream bus.
    ///
    /// The upstream lock is released even if the deselect write fails.
    ///
    /// # Errors
    ///
    /// Returns the deselect write error, or else the upstream unlock error.
    pub fn release(&self) -> Result<(), Error<B::Error>> {
        let deselect = self
            .bus
            .write(self.mux_address, &[ControlRegister::DESELECT.bits()]);
        let unlock = self.bus.unlock();

        self.logger.debug(format_args!(
            "tca9544a@{:#04x}: channel {} released",
            self.mux_address, self.index
        ));
        deselect?;
        unlock?;
        Ok(())
    }

    /// [`acquire`](Self::acquire) returning a guard that releases on drop.
    ///
    /// # Errors
    ///
    /// Same as [`acquire`](Self::acquire).
    pub fn lock(&self) -> nb::Result<SelectedChannel<'_, 'a, B, L>, Error<B::Error>> {
        self.acquire()?;
        Ok(SelectedChannel { channel: self })
    }

    fn check_target(&self, address: SevenBitAddress) -> Result<(), Error<B::Error>> {
        if address == self.mux_address {
            self.logger.error(format_args!(
                "tca9544a@{:#04x}: refusing transfer to the multiplexer on channel {}",
                self.mux_address, self.index
            ));
            return Err(Error::MuxAddress(address));
        }
        Ok(())
    }
}

impl<B: I2cBus, L: Logger> I2cBus for Channel<'_, B, L> {
    type Error = Error<B::Error>;

    fn try_lock(&self) -> Result<bool, Self::Error> {
        match self.acquire() {
            Ok(()) => Ok(true),
            Err(nb::Error::WouldBlock) => Ok(false),
            Err(nb::Error::Other(err)) => Err(err),
        }
    }

    fn unlock(&self) -> Result<(), Self::Error> {
        self.release()
    }

    fn write(&self, address: SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error> {
        self.check_target(address)?;
        Ok(self.bus.write(address, bytes)?)
    }

    fn read(&self, address: SevenBitAddress, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.check_target(address)?;
        Ok(self.bus.read(address, buffer)?)
    }

    fn write_read(
        &self,
        address: SevenBitAddress,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.check_target(address)?;
        Ok(self.bus.write_read(address, bytes, buffer)?)
    }

    fn transaction(
        &self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.check_target(address)?;
        Ok(self.bus.transaction(address, operations)?)
    }

    /// Only devices on the connected channel (and the multiplexer itself)
    /// answer, so this is meaningful only while the channel is locked.
    fn scan(&self) -> Result<ScanResult, Self::Error> {
        Ok(self.bus.scan()?)
    }
}

/// A locked, connected channel.
///
/// Implements `embedded_hal::i2c::I2c` for downstream device drivers. Dropping
/// the guard deselects the channel and unlocks the upstream bus; use
/// [`release`](Self::release) to observe the result of that.
pub struct SelectedChannel<'c, 'a, B: I2cBus, L: Logger = NoOpLogger> {
    channel: &'c Channel<'a, B, L>,
}

impl<'c, 'a, B: I2cBus, L: Logger> SelectedChannel<'c, 'a, B, L> {
    pub fn channel(&self) -> &'c Channel<'a, B, L> {
        self.channel
    }

    /// Deselect and unlock now, reporting the outcome.
    ///
    /// # Errors
    ///
    /// Same as [`Channel::release`].
    pub fn release(self) -> Result<(), Error<B::Error>> {
        let channel = self.channel;
        core::mem::forget(self);
        channel.release()
    }
}

impl<B: I2cBus, L: Logger> Drop for SelectedChannel<'_, '_, B, L> {
    fn drop(&mut self) {
        if self.channel.release().is_err() {
            self.channel.logger.error(format_args!(
                "tca9544a@{:#04x}: deselect of channel {} failed on drop",
                self.channel.mux_address, self.channel.index
            ));
        }
    }
}

impl<B: I2cBus, L: Logger> ErrorType for SelectedChannel<'_, '_, B, L> {
    type Error = Error<B::Error>;
}

impl<B: I2cBus, L: Logger> I2c for SelectedChannel<'_, '_, B, L> {
    fn read(&mut self, address: SevenBitAddress, read: &mut [u8]) -> Result<(), Self::Error> {
        I2cBus::read(self.channel, address, read)
    }

    fn write(&mut self, address: SevenBitAddress, write: &[u8]) -> Result<(), Self::Error> {
        I2cBus::write(self.channel, address, write)
    }

    fn write_read(
        &mut self,
        address: SevenBitAddress,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        I2cBus::write_read(self.channel, address, write, read)
    }

    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        I2cBus::transaction(self.channel, address, operations)
    }
}
