// Licensed under the Apache-2.0 license

//! Multiplexer handle.

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{Error, ScanResult, Tca9544aConfig};
use crate::i2c::traits::I2cBus;
use crate::tca9544a::channel::Channel;
use crate::tca9544a::register::{ControlRegister, CHANNEL_COUNT};
use core::cell::OnceCell;
use embedded_hal::i2c::SevenBitAddress;

/// One TCA9544A on a shared upstream bus.
///
/// Channels are created on first use and cached, so
/// [`channel`](Self::channel) hands out the same proxy for a given index for
/// the lifetime of the handle.
///
/// # Examples
///
/// ```rust,ignore
/// let bus = SharedBus::new(i2c);
/// let mux = Tca9544a::new(&bus);
///
/// let sensor_bus = mux.channel(2)?;
/// let mut selected = nb::block!(sensor_bus.lock())?;
/// selected.write_read(0x29, &[0xA0], &mut id)?;
/// selected.release()?;
/// ```
pub struct Tca9544a<'a, B: I2cBus, L: Logger = NoOpLogger> {
    bus: &'a B,
    address: SevenBitAddress,
    channels: [OnceCell<Channel<'a, B, L>>; CHANNEL_COUNT],
    logger: L,
}

impl<'a, B: I2cBus> Tca9544a<'a, B> {
    /// Handle at the default address `0x70`.
    pub fn new(bus: &'a B) -> Self {
        Self::with_config(bus, Tca9544aConfig::default(), NoOpLogger)
    }
}

impl<'a, B: I2cBus, L: Logger + Clone> Tca9544a<'a, B, L> {
    pub fn with_config(bus: &'a B, config: Tca9544aConfig, logger: L) -> Self {
        Self {
            bus,
            address: config.address,
            channels: Default::default(),
            logger,
        }
    }

    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    pub const fn channel_count(&self) -> usize {
        CHANNEL_COUNT
    }

    /// Proxy for downstream channel `index` (`0..=3`).
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidChannel` for any other index.
    pub fn channel(&self, index: u8) -> Result<&Channel<'a, B, L>, Error<B::Error>> {
        let slot = self
            .channels
            .get(usize::from(index))
            .ok_or(Error::InvalidChannel(index))?;
        Ok(self.cached(slot, index))
    }

    /// All four channel proxies in index order.
    pub fn channels(&self) -> impl Iterator<Item = &Channel<'a, B, L>> + '_ {
        self.channels
            .iter()
            .zip(0u8..)
            .map(move |(slot, index)| self.cached(slot, index))
    }

    fn cached<'s>(
        &'s self,
        slot: &'s OnceCell<Channel<'a, B, L>>,
        index: u8,
    ) -> &'s Channel<'a, B, L> {
        slot.get_or_init(|| Channel::new(self.bus, self.address, index, self.logger.clone()))
    }

    /// Read the control register.
    ///
    /// Takes the upstream lock for the duration of the one-byte read. Returns
    /// `nb::Error::WouldBlock` without I/O if the lock is held elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `Error::Bus` if the read or the unlock fails. The lock is
    /// released either way.
    pub fn control_register(&self) -> nb::Result<ControlRegister, Error<B::Error>> {
        if !self.bus.try_lock().map_err(Error::Bus)? {
            return Err(nb::Error::WouldBlock);
        }

        let mut buf = [0u8; 1];
        let read = self.bus.read(self.address, &mut buf);
        let unlock = self.bus.unlock();
        read.map_err(Error::Bus)?;
        unlock.map_err(Error::Bus)?;

        let [bits] = buf;
        self.logger.debug(format_args!(
            "tca9544a@{:#04x}: control {:#04x}",
            self.address, bits
        ));
        Ok(ControlRegister::from_bits(bits))
    }

    /// Pending interrupts as a 4-bit mask, bit `n` for channel `n`.
    ///
    /// The chip has no interrupt mask and does not latch; each call reports
    /// the current level of the `INTn` inputs.
    ///
    /// # Errors
    ///
    /// Same as [`control_register`](Self::control_register).
    pub fn interrupt_status(&self) -> nb::Result<u8, Error<B::Error>> {
        Ok(self.control_register()?.interrupts())
    }

    /// Scan every channel in turn.
    ///
    /// The multiplexer acknowledges its own address on all channels, so that
    /// address is left out of the results.
    ///
    /// # Errors
    ///
    /// `nb::Error::WouldBlock` if a channel could not be locked; bus errors
    /// from selecting, scanning or deselecting otherwise.
    pub fn scan_channels(&self) -> nb::Result<[ScanResult; CHANNEL_COUNT], Error<B::Error>> {
        let mut results: [ScanResult; CHANNEL_COUNT] = Default::default();

        for (channel, found) in self.channels().zip(results.iter_mut()) {
            let selected = channel.lock()?;
            let scanned = I2cBus::scan(channel);
            selected.release()?;

            *found = scanned?;
            found.retain(|&address| address != self.address);
        }
        Ok(results)
    }
}
