// Licensed under the Apache-2.0 license

//! Recording bus used by the unit tests.
//!
//! Every lock, unlock and transfer is appended to an event log so tests can
//! assert on the exact order of bus traffic.

use crate::i2c::common::ScanResult;
use crate::i2c::traits::I2cBus;
use core::cell::{Cell, RefCell};
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource, Operation, SevenBitAddress};
use std::vec::Vec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BusEvent {
    Lock,
    Unlock,
    Write(SevenBitAddress, Vec<u8>),
    Read(SevenBitAddress, usize),
    WriteRead(SevenBitAddress, Vec<u8>, usize),
    Transaction(SevenBitAddress, usize),
    Scan,
}

#[derive(Default)]
pub struct RecordingBus {
    events: RefCell<Vec<BusEvent>>,
    locked: Cell<bool>,
    read_byte: Cell<u8>,
    failing_address: Cell<Option<SevenBitAddress>>,
    devices: Vec<SevenBitAddress>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus on which `devices` answer a scan.
    pub fn with_devices(devices: &[SevenBitAddress]) -> Self {
        Self {
            devices: devices.to_vec(),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    /// Pretend another user holds the lock.
    pub fn hold_lock(&self) {
        self.locked.set(true);
    }

    /// Byte every read returns.
    pub fn set_read_byte(&self, byte: u8) {
        self.read_byte.set(byte);
    }

    /// Make transfers to `address` fail with a missing acknowledge.
    pub fn fail_transfers_to(&self, address: Option<SevenBitAddress>) {
        self.failing_address.set(address);
    }

    fn record(&self, event: BusEvent) {
        self.events.borrow_mut().push(event);
    }

    fn check(&self, address: SevenBitAddress) -> Result<(), ErrorKind> {
        if self.failing_address.get() == Some(address) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        Ok(())
    }
}

impl I2cBus for RecordingBus {
    type Error = ErrorKind;

    fn try_lock(&self) -> Result<bool, Self::Error> {
        if self.locked.replace(true) {
            return Ok(false);
        }
        self.record(BusEvent::Lock);
        Ok(true)
    }

    fn unlock(&self) -> Result<(), Self::Error> {
        self.locked.set(false);
        self.record(BusEvent::Unlock);
        Ok(())
    }

    fn write(&self, address: SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error> {
        self.record(BusEvent::Write(address, bytes.to_vec()));
        self.check(address)
    }

    fn read(&self, address: SevenBitAddress, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.record(BusEvent::Read(address, buffer.len()));
        self.check(address)?;
        buffer.fill(self.read_byte.get());
        Ok(())
    }

    fn write_read(
        &self,
        address: SevenBitAddress,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.record(BusEvent::WriteRead(address, bytes.to_vec(), buffer.len()));
        self.check(address)?;
        buffer.fill(self.read_byte.get());
        Ok(())
    }

    fn transaction(
        &self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.record(BusEvent::Transaction(address, operations.len()));
        self.check(address)
    }

    fn scan(&self) -> Result<ScanResult, Self::Error> {
        self.record(BusEvent::Scan);
        Ok(self.devices.iter().copied().collect())
    }
}
