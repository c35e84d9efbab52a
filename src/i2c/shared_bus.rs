// Licensed under the Apache-2.0 license

//! Lockable wrapper turning an embedded-hal I2C master into an [`I2cBus`].
//!
//! embedded-hal 1.0 models a bus as an exclusively owned `&mut` resource. The
//! multiplexer driver instead needs a bus that the handle and all four channels
//! can reference at once, with a non-blocking lock deciding who may talk. This
//! adapter supplies that: the wrapped controller sits in a `RefCell`, and a
//! `Cell<bool>` acts as the lock.
//!
//! The adapter is single-threaded (`!Sync`). It does not stop a caller from
//! issuing transfers without holding the lock; the lock only arbitrates between
//! cooperating users.

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{ScanResult, SCAN_FIRST_ADDRESS, SCAN_LAST_ADDRESS};
use crate::i2c::traits::I2cBus;
use core::cell::{Cell, RefCell};
use embedded_hal::i2c::{Error as _, ErrorKind, I2c, Operation, SevenBitAddress};

pub struct SharedBus<I: I2c, L: Logger = NoOpLogger> {
    i2c: RefCell<I>,
    locked: Cell<bool>,
    logger: L,
}

impl<I: I2c> SharedBus<I> {
    pub fn new(i2c: I) -> Self {
        Self::with_logger(i2c, NoOpLogger)
    }
}

impl<I: I2c, L: Logger> SharedBus<I, L> {
    pub fn with_logger(i2c: I, logger: L) -> Self {
        Self {
            i2c: RefCell::new(i2c),
            locked: Cell::new(false),
            logger,
        }
    }

    /// Whether some user currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    /// Give back the wrapped controller.
    pub fn into_inner(self) -> I {
        self.i2c.into_inner()
    }
}

impl<I: I2c, L: Logger> I2cBus for SharedBus<I, L> {
    type Error = I::Error;

    fn try_lock(&self) -> Result<bool, Self::Error> {
        if self.locked.replace(true) {
            self.logger.debug(format_args!("i2c: bus busy"));
            return Ok(false);
        }
        Ok(true)
    }

    fn unlock(&self) -> Result<(), Self::Error> {
        self.locked.set(false);
        Ok(())
    }

    fn write(&self, address: SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.borrow_mut().write(address, bytes)
    }

    fn read(&self, address: SevenBitAddress, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.borrow_mut().read(address, buffer)
    }

    fn write_read(
        &self,
        address: SevenBitAddress,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.borrow_mut().write_read(address, bytes, buffer)
    }

    fn transaction(
        &self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.i2c.borrow_mut().transaction(address, operations)
    }

    fn scan(&self) -> Result<ScanResult, Self::Error> {
        let mut i2c = self.i2c.borrow_mut();
        let mut found = ScanResult::new();
        for address in SCAN_FIRST_ADDRESS..=SCAN_LAST_ADDRESS {
            match i2c.write(address, &[]) {
                Ok(()) => {
                    if found.push(address).is_err() {
                        break;
                    }
                }
                Err(err) if matches!(err.kind(), ErrorKind::NoAcknowledge(_)) => {}
                Err(err) => {
                    self.logger
                        .error(format_args!("i2c: scan aborted at {address:#04x}"));
                    return Err(err);
                }
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorType, NoAcknowledgeSource};
    use std::vec::Vec;

    /// Controller with a fixed set of devices that acknowledge their address.
    struct MockI2c {
        present: Vec<u8>,
        writes: Vec<(u8, Vec<u8>)>,
        fail_at: Option<u8>,
    }

    impl MockI2c {
        fn with_devices(present: &[u8]) -> Self {
            Self {
                present: present.to_vec(),
                writes: Vec::new(),
                fail_at: None,
            }
        }
    }

    impl ErrorType for MockI2c {
        type Error = ErrorKind;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail_at == Some(address) {
                return Err(ErrorKind::ArbitrationLoss);
            }
            if !self.present.contains(&address) {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(data) => self.writes.push((address, data.to_vec())),
                    Operation::Read(buf) => buf.fill(address),
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_lock_is_exclusive() {
        let bus = SharedBus::new(MockI2c::with_devices(&[]));

        assert_eq!(bus.try_lock(), Ok(true));
        assert!(bus.is_locked());
        assert_eq!(bus.try_lock(), Ok(false));

        assert!(bus.unlock().is_ok());
        assert!(!bus.is_locked());
        assert_eq!(bus.try_lock(), Ok(true));
    }

    #[test]
    fn test_transfers_forward_to_controller() {
        let bus = SharedBus::new(MockI2c::with_devices(&[0x48]));

        assert!(bus.write(0x48, &[0x01, 0x02]).is_ok());
        let mut buf = [0u8; 2];
        assert!(bus.write_read(0x48, &[0x0F], &mut buf).is_ok());
        assert_eq!(buf, [0x48, 0x48]);
        assert_eq!(
            bus.read(0x49, &mut buf),
            Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
        );

        let mock = bus.into_inner();
        assert_eq!(mock.writes, [(0x48, vec![0x01, 0x02]), (0x48, vec![0x0F])]);
    }

    #[test]
    fn test_scan_reports_acknowledging_devices() {
        let bus = SharedBus::new(MockI2c::with_devices(&[0x03, 0x1B, 0x3C, 0x70, 0x7A]));

        let found = bus.scan().unwrap();

        // Reserved addresses are never probed.
        assert_eq!(found.as_slice(), &[0x1B, 0x3C, 0x70]);
    }

    #[test]
    fn test_scan_aborts_on_bus_fault() {
        let mut mock = MockI2c::with_devices(&[0x1B]);
        mock.fail_at = Some(0x20);
        let bus = SharedBus::new(mock);

        assert_eq!(bus.scan(), Err(ErrorKind::ArbitrationLoss));
    }
}
