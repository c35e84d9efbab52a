// Licensed under the Apache-2.0 license

//! Driver for the TI TCA9544A I2C multiplexer.
//!
//! The TCA9544A fans one upstream I2C bus out to four downstream buses, one of
//! which can be connected at a time. This crate encodes the chip's channel
//! selection protocol on top of a shared, lockable bus:
//!
//! 1. lock the upstream bus and write `0b100 | channel` to the chip,
//! 2. talk to devices on the selected channel,
//! 3. write `0x00` to the chip and unlock the upstream bus.
//!
//! ```rust,ignore
//! use tca9544a::i2c::SharedBus;
//! use tca9544a::tca9544a::Tca9544a;
//!
//! let bus = SharedBus::new(i2c);
//! let mux = Tca9544a::new(&bus);
//!
//! for channel in mux.channels() {
//!     let mut selected = nb::block!(channel.lock())?;
//!     some_sensor::init(&mut selected)?;
//!     selected.release()?;
//! }
//! ```

// Enforce coding guidelines - prevent panic-prone patterns in production code only
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::indexing_slicing))]
#![cfg_attr(not(test), warn(clippy::expect_used))]
#![cfg_attr(not(test), no_std)]
pub mod common;
pub mod i2c;
#[cfg(test)]
mod mock;
pub mod tca9544a;

pub use common::{Logger, NoOpLogger};
pub use i2c::{Error, I2cBus, SharedBus, Tca9544aConfig, Tca9544aConfigBuilder};
pub use tca9544a::{Channel, ControlRegister, SelectedChannel, Tca9544a};
