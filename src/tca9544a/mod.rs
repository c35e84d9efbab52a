// Licensed under the Apache-2.0 license

//! TCA9544A 4-channel I2C multiplexer.
//!
//! The chip sits on an upstream bus at a 7-bit address in `0x70..=0x77` and
//! connects at most one of its four downstream buses at a time. Selecting a
//! channel is a single control-byte write to the chip; so is disconnecting.
//!
//! - [`Tca9544a`]: the chip, owning a lazily built cache of channel proxies
//! - [`Channel`]: one downstream bus, usable anywhere an [`I2cBus`] is
//! - [`SelectedChannel`]: a locked channel that speaks embedded-hal
//! - [`ControlRegister`]: the chip's only register
//!
//! [`I2cBus`]: crate::i2c::I2cBus

pub mod channel;
pub mod mux;
pub mod register;

pub use channel::{Channel, SelectedChannel};
pub use mux::Tca9544a;
pub use register::{ControlRegister, CHANNEL_COUNT};
