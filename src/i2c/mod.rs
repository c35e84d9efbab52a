// Licensed under the Apache-2.0 license

//! Shared I2C bus layer.
//!
//! This module defines the [`I2cBus`] capability the multiplexer driver is
//! written against, and [`SharedBus`], which provides it on top of any
//! embedded-hal I2C master.

pub mod common;
pub mod shared_bus;
pub mod traits;

pub use common::{
    Error, ScanResult, Tca9544aConfig, Tca9544aConfigBuilder, DEFAULT_ADDRESS,
    DEFAULT_ADDRESS_8BIT,
};
pub use shared_bus::SharedBus;
pub use traits::I2cBus;
