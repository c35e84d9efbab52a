// Licensed under the Apache-2.0 license

//! The TCA9544A control register.
//!
//! The part has a single 8-bit register; any write lands in it and any read
//! returns it.
//!
//! ```text
//!   7     6     5     4     3     2     1     0
//! +-----+-----+-----+-----+-----+-----+-----+-----+
//! | INT3| INT2| INT1| INT0|  -  | EN  |  B1 |  B0 |
//! +-----+-----+-----+-----+-----+-----+-----+-----+
//! ```
//!
//! `EN` connects the channel numbered by `B1:B0`; with `EN` clear no channel is
//! connected. The interrupt bits mirror the `INTn` inputs and are not latched.

use bitfield::bitfield;

/// Number of downstream channels on the part.
pub const CHANNEL_COUNT: usize = 4;

bitfield! {
    #[derive(Copy, Clone, PartialEq, Eq)]
    pub struct ControlRegister(u8);
    impl Debug;
    u8;
    pub channel, set_channel: 1, 0;
    pub enabled, set_enabled: 2;
    pub interrupts, _: 7, 4;
}

impl ControlRegister {
    /// Register value that disconnects every channel.
    pub const DESELECT: Self = Self(0x00);

    /// Register value that connects `index` and disconnects the others.
    ///
    /// Only the low two bits of `index` are used.
    #[must_use]
    pub fn select(index: u8) -> Self {
        let mut reg = Self(0);
        reg.set_enabled(true);
        reg.set_channel(index & 0x3);
        reg
    }

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// The connected channel, or `None` when the mux is disconnected.
    #[must_use]
    pub fn selected_channel(self) -> Option<u8> {
        self.enabled().then(|| self.channel())
    }

    /// Whether the `INTn` input of `index` is asserted.
    #[must_use]
    pub fn interrupt_pending(self, index: u8) -> bool {
        usize::from(index) < CHANNEL_COUNT && self.interrupts() & (1 << index) != 0
    }
}
