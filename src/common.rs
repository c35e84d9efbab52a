// Licensed under the Apache-2.0 license

//! Logging hooks shared by the bus adapter and the multiplexer driver.
//!
//! Drivers take a `L: Logger` type parameter that defaults to [`NoOpLogger`], so
//! builds that do not care about diagnostics pay nothing for them. Boards that
//! have a UART or RTT channel plug in their own implementation.

use core::fmt;

/// Sink for driver diagnostics.
///
/// Receivers take `&self` because loggers are shared by the multiplexer handle
/// and every channel it hands out. Implementations needing mutation should use
/// interior mutability.
pub trait Logger {
    /// Protocol-level trace: select/deselect writes, lock contention.
    fn debug(&self, args: fmt::Arguments<'_>);

    /// Something the caller should know about but that was not returned as an
    /// error (for example a failed deselect during `Drop`).
    fn error(&self, args: fmt::Arguments<'_>);
}

/// Logger that discards everything.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    #[inline]
    fn debug(&self, _args: fmt::Arguments<'_>) {}

    #[inline]
    fn error(&self, _args: fmt::Arguments<'_>) {}
}

impl<T: Logger + ?Sized> Logger for &T {
    fn debug(&self, args: fmt::Arguments<'_>) {
        (**self).debug(args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        (**self).error(args);
    }
}
