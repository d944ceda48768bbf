/// Backend abstraction module - hardware-specific implementations
///
/// This module defines a common trait for the byte-level SPI link and
/// provides implementations for embedded-hal and FTDI hardware.

use crate::error::Error;

pub mod eh1;

#[cfg(feature = "ftdi")]
pub mod ftdi;

/// Byte-level, half-duplex-framed SPI link
///
/// This trait is the protocol's only hardware seam. The register
/// transport owns the transaction framing: it asserts chip-select,
/// shifts the command and data phases, and releases chip-select, all
/// through this trait, so the protocol logic runs unchanged against
/// real hardware or a test double.
///
/// Exclusive ownership of the link while chip-select is held low is
/// expressed through `&mut self`; implementations do not need to
/// guard against interleaved transactions.
pub trait SpiLink {
    /// Assert chip-select (drive the line low), opening a transaction
    fn select(&mut self) -> Result<(), Error>;

    /// Release chip-select, closing the transaction
    fn deselect(&mut self) -> Result<(), Error>;

    /// Full-duplex shift: clock `tx` out while filling `rx`
    ///
    /// `tx` and `rx` must be the same length.
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Error>;

    /// Shift `tx` out, discarding whatever comes back
    fn write(&mut self, tx: &[u8]) -> Result<(), Error>;
}

impl<T: SpiLink + ?Sized> SpiLink for &mut T {
    fn select(&mut self) -> Result<(), Error> {
        T::select(self)
    }

    fn deselect(&mut self) -> Result<(), Error> {
        T::deselect(self)
    }

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Error> {
        T::transfer(self, tx, rx)
    }

    fn write(&mut self, tx: &[u8]) -> Result<(), Error> {
        T::write(self, tx)
    }
}

/// Reset and bring-up clock pin control
///
/// Implementations keep the active-low mapping internal: callers say
/// "reset asserted", the backend drives the RST_N line low.
pub trait GpioControl {
    /// Set reset state (asserted = peripheral held in reset)
    fn set_reset(&mut self, asserted: bool) -> Result<(), Error>;

    /// Drive the peripheral's design clock pin to the given level
    ///
    /// Only used during bring-up, before a free-running clock source
    /// takes over the pin.
    fn set_clock(&mut self, high: bool) -> Result<(), Error>;
}
