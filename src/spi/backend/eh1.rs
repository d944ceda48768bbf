//! embedded-hal 1.0 SPI backend
//!
//! This backend uses `embedded_hal::spi::SpiBus` (eh1) with an
//! explicit chip-select pin, so the register transport controls the
//! transaction framing itself, plus optional GPIO pins for reset and
//! bring-up clock control.

use embedded_hal::{
    digital::OutputPin,
    spi::SpiBus,
};

use crate::error::Error;
use super::{GpioControl, SpiLink};

/// embedded-hal 1.0 SPI link
///
/// * `SPI` – SPI bus (chip-select handled here, not by the HAL)
/// * `CS`  – Chip-select pin (active low)
/// * `RST` – Optional reset pin (active low)
/// * `CLK` – Optional design-clock pin for bring-up
pub struct Eh1Link<SPI, CS, RST, CLK> {
    spi: SPI,
    cs: CS,
    reset: Option<RST>,
    clock: Option<CLK>,
}

impl<SPI, CS, RST, CLK> Eh1Link<SPI, CS, RST, CLK>
where
    SPI: SpiBus,
    CS: OutputPin,
    RST: OutputPin,
    CLK: OutputPin,
{
    /// Create a new eh1 SPI link
    ///
    /// The chip-select pin should be high (deselected) on entry.
    pub fn new(spi: SPI, cs: CS, reset: Option<RST>, clock: Option<CLK>) -> Self {
        Self { spi, cs, reset, clock }
    }

    /// Release the underlying bus and pins
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS, RST, CLK> SpiLink for Eh1Link<SPI, CS, RST, CLK>
where
    SPI: SpiBus,
    CS: OutputPin,
    RST: OutputPin,
    CLK: OutputPin,
{
    fn select(&mut self) -> Result<(), Error> {
        self.cs.set_low().map_err(|_| Error::Gpio)
    }

    fn deselect(&mut self) -> Result<(), Error> {
        // Drain any buffered words before the frame closes
        self.spi.flush().map_err(|_| Error::Spi)?;
        self.cs.set_high().map_err(|_| Error::Gpio)
    }

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Error> {
        self.spi.transfer(rx, tx).map_err(|_| Error::Spi)
    }

    fn write(&mut self, tx: &[u8]) -> Result<(), Error> {
        self.spi.write(tx).map_err(|_| Error::Spi)
    }
}

impl<SPI, CS, RST, CLK> GpioControl for Eh1Link<SPI, CS, RST, CLK>
where
    SPI: SpiBus,
    CS: OutputPin,
    RST: OutputPin,
    CLK: OutputPin,
{
    fn set_reset(&mut self, asserted: bool) -> Result<(), Error> {
        if let Some(pin) = self.reset.as_mut() {
            if asserted {
                pin.set_low().map_err(|_| Error::Gpio)?;
            } else {
                pin.set_high().map_err(|_| Error::Gpio)?;
            }
        }
        Ok(())
    }

    fn set_clock(&mut self, high: bool) -> Result<(), Error> {
        if let Some(pin) = self.clock.as_mut() {
            if high {
                pin.set_high().map_err(|_| Error::Gpio)?;
            } else {
                pin.set_low().map_err(|_| Error::Gpio)?;
            }
        }
        Ok(())
    }
}
