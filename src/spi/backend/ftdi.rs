/// FTDI backend implementation using libftd2xx
///
/// This backend provides direct FTDI MPSSE access for driving the
/// TinyQV test board from a host PC.

use std::time::Duration;
use libftd2xx::{
    ClockData, ClockDataOut, Ft4232h, FtdiCommon, FtdiMpsse, MpsseCmdBuilder, MpsseCmdExecutor,
};
use bitflags::bitflags;

use crate::error::Error;
use super::{GpioControl, SpiLink};

/*
Pin assignments on FTDI FT4232H:
SPI_CLK:   AD0
SPI_MOSI:  AD1
SPI_MISO:  AD2
SPI_SS_N:  AD3
FPGA_CLK:  AD6  (manual design clock during bring-up)
FPGA_RST_N: AD7
*/

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct SpiPin: u8 {
        const CLK =      1;          // Mask 0x01, AD0
        const MOSI =     1 << 1;     // Mask 0x02, AD1
        const MISO =     1 << 2;     // Mask 0x04, AD2
        const SS_N =     1 << 3;     // Mask 0x08, AD3
        const FPGA_CLK = 1 << 6;     // Mask 0x40, AD6
        const RST_N =    1 << 7;     // Mask 0x80, AD7
    }
}

/// SPI clock frequency once the peripheral is out of reset
const SPI_CLOCK_HZ: u32 = 1_000_000;

/// FTDI SPI link
pub struct FtdiLink {
    dev: Ft4232h,
}

impl FtdiLink {
    /// Create a new FTDI link with the specified device
    pub fn new(dev: Ft4232h) -> Self {
        Self { dev }
    }

    /// Open FTDI device by description
    pub fn open(description: &str) -> Result<Self, Error> {
        let dev = Ft4232h::with_description(description)?;
        Ok(Self::new(dev))
    }

    /// Get pin direction configuration (which pins are outputs)
    fn pin_directions() -> SpiPin {
        SpiPin::CLK | SpiPin::MOSI | SpiPin::SS_N | SpiPin::FPGA_CLK | SpiPin::RST_N
    }

    /// Read current GPIO state
    fn get_data_bits(&mut self) -> Result<SpiPin, Error> {
        let bits = self.dev.gpio_lower()?;
        SpiPin::from_bits(bits).ok_or(Error::InvalidGpioState)
    }

    /// Set GPIO pins to specific absolute state
    fn set_data_bits_absolute(&mut self, state: SpiPin) -> Result<(), Error> {
        self.dev.set_gpio_lower(state.bits(), Self::pin_directions().bits())?;
        self.dev.set_gpio_upper(SpiPin::empty().bits(), SpiPin::empty().bits())?;
        Ok(())
    }

    /// Helper to set/clear specific bits
    fn set_data_bits_single(current_bits: SpiPin, target_bits: SpiPin, high: bool) -> Result<SpiPin, Error> {
        if target_bits.bits().count_ones() != 1 {
            return Err(Error::InvalidPinMask);
        }

        let bits_set = if high {
            current_bits | target_bits
        } else {
            current_bits & !target_bits
        };

        Ok(bits_set)
    }

    /// Set a single pin high or low
    fn set_single_pin(&mut self, target_pin: SpiPin, high: bool) -> Result<(), Error> {
        let current = self.get_data_bits()?;
        let updated = Self::set_data_bits_single(current, target_pin, high)?;
        self.dev.set_gpio_lower(updated.bits(), Self::pin_directions().bits())?;
        Ok(())
    }

    /// Initialize the MPSSE engine and park the pins
    ///
    /// Leaves SS_N and RST_N high, FPGA_CLK low; must run before the
    /// first transaction or bring-up sequence.
    pub fn initialize(&mut self) -> Result<(), Error> {
        // Set MPSSE mode
        self.dev.set_bit_mode(0x0, libftd2xx::BitMode::Mpsse)?;

        // Set latency timer
        self.dev.set_latency_timer(Duration::from_millis(2))?;

        // Set initial GPIO state: SS_N=HIGH, RST_N=HIGH, FPGA_CLK=LOW
        self.set_data_bits_absolute(SpiPin::SS_N | SpiPin::RST_N)?;

        // Setup clock frequency
        self.dev.set_clock(SPI_CLOCK_HZ)?;

        Ok(())
    }
}

impl GpioControl for FtdiLink {
    fn set_reset(&mut self, asserted: bool) -> Result<(), Error> {
        // RST_N is active low, so asserted=true means pin=low
        self.set_single_pin(SpiPin::RST_N, !asserted)
    }

    fn set_clock(&mut self, high: bool) -> Result<(), Error> {
        self.set_single_pin(SpiPin::FPGA_CLK, high)
    }
}

impl SpiLink for FtdiLink {
    fn select(&mut self) -> Result<(), Error> {
        // SS_N is active low
        self.set_single_pin(SpiPin::SS_N, false)
    }

    fn deselect(&mut self) -> Result<(), Error> {
        self.set_single_pin(SpiPin::SS_N, true)
    }

    fn write(&mut self, tx: &[u8]) -> Result<(), Error> {
        // MSB first, data out on the falling edge (SPI mode 0)
        let builder = MpsseCmdBuilder::new().clock_data_out(ClockDataOut::MsbNeg, tx);
        self.dev.send(builder.as_slice())?;
        Ok(())
    }

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Error> {
        // MSB first, out on the falling edge, sample on the rising edge
        let builder = MpsseCmdBuilder::new()
            .clock_data(ClockData::MsbPosIn, tx)
            .send_immediate();
        self.dev.send(builder.as_slice())?;
        self.dev.recv(rx)?;
        Ok(())
    }
}
