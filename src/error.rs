use thiserror::Error as DeriveError;
#[cfg(feature = "ftdi")]
use libftd2xx::{TimeoutError as FtdiTimeout, FtStatus, DeviceTypeError};

#[derive(DeriveError, Debug)]
pub enum Error {
    #[error("Invalid register address {addr:#04X} (valid range 0x00..=0x3F)")]
    InvalidAddress { addr: u8 },

    #[error("SPI transfer failed")]
    Spi,

    #[error("GPIO access failed")]
    Gpio,

    #[cfg(feature = "ftdi")]
    #[error("FTDI Timeout")]
    DeviceTimeout(#[from] FtdiTimeout),

    #[cfg(feature = "ftdi")]
    #[error("FTDI Status: {0}")]
    FtStatus(#[from] FtStatus),

    #[cfg(feature = "ftdi")]
    #[error("FTDI Device Type Error: {0}")]
    DeviceTypeError(#[from] DeviceTypeError),

    #[cfg(feature = "ftdi")]
    #[error("Invalid GPIO state")]
    InvalidGpioState,

    #[cfg(feature = "ftdi")]
    #[error("Invalid pin mask (must be single bit)")]
    InvalidPinMask,
}
