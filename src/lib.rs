pub mod bringup;
pub mod error;
pub mod spi;

pub use embedded_hal::spi as eh_spi;
pub use error::Error;
pub use spi::backend::{GpioControl, SpiLink};
pub use spi::peripheral::{RegisterTransport, TinyQv};
pub use spi::protocol::commands::{Ctrl, Direction, Register, Width};
#[cfg(feature = "ftdi")]
pub use libftd2xx::{Ft4232h, FtdiCommon};
