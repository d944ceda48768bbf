/// Protocol module - hardware-independent TinyQV SPI register protocol
///
/// This module defines the protocol structures and operations without
/// depending on any specific hardware backend (FTDI, embedded-hal, etc.)

pub mod commands;
pub mod transaction;
