//! Peripheral reset and clock sequencing
//!
//! Before the first register transaction is valid, the TinyQV design
//! has to be clocked through reset by hand: the design clock pin is
//! toggled while reset is held, then reset is released and a
//! free-running clock source (PWM, out of scope here) takes over the
//! pin. The routine works over [`GpioControl`] and a delay provider,
//! so it runs against any backend or a recording test double.

use embedded_hal::delay::DelayNs;

use crate::error::Error;
use crate::spi::backend::GpioControl;

/// Settle time between pin transitions
pub const SETTLE_US: u32 = 1_000;

/// Clock pulses applied while reset is held
pub const RESET_CLOCK_PULSES: usize = 10;

/// Clock the peripheral through reset
///
/// Leaves the design clock pin low and reset released; the caller
/// hands the clock pin over to its free-running source afterwards.
pub fn reset_sequence<G, D>(gpio: &mut G, delay: &mut D) -> Result<(), Error>
where
    G: GpioControl,
    D: DelayNs,
{
    // Known idle state first
    gpio.set_clock(false)?;
    gpio.set_reset(false)?;
    delay.delay_us(SETTLE_US);

    // Hold reset and clock the design through it
    gpio.set_reset(true)?;
    for _ in 0..RESET_CLOCK_PULSES {
        gpio.set_clock(true)?;
        delay.delay_us(SETTLE_US);
        gpio.set_clock(false)?;
        delay.delay_us(SETTLE_US);
    }

    gpio.set_reset(false)?;
    delay.delay_us(SETTLE_US);
    gpio.set_clock(false)?;

    Ok(())
}

/// Delay provider backed by `std::thread::sleep`, for host-side tools
pub struct SleepDelay;

impl DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
