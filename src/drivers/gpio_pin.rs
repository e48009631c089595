//! Push-pull GPIO output behind `embedded_hal::digital::OutputPin`.
//!
//! Lets [`SoftPwm`](crate::soft_pwm::SoftPwm) drive the red LED without
//! knowing about ESP-IDF.  Writes go through hw_init, which is a no-op on
//! host builds.  The software PWM tracks the level itself.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::drivers::hw_init;

pub struct GpioPin {
    gpio: i32,
}

impl GpioPin {
    /// The pin must already be configured as an output by hw_init.
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }
}

impl ErrorType for GpioPin {
    type Error = Infallible;
}

impl OutputPin for GpioPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.gpio, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.gpio, true);
        Ok(())
    }
}
