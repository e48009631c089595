//! Hardware-PWM LED output (green and blue).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LEDC duty register via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

pub struct HwPwmOutput {
    ledc_channel: u32,
    duty: u8,
}

impl HwPwmOutput {
    pub fn new(ledc_channel: u32) -> Self {
        Self {
            ledc_channel,
            duty: 0,
        }
    }

    /// Write an 8-bit duty.  The LEDC comparator does the rest.
    pub fn set_duty(&mut self, duty: u8) {
        hw_init::ledc_set(self.ledc_channel, duty);
        self.duty = duty;
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }

    pub fn ledc_channel(&self) -> u32 {
        self.ledc_channel
    }
}
