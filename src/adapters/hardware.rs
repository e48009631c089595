//! Hardware adapter: bridges the LED outputs to the dispatcher's ports.
//!
//! Owns the two LEDC outputs and a reference to the red compare register,
//! exposing them through [`DutyPort`] and [`CompareTimer`].  On non-espidf
//! targets the underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{CompareTimer, DutyPort};
use crate::drivers::hw_pwm::HwPwmOutput;
use crate::drivers::hw_timer;
use crate::fade::channel::LedChannel;
use crate::soft_pwm::CompareRegister;

pub struct HardwareAdapter<'r> {
    green: HwPwmOutput,
    blue: HwPwmOutput,
    red_compare: &'r CompareRegister,
}

impl<'r> HardwareAdapter<'r> {
    pub fn new(green: HwPwmOutput, blue: HwPwmOutput, red_compare: &'r CompareRegister) -> Self {
        Self {
            green,
            blue,
            red_compare,
        }
    }

    /// Last duty written per channel, green/blue/red.
    pub fn duties(&self) -> [u8; LedChannel::COUNT] {
        [self.green.duty(), self.blue.duty(), self.red_compare.read()]
    }
}

// ── DutyPort implementation ───────────────────────────────────

impl DutyPort for HardwareAdapter<'_> {
    fn write_duty(&mut self, channel: LedChannel, duty: u8) {
        match channel {
            LedChannel::Green => self.green.set_duty(duty),
            LedChannel::Blue => self.blue.set_duty(duty),
            LedChannel::Red => self.red_compare.write(duty),
        }
    }
}

// ── CompareTimer implementation ───────────────────────────────

impl CompareTimer for HardwareAdapter<'_> {
    fn arm_compare(&mut self, delay_us: u32, period: u8) {
        hw_timer::arm_compare(delay_us, period);
    }
}
