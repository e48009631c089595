//! Software PWM for the red LED.
//!
//! The red LED sits on a pin with no comparator output, so its duty cycle
//! is produced by two timer events per PWM period:
//!
//! ```text
//!  count:   0 ........ threshold ........ 255 | 0 ...
//!  event:   period-start   compare-match      | period-start
//!  pin:     HIGH ─────────┐                   ┌────
//!                         └─── LOW ───────────┘
//! ```
//!
//! The threshold is the red channel's brightness.  The fade driver writes
//! it into a [`CompareRegister`]; each period-start latches the register so
//! one period never sees two thresholds.
//!
//! At threshold 0 the HIGH phase collapses to nothing, and at 255 the LOW
//! phase is a single count.

use core::sync::atomic::{AtomicU8, Ordering};

use embedded_hal::digital::OutputPin;

/// Counts per PWM period of the emulated 8-bit counter (0..=255).
pub const COUNTER_STEPS: u32 = 256;

/// Compare threshold shared between the fade context (writer) and the
/// PWM context (reader).
///
/// The two contexts are independent timer events and neither may block.
#[derive(Debug)]
pub struct CompareRegister(AtomicU8);

impl CompareRegister {
    pub const fn new(value: u8) -> Self {
        Self(AtomicU8::new(value))
    }

    pub fn write(&self, value: u8) {
        self.0.store(value, Ordering::Relaxed);
    }

    pub fn read(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Electrical state of the software-driven pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    High,
    Low,
}

/// Two-state PWM generator: period-start → HIGH, compare-match → LOW.
pub struct SoftPwm<'r, P> {
    pin: P,
    compare: &'r CompareRegister,
    level: OutputLevel,
    threshold: u8,
}

impl<'r, P: OutputPin> SoftPwm<'r, P> {
    /// The pin is assumed LOW (LED off) until the first period-start.
    pub fn new(pin: P, compare: &'r CompareRegister) -> Self {
        Self {
            pin,
            compare,
            level: OutputLevel::Low,
            threshold: 0,
        }
    }

    /// Energise the LED and latch this period's compare threshold.
    pub fn on_period_start(&mut self) -> Result<u8, P::Error> {
        self.pin.set_high()?;
        self.level = OutputLevel::High;
        self.threshold = self.compare.read();
        Ok(self.threshold)
    }

    /// De-energise the LED until the next period-start.
    pub fn on_compare_match(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()?;
        self.level = OutputLevel::Low;
        Ok(())
    }

    pub fn level(&self) -> OutputLevel {
        self.level
    }

    pub fn is_energized(&self) -> bool {
        self.level == OutputLevel::High
    }

    /// Threshold latched by the most recent period-start.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}

/// Delay from period-start to compare-match for `threshold` within a
/// period of `period_us`.
pub const fn compare_delay_us(threshold: u8, period_us: u32) -> u32 {
    (threshold as u64 * period_us as u64 / COUNTER_STEPS as u64) as u32
}

/// Delay still to wait for a compare `delay_us` after period-start when
/// `elapsed_us` of the period have already passed.
///
/// Never zero: a compare that is already due fires after one microsecond.
pub const fn remaining_delay_us(delay_us: u32, elapsed_us: u32) -> u32 {
    if elapsed_us >= delay_us {
        1
    } else {
        delay_us - elapsed_us
    }
}

/// `(high, low)` counts of one period at `threshold`.
pub const fn phase_counts(threshold: u8) -> (u32, u32) {
    (threshold as u32, COUNTER_STEPS - threshold as u32)
}

/// Pin level at counter value `count` for a period with `threshold`.
pub const fn level_at(threshold: u8, count: u8) -> OutputLevel {
    if count < threshold {
        OutputLevel::High
    } else {
        OutputLevel::Low
    }
}
