//! System configuration parameters
//!
//! Timer periods, palette and channel offsets for the fader.  Fixed at
//! build time: the firmware boots with [`FadeConfig::default()`] and never
//! changes it at runtime.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fade::channel::LedChannel;
use crate::fade::palette::{DEFAULT_PALETTE, Palette};

/// Upper bound on palette length (fixed capacity, no heap).
pub const MAX_PALETTE_LEN: usize = 16;

/// Shortest software-PWM period the esp_timer service can follow with
/// one microsecond per compare step.
pub const MIN_PWM_PERIOD_US: u32 = 256;

/// Core fader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeConfig {
    // --- Timing ---
    /// Fade clock period (microseconds).  One ramp step per period.
    pub fade_period_us: u32,
    /// Software PWM period for the red LED (microseconds).
    pub pwm_period_us: u32,

    // --- Palette ---
    /// Brightness levels every channel cycles through.
    pub palette: heapless::Vec<u8, MAX_PALETTE_LEN>,
    /// Start cursor per channel, indexed green, blue, red.
    pub start_cursors: [usize; LedChannel::COUNT],

    // --- Diagnostics ---
    /// Fade ticks between stats log lines (0 disables them).
    pub stats_interval_ticks: u32,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            // Timing
            fade_period_us: 16_384, // ≈61 Hz  (16 MHz / 1024 / 256)
            pwm_period_us: 1_024,   // ≈976 Hz (16 MHz / 64 / 256)

            // Palette
            palette: DEFAULT_PALETTE.iter().copied().collect(),
            start_cursors: [0, 2, 3],

            // Diagnostics
            stats_interval_ticks: 610, // ≈10 s
        }
    }
}

impl FadeConfig {
    /// Borrow the palette as a validated [`Palette`].
    pub fn palette(&self) -> Result<Palette<'_>> {
        Palette::new(&self.palette)
    }

    /// Reject configurations the fade engine or timers cannot honour.
    pub fn validate(&self) -> Result<()> {
        let palette = self.palette()?;
        for &cursor in &self.start_cursors {
            if cursor >= palette.len() {
                return Err(Error::CursorOutOfRange {
                    cursor,
                    len: palette.len(),
                });
            }
        }

        if self.fade_period_us == 0 || self.pwm_period_us == 0 {
            return Err(Error::Config("timer periods must be non-zero"));
        }
        if self.pwm_period_us < MIN_PWM_PERIOD_US {
            return Err(Error::Config("pwm period shorter than one microsecond per step"));
        }
        if self.pwm_period_us >= self.fade_period_us {
            return Err(Error::Config("pwm clock must run faster than the fade clock"));
        }
        Ok(())
    }

    /// Fade clock frequency in millihertz, for logging.
    pub fn fade_rate_millihz(&self) -> u32 {
        1_000_000_000 / self.fade_period_us.max(1)
    }

    /// Software PWM frequency in millihertz, for logging.
    pub fn pwm_rate_millihz(&self) -> u32 {
        1_000_000_000 / self.pwm_period_us.max(1)
    }
}
