//! Port traits: the hexagonal boundary between the fader and the outside world.
//!
//! ```text
//!   Dispatcher ──▶ Port trait ──▶ Adapter (LEDC, esp_timer, log)
//! ```

use crate::fade::channel::LedChannel;

use super::events::FadeEvent;

// ───────────────────────────────────────────────────────────────
// Duty port (driven adapter: fade engine → PWM outputs)
// ───────────────────────────────────────────────────────────────

/// Receives each channel's brightness once per fade tick.
///
/// Green and blue go straight to their hardware PWM duty registers.  Red
/// goes to the software-PWM compare register, picked up at the next
/// period-start.
pub trait DutyPort {
    fn write_duty(&mut self, channel: LedChannel, duty: u8);
}

// ───────────────────────────────────────────────────────────────
// Compare timer port (driven adapter: software PWM → one-shot timer)
// ───────────────────────────────────────────────────────────────

/// One-shot timer that raises the software-PWM compare-match event.
pub trait CompareTimer {
    /// Arm the compare-match for period `period` to fire `delay_us` after
    /// that period's start (not after this call).  The resulting event must
    /// carry `period` so the dispatcher can tell it from a late compare of
    /// an earlier period.
    fn arm_compare(&mut self, delay_us: u32, period: u8);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The dispatcher emits structured [`FadeEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &FadeEvent);
}
