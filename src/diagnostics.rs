//! Runtime counters.
//!
//! The dispatcher bumps these from its handlers and periodically emits a
//! [`StatsSnapshot`] so a stalled clock or a noisy pin shows up in the log.

use crate::fade::channel::LedChannel;

/// Point-in-time copy of the counters plus the live brightness levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub fade_ticks: u64,
    pub pwm_periods: u64,
    pub compare_matches: u64,
    /// Compare-matches that arrived after their period had ended.
    pub stale_compares: u32,
    pub pin_errors: u32,
    pub dropped_events: u32,
    /// Green, blue, red.
    pub levels: [u8; LedChannel::COUNT],
}

#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    fade_ticks: u64,
    pwm_periods: u64,
    compare_matches: u64,
    stale_compares: u32,
    pin_errors: u32,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fade_tick(&mut self) {
        self.fade_ticks = self.fade_ticks.wrapping_add(1);
    }

    pub fn record_pwm_period(&mut self) {
        self.pwm_periods = self.pwm_periods.wrapping_add(1);
    }

    pub fn record_compare_match(&mut self) {
        self.compare_matches = self.compare_matches.wrapping_add(1);
    }

    pub fn record_stale_compare(&mut self) {
        self.stale_compares = self.stale_compares.saturating_add(1);
    }

    pub fn record_pin_error(&mut self) {
        self.pin_errors = self.pin_errors.saturating_add(1);
    }

    pub fn fade_ticks(&self) -> u64 {
        self.fade_ticks
    }

    pub fn stale_compares(&self) -> u32 {
        self.stale_compares
    }

    pub fn pin_errors(&self) -> u32 {
        self.pin_errors
    }

    pub fn snapshot(&self, dropped_events: u32, levels: [u8; LedChannel::COUNT]) -> StatsSnapshot {
        StatsSnapshot {
            fade_ticks: self.fade_ticks,
            pwm_periods: self.pwm_periods,
            compare_matches: self.compare_matches,
            stale_compares: self.stale_compares,
            pin_errors: self.pin_errors,
            dropped_events,
            levels,
        }
    }
}
