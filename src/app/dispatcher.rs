//! Run-to-completion event dispatcher, the application core.
//!
//! [`Dispatcher`] owns the fade engine and the red software PWM.  Every
//! timer event is handled by exactly one call to [`Dispatcher::dispatch`],
//! which returns before the next event is looked at.  `&mut self` makes
//! reentry impossible.
//!
//! ```text
//!  FadeTick ─────────▶ FadeEngine::tick ──▶ DutyPort (G, B, R compare)
//!  PwmPeriodStart ───▶ SoftPwm HIGH     ──▶ CompareTimer::arm_compare
//!  PwmCompareMatch ──▶ SoftPwm LOW (current period's tag only)
//! ```
//!
//! The two clocks touch disjoint state: the fade side only writes the
//! compare register, the PWM side only reads it.
//!
//! Every period-start takes a fresh period tag and arms the compare with
//! it.  A compare-match only ends the HIGH phase if it carries the tag of
//! the period still waiting for one.  Anything else is a late compare of an
//! earlier period, queued behind the newer period-start; it is counted and
//! dropped so it cannot cut the new period short.

use embedded_hal::digital::OutputPin;
use log::{debug, info, warn};

use crate::config::FadeConfig;
use crate::diagnostics::Diagnostics;
use crate::events::{self, Event, EventQueue, PERIOD_TAG_MASK};
use crate::fade::channel::LedChannel;
use crate::fade::engine::FadeEngine;
use crate::soft_pwm::{SoftPwm, compare_delay_us};

use super::events::FadeEvent;
use super::ports::{CompareTimer, DutyPort, EventSink};

pub struct Dispatcher<'a, 'r, P> {
    engine: FadeEngine<'a>,
    soft_pwm: SoftPwm<'r, P>,
    pwm_period_us: u32,
    stats_interval_ticks: u32,
    /// Tag of the latest period-start.
    period: u8,
    /// Tag of the period whose compare-match is still outstanding.
    pending_compare: Option<u8>,
    /// Queue whose drop count goes into the stats.
    queue: &'r EventQueue,
    diag: Diagnostics,
}

impl<'a, 'r, P: OutputPin> Dispatcher<'a, 'r, P> {
    pub fn new(engine: FadeEngine<'a>, soft_pwm: SoftPwm<'r, P>, config: &FadeConfig) -> Self {
        Self {
            engine,
            soft_pwm,
            pwm_period_us: config.pwm_period_us,
            stats_interval_ticks: config.stats_interval_ticks,
            period: 0,
            pending_compare: None,
            queue: events::global_queue(),
            diag: Diagnostics::new(),
        }
    }

    /// Report drops from `queue` instead of the global timer queue.
    pub fn with_event_queue(mut self, queue: &'r EventQueue) -> Self {
        self.queue = queue;
        self
    }

    /// Publish the starting levels so the outputs are valid before the
    /// first timer event.
    pub fn start(&mut self, hw: &mut impl DutyPort, sink: &mut impl EventSink) {
        self.engine.publish(hw);
        let cursors = LedChannel::ALL.map(|ch| self.engine.channel(ch).cursor());
        sink.emit(&FadeEvent::Started {
            palette_len: self.engine.palette().len(),
            cursors,
        });
        info!("Dispatcher started, levels G/B/R = {:?}", self.engine.levels());
    }

    /// Handle one event to completion.
    pub fn dispatch(
        &mut self,
        event: Event,
        hw: &mut (impl DutyPort + CompareTimer),
        sink: &mut impl EventSink,
    ) {
        match event {
            Event::FadeTick => self.on_fade_tick(hw, sink),
            Event::PwmPeriodStart => self.on_period_start(hw),
            Event::PwmCompareMatch { period } => self.on_compare_match(period),
        }
    }

    fn on_fade_tick(&mut self, hw: &mut impl DutyPort, sink: &mut impl EventSink) {
        self.diag.record_fade_tick();
        let report = self.engine.tick(hw);

        for (channel, cursor, target) in report.advanced() {
            sink.emit(&FadeEvent::TargetAdvanced {
                channel,
                cursor,
                target,
            });
        }

        if self.stats_interval_ticks > 0
            && self.diag.fade_ticks() % u64::from(self.stats_interval_ticks) == 0
        {
            let snapshot = self
                .diag
                .snapshot(self.queue.dropped(), self.engine.levels());
            sink.emit(&FadeEvent::Stats(snapshot));
        }
    }

    fn on_period_start(&mut self, timer: &mut impl CompareTimer) {
        self.diag.record_pwm_period();
        self.period = self.period.wrapping_add(1) & PERIOD_TAG_MASK;
        self.pending_compare = None;
        let threshold = match self.soft_pwm.on_period_start() {
            Ok(t) => t,
            Err(e) => {
                self.diag.record_pin_error();
                warn!("soft_pwm: period-start pin write failed: {:?}", e);
                return;
            }
        };

        if threshold == 0 {
            // Compare coincides with period-start: minimal HIGH phase.
            self.end_high_phase();
        } else {
            self.pending_compare = Some(self.period);
            timer.arm_compare(compare_delay_us(threshold, self.pwm_period_us), self.period);
        }
    }

    fn on_compare_match(&mut self, period: u8) {
        if self.pending_compare != Some(period & PERIOD_TAG_MASK) {
            self.diag.record_stale_compare();
            debug!(
                "soft_pwm: dropped compare for period {} (current {})",
                period, self.period
            );
            return;
        }
        self.pending_compare = None;
        self.end_high_phase();
    }

    fn end_high_phase(&mut self) {
        self.diag.record_compare_match();
        if let Err(e) = self.soft_pwm.on_compare_match() {
            self.diag.record_pin_error();
            warn!("soft_pwm: compare-match pin write failed: {:?}", e);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn engine(&self) -> &FadeEngine<'a> {
        &self.engine
    }

    pub fn soft_pwm(&self) -> &SoftPwm<'r, P> {
        &self.soft_pwm
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }
}
