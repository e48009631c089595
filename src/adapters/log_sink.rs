//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing fade events to the ESP-IDF logger
//! (UART / USB-CDC in production).  Target changes are frequent, so they
//! go out at debug level; stats and startup at info.

use log::{debug, info};

use crate::app::events::FadeEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`FadeEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &FadeEvent) {
        match event {
            FadeEvent::Started {
                palette_len,
                cursors,
            } => {
                info!(
                    "START | palette_len={} | cursors G={} B={} R={}",
                    palette_len, cursors[0], cursors[1], cursors[2]
                );
            }
            FadeEvent::TargetAdvanced {
                channel,
                cursor,
                target,
            } => {
                debug!(
                    "FADE  | {} -> palette[{}] = {}",
                    channel.name(),
                    cursor,
                    target
                );
            }
            FadeEvent::Stats(s) => {
                info!(
                    "STATS | ticks={} periods={} compares={} stale={} | pin_errors={} dropped={} | \
                     G={} B={} R={}",
                    s.fade_ticks,
                    s.pwm_periods,
                    s.compare_matches,
                    s.stale_compares,
                    s.pin_errors,
                    s.dropped_events,
                    s.levels[0],
                    s.levels[1],
                    s.levels[2],
                );
            }
        }
    }
}
