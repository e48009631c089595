//! Outbound application events.
//!
//! The [`Dispatcher`](super::dispatcher::Dispatcher) emits these through the
//! [`EventSink`](super::ports::EventSink) port.

use crate::diagnostics::StatsSnapshot;
use crate::fade::channel::LedChannel;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FadeEvent {
    /// The dispatcher has published its initial levels.
    Started {
        palette_len: usize,
        cursors: [usize; LedChannel::COUNT],
    },

    /// A channel reached its target and moved to the next palette entry.
    TargetAdvanced {
        channel: LedChannel,
        cursor: usize,
        target: u8,
    },

    /// Periodic runtime counters.
    Stats(StatsSnapshot),
}
