//! Timer-driven event system.
//!
//! Events are produced by the three esp_timer callbacks and consumed by
//! the dispatch loop, which hands them to the
//! [`Dispatcher`](crate::app::dispatcher::Dispatcher) one at a time.
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ fade timer       │────▶│              │     │              │
//! │ pwm period timer │────▶│  Event Queue │────▶│  Dispatcher  │
//! │ compare one-shot │────▶│  (lock-free) │     │  (consumer)  │
//! └──────────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! All three timers dispatch from the single esp_timer task, so there is
//! exactly one producer and the queue can stay single-producer /
//! single-consumer.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 32;

/// Period tags wrap at this mask; they fit in the six bits above the
/// event kind in a queue slot.
pub const PERIOD_TAG_MASK: u8 = 0x3F;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Fade clock period elapsed: step every ramp channel.
    FadeTick,
    /// Software PWM period begins: red LED on.
    PwmPeriodStart,
    /// Software PWM counter reached the red threshold: red LED off.
    ///
    /// `period` is the tag the compare was armed with.  A compare whose
    /// tag is not the current period's is stale and gets dropped.
    PwmCompareMatch { period: u8 },
}

impl Event {
    // Slot layout: bits 0..2 kind, bits 2..8 period tag.
    const fn to_u8(self) -> u8 {
        match self {
            Self::FadeTick => 0,
            Self::PwmPeriodStart => 1,
            Self::PwmCompareMatch { period } => 2 | ((period & PERIOD_TAG_MASK) << 2),
        }
    }

    const fn from_u8(raw: u8) -> Option<Self> {
        match raw & 0b11 {
            0 => Some(Self::FadeTick),
            1 => Some(Self::PwmPeriodStart),
            2 => Some(Self::PwmCompareMatch { period: raw >> 2 }),
            _ => None,
        }
    }
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Timer callbacks write (produce), the dispatch loop reads (consume).
// One slot is always left empty to tell "full" from "empty".

pub struct EventQueue {
    head: AtomicU8,
    tail: AtomicU8,
    dropped: AtomicU32,
    buffer: UnsafeCell<[u8; EVENT_QUEUE_CAP]>,
}

// SAFETY: `buffer` slots are only written by the single producer at
// `head` before `head` is published with Release, and only read by the
// single consumer at `tail` after observing `head` with Acquire.  A slot
// is never read and written at the same time.
unsafe impl Sync for EventQueue {}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
            dropped: AtomicU32::new(0),
            buffer: UnsafeCell::new([0; EVENT_QUEUE_CAP]),
        }
    }

    /// Push an event.  Safe to call from timer-callback context.
    /// Returns `false` (and counts the drop) if the queue is full.
    pub fn push(&self, event: Event) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

        if next_head == tail {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: single producer; slot `head` is not visible to the
        // consumer until the Release store below.
        unsafe {
            (*self.buffer.get())[head as usize] = event.to_u8();
        }

        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Pop the oldest event, or `None` if empty.  Single consumer only.
    pub fn pop(&self) -> Option<Event> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail == head {
            return None;
        }

        // SAFETY: single consumer; the Acquire load of `head` makes the
        // producer's write to slot `tail` visible.
        let raw = unsafe { (*self.buffer.get())[tail as usize] };
        self.tail
            .store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

        Event::from_u8(raw)
    }

    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Relaxed) == self.head.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed) as usize;
        let tail = self.tail.load(Ordering::Relaxed) as usize;
        (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
    }

    /// Events lost to a full queue since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ── Global queue ──────────────────────────────────────────────
//
// A `static` because esp_timer callbacks are plain C function pointers
// and cannot capture anything.

static EVENTS: EventQueue = EventQueue::new();

/// The queue the timer callbacks feed.
pub fn global_queue() -> &'static EventQueue {
    &EVENTS
}

/// Push an event into the global queue.
pub fn push_event(event: Event) -> bool {
    EVENTS.push(event)
}

/// Pop the next event from the global queue.
pub fn pop_event() -> Option<Event> {
    EVENTS.pop()
}

/// Drain all pending events into a callback, in FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

pub fn queue_is_empty() -> bool {
    EVENTS.is_empty()
}

pub fn dropped_events() -> u32 {
    EVENTS.dropped()
}
