//! Palette fader core: pure logic, zero I/O.
//!
//! ```text
//!   Palette (shared, read-only)
//!      │
//!      ├──▶ RampChannel green ──▶ LEDC duty (hardware PWM)
//!      ├──▶ RampChannel blue  ──▶ LEDC duty (hardware PWM)
//!      └──▶ RampChannel red   ──▶ CompareRegister ──▶ SoftPwm
//!                 ▲
//!            FadeEngine::tick()  (once per fade period)
//! ```
//!
//! Every channel walks towards its current palette target one unit per
//! tick.  On the tick that finds it already at the target it moves its
//! cursor to the next palette entry instead, so each level is held for
//! exactly one extra tick before the next ramp starts.

pub mod channel;
pub mod engine;
pub mod palette;

pub use channel::{LedChannel, RampChannel, StepOutcome};
pub use engine::{FadeEngine, TickReport};
pub use palette::{DEFAULT_PALETTE, Palette};
