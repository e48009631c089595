//! GPIO / peripheral pin assignments for the Signallicht board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Hardware-PWM LEDs (LEDC)
// ---------------------------------------------------------------------------

/// Green LED, driven by LEDC channel [`LEDC_CH_LED_G`].
pub const LED_G_GPIO: i32 = 12;
/// Blue LED, driven by LEDC channel [`LEDC_CH_LED_B`].
pub const LED_B_GPIO: i32 = 13;

pub const LEDC_CH_LED_G: u32 = 0;
pub const LEDC_CH_LED_B: u32 = 1;

// ---------------------------------------------------------------------------
// Software-PWM LED
// ---------------------------------------------------------------------------

/// Red LED on a plain digital output, toggled by the soft-PWM timers.
/// HIGH = LED on.
pub const LED_R_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels,
/// matching the ramp channel range.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for the green/blue LEDs (1 kHz, flicker-free).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
