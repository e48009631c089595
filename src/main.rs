//! Signallicht Firmware: Main Entry Point
//!
//! Three LEDs fade through a shared palette.  Green and blue are LEDC
//! hardware PWM; red is software PWM on a plain GPIO.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  esp_timer task                                              │
//! │   fade (≈61 Hz) ─┐                                           │
//! │   pwm  (≈976 Hz)─┼──▶ Event Queue (lock-free SPSC)           │
//! │   pwm_cmp (1-shot)┘          │                               │
//! │  ─────────────────────────── │ ───────────────────────────── │
//! │  main task                   ▼                               │
//! │   Dispatcher ── FadeEngine ──▶ HardwareAdapter (LEDC, cmp)   │
//! │              └─ SoftPwm    ──▶ GpioPin (red)                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use signallicht::adapters::hardware::HardwareAdapter;
use signallicht::adapters::log_sink::LogEventSink;
use signallicht::app::dispatcher::Dispatcher;
use signallicht::config::FadeConfig;
use signallicht::drivers::gpio_pin::GpioPin;
use signallicht::drivers::hw_pwm::HwPwmOutput;
use signallicht::drivers::watchdog::{WATCHDOG_TIMEOUT_MS, Watchdog};
use signallicht::drivers::{hw_init, hw_timer};
use signallicht::events;
use signallicht::fade::FadeEngine;
use signallicht::pins;
use signallicht::soft_pwm::{CompareRegister, SoftPwm};

/// Red threshold: written by the fade tick, latched by each PWM period.
static RED_COMPARE: CompareRegister = CompareRegister::new(0);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Signallicht v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration (compiled in, validated up front) ────
    let config = FadeConfig::default();
    config.validate()?;
    info!("Config: {}", serde_json::to_string(&config)?);
    info!(
        "Clocks: fade {}.{:03} Hz, pwm {}.{:03} Hz",
        config.fade_rate_millihz() / 1000,
        config.fade_rate_millihz() % 1000,
        config.pwm_rate_millihz() / 1000,
        config.pwm_rate_millihz() % 1000,
    );

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;

    // ── 4. Domain objects ─────────────────────────────────────
    let engine = FadeEngine::from_config(&config)?;
    let soft_pwm = SoftPwm::new(GpioPin::new(pins::LED_R_GPIO), &RED_COMPARE);
    let mut hw = HardwareAdapter::new(
        HwPwmOutput::new(pins::LEDC_CH_LED_G),
        HwPwmOutput::new(pins::LEDC_CH_LED_B),
        &RED_COMPARE,
    );
    let mut log_sink = LogEventSink::new();
    let mut dispatcher = Dispatcher::new(engine, soft_pwm, &config);
    dispatcher.start(&mut hw, &mut log_sink);

    // ── 5. Clocks ─────────────────────────────────────────────
    hw_timer::start_timers(config.fade_period_us, config.pwm_period_us)?;
    let watchdog = Watchdog::new(WATCHDOG_TIMEOUT_MS);

    info!("System ready. Entering dispatch loop.");

    // ── 6. Dispatch loop ──────────────────────────────────────
    // Spins instead of sleeping: a FreeRTOS tick is 10 ms, far longer
    // than the software-PWM period.
    loop {
        events::drain_events(|event| dispatcher.dispatch(event, &mut hw, &mut log_sink));
        watchdog.feed();
        core::hint::spin_loop();
    }
}
