//! Software PWM against a simulated 8-bit counter.
//!
//! With `pwm_period_us = 256` every compare step is one microsecond, so the
//! armed delay is directly the counter value at which compare-match fires.

use signallicht::app::dispatcher::Dispatcher;
use signallicht::config::FadeConfig;
use signallicht::events::Event;
use signallicht::fade::FadeEngine;
use signallicht::soft_pwm::{CompareRegister, OutputLevel, SoftPwm, level_at, phase_counts};

use crate::mock_hw::{MockHw, MockPin, RecordingSink};

fn fixed_red(level: u8) -> FadeConfig {
    let mut palette = heapless::Vec::new();
    palette.push(level).unwrap();
    FadeConfig {
        pwm_period_us: 256,
        palette,
        start_cursors: [0, 0, 0],
        ..FadeConfig::default()
    }
}

/// Run one PWM period; returns the pin level sampled at every count.
fn run_period(
    d: &mut Dispatcher<'_, '_, MockPin>,
    hw: &mut MockHw<'_>,
    sink: &mut RecordingSink,
) -> Vec<OutputLevel> {
    hw.clear();
    let mut pending = None;
    let mut samples = Vec::with_capacity(256);
    for count in 0..256u32 {
        if count == 0 {
            d.dispatch(Event::PwmPeriodStart, hw, sink);
            pending = hw.last_arm();
        }
        if let Some((delay, period)) = pending {
            if delay == count {
                d.dispatch(Event::PwmCompareMatch { period }, hw, sink);
                pending = None;
            }
        }
        samples.push(if d.soft_pwm().pin().high {
            OutputLevel::High
        } else {
            OutputLevel::Low
        });
    }
    samples
}

#[test]
fn high_until_compare_then_low() {
    for level in [0u8, 1, 2, 64, 128, 200, 254, 255] {
        let config = fixed_red(level);
        let reg = CompareRegister::new(0);
        let mut hw = MockHw::new(&reg);
        let mut sink = RecordingSink::new();
        let engine = FadeEngine::from_config(&config).unwrap();
        let mut d = Dispatcher::new(engine, SoftPwm::new(MockPin::default(), &reg), &config);
        d.start(&mut hw, &mut sink);

        let samples = run_period(&mut d, &mut hw, &mut sink);

        for (count, sample) in samples.iter().enumerate() {
            assert_eq!(
                *sample,
                level_at(level, count as u8),
                "level {level}, count {count}"
            );
        }
        let high = samples.iter().filter(|s| **s == OutputLevel::High).count() as u32;
        assert_eq!((high, 256 - high), phase_counts(level), "level {level}");
    }
}

#[test]
fn extremes_give_minimal_phases() {
    assert_eq!(phase_counts(0).0, 0, "no HIGH phase at 0");
    assert_eq!(phase_counts(255).1, 1, "single LOW count at 255");
}

#[test]
fn consecutive_periods_repeat() {
    let config = fixed_red(100);
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let engine = FadeEngine::from_config(&config).unwrap();
    let mut d = Dispatcher::new(engine, SoftPwm::new(MockPin::default(), &reg), &config);
    d.start(&mut hw, &mut sink);

    let first = run_period(&mut d, &mut hw, &mut sink);
    let second = run_period(&mut d, &mut hw, &mut sink);
    assert_eq!(first, second);
    // Two edges per period.
    assert_eq!(d.soft_pwm().pin().edges, 4);
}
