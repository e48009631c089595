//! Dispatcher: timer events → fade engine, soft PWM, ports.

use embedded_hal::digital::OutputPin;
use signallicht::app::dispatcher::Dispatcher;
use signallicht::app::events::FadeEvent;
use signallicht::config::FadeConfig;
use signallicht::events::{Event, EventQueue};
use signallicht::fade::{FadeEngine, LedChannel};
use signallicht::soft_pwm::{CompareRegister, OutputLevel, SoftPwm, compare_delay_us};

use crate::mock_hw::{FaultyPin, MockHw, MockPin, RecordingSink, StuckHighPin};

fn dispatcher<'a, 'r, P: OutputPin>(
    config: &'a FadeConfig,
    reg: &'r CompareRegister,
    pin: P,
) -> Dispatcher<'a, 'r, P> {
    let engine = FadeEngine::from_config(config).unwrap();
    Dispatcher::new(engine, SoftPwm::new(pin, reg), config)
}

#[test]
fn start_publishes_initial_levels() {
    let config = FadeConfig::default();
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, MockPin::default());

    d.start(&mut hw, &mut sink);

    assert_eq!(
        hw.duty_writes(),
        vec![
            (LedChannel::Green, 0),
            (LedChannel::Blue, 64),
            (LedChannel::Red, 255),
        ]
    );
    assert_eq!(reg.read(), 255);
    assert_eq!(
        sink.events,
        vec![FadeEvent::Started {
            palette_len: 8,
            cursors: [0, 2, 3],
        }]
    );
}

#[test]
fn first_fade_tick_reports_every_advance() {
    let config = FadeConfig::default();
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, MockPin::default());
    d.start(&mut hw, &mut sink);
    sink.events.clear();

    d.dispatch(Event::FadeTick, &mut hw, &mut sink);

    assert_eq!(
        sink.events,
        vec![
            FadeEvent::TargetAdvanced {
                channel: LedChannel::Green,
                cursor: 1,
                target: 192
            },
            FadeEvent::TargetAdvanced {
                channel: LedChannel::Blue,
                cursor: 3,
                target: 255
            },
            FadeEvent::TargetAdvanced {
                channel: LedChannel::Red,
                cursor: 4,
                target: 32
            },
        ]
    );
    assert_eq!(d.diagnostics().fade_ticks(), 1);
}

#[test]
fn period_start_arms_compare_from_red_level() {
    let config = FadeConfig::default();
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, MockPin::default());
    d.start(&mut hw, &mut sink);

    d.dispatch(Event::PwmPeriodStart, &mut hw, &mut sink);
    assert_eq!(hw.arms(), vec![compare_delay_us(255, config.pwm_period_us)]);
    assert!(d.soft_pwm().pin().high);

    let compare = hw.armed_compare().unwrap();
    d.dispatch(compare, &mut hw, &mut sink);
    assert!(!d.soft_pwm().pin().high);
    assert_eq!(d.soft_pwm().level(), OutputLevel::Low);
}

#[test]
fn red_threshold_follows_fade_ticks() {
    let config = FadeConfig::default();
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, MockPin::default());
    d.start(&mut hw, &mut sink);

    // Tick 1 dwells and picks target 32; tick 2 starts falling from 255.
    d.dispatch(Event::FadeTick, &mut hw, &mut sink);
    d.dispatch(Event::FadeTick, &mut hw, &mut sink);
    assert_eq!(reg.read(), 254);

    hw.clear();
    d.dispatch(Event::PwmPeriodStart, &mut hw, &mut sink);
    assert_eq!(d.soft_pwm().threshold(), 254);
    assert_eq!(hw.arms(), vec![compare_delay_us(254, config.pwm_period_us)]);
}

#[test]
fn zero_threshold_turns_off_without_arming() {
    let config = FadeConfig {
        start_cursors: [0, 2, 0],
        ..FadeConfig::default()
    };
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, MockPin::default());
    d.start(&mut hw, &mut sink);
    hw.clear();

    d.dispatch(Event::PwmPeriodStart, &mut hw, &mut sink);

    assert!(hw.arms().is_empty());
    assert!(!d.soft_pwm().pin().high);
    // Pulse collapsed to nothing: one rising and one falling edge.
    assert_eq!(d.soft_pwm().pin().edges, 2);
    let stats = d.diagnostics().snapshot(0, [0; 3]);
    assert_eq!(stats.pwm_periods, 1);
    assert_eq!(stats.compare_matches, 1);
}

#[test]
fn stats_emitted_every_interval() {
    let config = FadeConfig {
        stats_interval_ticks: 4,
        ..FadeConfig::default()
    };
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, MockPin::default());
    d.start(&mut hw, &mut sink);

    for _ in 0..9 {
        d.dispatch(Event::FadeTick, &mut hw, &mut sink);
    }

    assert_eq!(sink.stats_count(), 2);
    let first = sink
        .events
        .iter()
        .find_map(|e| match e {
            FadeEvent::Stats(s) => Some(*s),
            _ => None,
        })
        .unwrap();
    assert_eq!(first.fade_ticks, 4);
    // Green 0→3, blue 64→67, red 255→252 after one dwell tick each.
    assert_eq!(first.levels, [3, 67, 252]);
}

#[test]
fn zero_interval_disables_stats() {
    let config = FadeConfig {
        stats_interval_ticks: 0,
        ..FadeConfig::default()
    };
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, MockPin::default());
    d.start(&mut hw, &mut sink);

    for _ in 0..50 {
        d.dispatch(Event::FadeTick, &mut hw, &mut sink);
    }
    assert_eq!(sink.stats_count(), 0);
}

#[test]
fn pin_faults_are_counted_not_propagated() {
    let config = FadeConfig::default();
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, FaultyPin);
    d.start(&mut hw, &mut sink);
    hw.clear();

    d.dispatch(Event::PwmPeriodStart, &mut hw, &mut sink);
    assert!(hw.arms().is_empty(), "no compare without a rising edge");
    assert_eq!(d.diagnostics().pin_errors(), 1);

    // Nothing was armed, so a compare for that period is not expected.
    d.dispatch(Event::PwmCompareMatch { period: 1 }, &mut hw, &mut sink);
    assert_eq!(d.diagnostics().pin_errors(), 1);
    assert_eq!(d.diagnostics().stale_compares(), 1);

    // The fade side is unaffected.
    d.dispatch(Event::FadeTick, &mut hw, &mut sink);
    assert_eq!(hw.duty_writes().len(), 3);
}

#[test]
fn compare_match_pin_fault_is_counted() {
    let config = FadeConfig::default();
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, StuckHighPin);
    d.start(&mut hw, &mut sink);

    d.dispatch(Event::PwmPeriodStart, &mut hw, &mut sink);
    let compare = hw.armed_compare().unwrap();
    d.dispatch(compare, &mut hw, &mut sink);

    assert_eq!(d.diagnostics().pin_errors(), 1);
    assert_eq!(d.diagnostics().stale_compares(), 0);
}

#[test]
fn fade_and_pwm_events_interleave_freely() {
    let config = FadeConfig::default();
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, MockPin::default());
    d.start(&mut hw, &mut sink);

    // A fade tick lands between period-start and compare-match.
    d.dispatch(Event::PwmPeriodStart, &mut hw, &mut sink);
    d.dispatch(Event::FadeTick, &mut hw, &mut sink);
    d.dispatch(Event::FadeTick, &mut hw, &mut sink);
    assert!(d.soft_pwm().pin().high);
    assert_eq!(d.soft_pwm().threshold(), 255, "period keeps its latched threshold");
    let compare = hw.armed_compare().unwrap();
    d.dispatch(compare, &mut hw, &mut sink);
    assert!(!d.soft_pwm().pin().high);

    // The next period picks up the new level.
    d.dispatch(Event::PwmPeriodStart, &mut hw, &mut sink);
    assert_eq!(d.soft_pwm().threshold(), 254);
    assert_eq!(hw.last_duty(LedChannel::Red), Some(254));
}

#[test]
fn late_compare_cannot_cut_next_period_short() {
    let config = FadeConfig::default();
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, MockPin::default());
    d.start(&mut hw, &mut sink);
    assert_eq!(reg.read(), 255);

    // Period 1's compare fires after period 2 has already started and is
    // queued behind period 2's start.
    d.dispatch(Event::PwmPeriodStart, &mut hw, &mut sink);
    let first = hw.armed_compare().unwrap();
    d.dispatch(Event::PwmPeriodStart, &mut hw, &mut sink);
    let second = hw.armed_compare().unwrap();
    assert_ne!(first, second);

    d.dispatch(first, &mut hw, &mut sink);
    assert!(d.soft_pwm().pin().high, "period 2 still in its HIGH phase");
    assert_eq!(d.diagnostics().stale_compares(), 1);

    d.dispatch(second, &mut hw, &mut sink);
    assert!(!d.soft_pwm().pin().high);

    // A duplicate of the handled compare changes nothing either.
    d.dispatch(second, &mut hw, &mut sink);
    assert_eq!(d.diagnostics().stale_compares(), 2);
    let stats = d.diagnostics().snapshot(0, [0; 3]);
    assert_eq!(stats.compare_matches, 1);
}

#[test]
fn zero_threshold_period_ignores_earlier_compare() {
    let config = FadeConfig::default();
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, MockPin::default());
    d.start(&mut hw, &mut sink);

    d.dispatch(Event::PwmPeriodStart, &mut hw, &mut sink);
    let late = hw.armed_compare().unwrap();

    // Red drops to 0 before the next period; that period ends inline.
    reg.write(0);
    d.dispatch(Event::PwmPeriodStart, &mut hw, &mut sink);
    assert!(!d.soft_pwm().pin().high);

    d.dispatch(late, &mut hw, &mut sink);
    assert_eq!(d.diagnostics().stale_compares(), 1);

    // The following period is unaffected by the dropped compare.
    reg.write(128);
    d.dispatch(Event::PwmPeriodStart, &mut hw, &mut sink);
    assert!(d.soft_pwm().pin().high);
    assert_eq!(
        hw.last_arm().map(|(delay, _)| delay),
        Some(compare_delay_us(128, config.pwm_period_us))
    );
}

#[test]
fn period_tags_wrap_without_losing_compares() {
    let config = FadeConfig::default();
    let reg = CompareRegister::new(0);
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, MockPin::default());
    d.start(&mut hw, &mut sink);

    for _ in 0..200 {
        d.dispatch(Event::PwmPeriodStart, &mut hw, &mut sink);
        assert!(d.soft_pwm().pin().high);
        let compare = hw.armed_compare().unwrap();
        d.dispatch(compare, &mut hw, &mut sink);
        assert!(!d.soft_pwm().pin().high);
    }
    assert_eq!(d.diagnostics().stale_compares(), 0);
    let stats = d.diagnostics().snapshot(0, [0; 3]);
    assert_eq!(stats.compare_matches, 200);
}

#[test]
fn queue_drops_are_reported_in_stats() {
    let config = FadeConfig {
        stats_interval_ticks: 1,
        ..FadeConfig::default()
    };
    let reg = CompareRegister::new(0);
    let queue = EventQueue::new();
    let mut hw = MockHw::new(&reg);
    let mut sink = RecordingSink::new();
    let mut d = dispatcher(&config, &reg, MockPin::default()).with_event_queue(&queue);
    d.start(&mut hw, &mut sink);

    // A stalled consumer: the queue fills up and starts dropping.
    let accepted = (0..40).filter(|_| queue.push(Event::FadeTick)).count();
    let dropped = 40 - accepted as u32;
    assert!(dropped > 0);

    let first = queue.pop().unwrap();
    d.dispatch(first, &mut hw, &mut sink);

    let stats = sink
        .events
        .iter()
        .find_map(|e| match e {
            FadeEvent::Stats(s) => Some(*s),
            _ => None,
        })
        .unwrap();
    assert_eq!(stats.dropped_events, dropped);
}
