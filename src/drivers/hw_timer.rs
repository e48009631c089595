//! Hardware timer module using ESP-IDF's esp_timer API.
//!
//! Three timers feed the lock-free event queue:
//!
//! | Timer       | Mode      | Event              |
//! |-------------|-----------|--------------------|
//! | `fade`      | periodic  | `FadeTick`         |
//! | `pwm`       | periodic  | `PwmPeriodStart`   |
//! | `pwm_cmp0/1`| one-shot  | `PwmCompareMatch`  |
//!
//! All of them use `ESP_TIMER_TASK` dispatch, so callbacks run one at a
//! time in the esp_timer task and never preempt each other.  That makes
//! the timer task the only producer of the event queue.
//!
//! The compare one-shots alternate by period parity, and each slot holds
//! the period tag it was armed for.  A compare from period `n` that fires
//! late still reports tag `n`, even after period `n + 1` has armed the
//! other slot.  The period callback also records when the period began,
//! so compare delays are measured from the real period-start instead of
//! from whenever the dispatch loop gets round to arming them.
//!
//! On simulation targets nothing is started; tests push events directly.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicPtr, AtomicU8, AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::events::{push_event, Event};
#[cfg(target_os = "espidf")]
use crate::soft_pwm::remaining_delay_us;

use super::hw_init::HwInitError;

#[cfg(target_os = "espidf")]
static FADE_TIMER: AtomicPtr<esp_timer> = AtomicPtr::new(core::ptr::null_mut());
#[cfg(target_os = "espidf")]
static PWM_TIMER: AtomicPtr<esp_timer> = AtomicPtr::new(core::ptr::null_mut());
#[cfg(target_os = "espidf")]
static COMPARE_TIMERS: [AtomicPtr<esp_timer>; 2] = [
    AtomicPtr::new(core::ptr::null_mut()),
    AtomicPtr::new(core::ptr::null_mut()),
];
/// Period tag each compare slot was last armed with.
#[cfg(target_os = "espidf")]
static COMPARE_TAGS: [AtomicU8; 2] = [AtomicU8::new(0), AtomicU8::new(0)];
/// Low 32 bits of `esp_timer_get_time()` at the latest period-start.
#[cfg(target_os = "espidf")]
static PERIOD_START_US: AtomicU32 = AtomicU32::new(0);

#[cfg(target_os = "espidf")]
fn now_us() -> u32 {
    // SAFETY: esp_timer_get_time has no preconditions.
    unsafe { esp_timer_get_time() as u32 }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn fade_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::FadeTick);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn pwm_period_cb(_arg: *mut core::ffi::c_void) {
    PERIOD_START_US.store(now_us(), Ordering::Release);
    push_event(Event::PwmPeriodStart);
}

/// `arg` is the compare slot index, not a pointer.
#[cfg(target_os = "espidf")]
unsafe extern "C" fn pwm_compare_cb(arg: *mut core::ffi::c_void) {
    let slot = arg as usize & 1;
    let period = COMPARE_TAGS[slot].load(Ordering::Acquire);
    push_event(Event::PwmCompareMatch { period });
}

/// Create one timer and stash its handle in `slot`.
#[cfg(target_os = "espidf")]
unsafe fn create_timer(
    slot: &AtomicPtr<esp_timer>,
    callback: unsafe extern "C" fn(*mut core::ffi::c_void),
    arg: usize,
    name: &'static [u8],
) -> Result<esp_timer_handle_t, HwInitError> {
    let args = esp_timer_create_args_t {
        callback: Some(callback),
        arg: arg as *mut core::ffi::c_void,
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: name.as_ptr() as *const _,
        skip_unhandled_events: false,
    };
    let mut handle: esp_timer_handle_t = core::ptr::null_mut();
    let ret = unsafe { esp_timer_create(&args, &mut handle) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::TimerCreateFailed(ret));
    }
    slot.store(handle, Ordering::Release);
    Ok(handle)
}

/// Start the fade and software-PWM clocks.
///
/// The compare timers are created here but only armed by [`arm_compare`].
#[cfg(target_os = "espidf")]
pub fn start_timers(fade_period_us: u32, pwm_period_us: u32) -> Result<(), HwInitError> {
    // SAFETY: called once at boot from the main task, before the dispatch
    // loop runs.  Callbacks only push to the lock-free event queue.
    unsafe {
        create_timer(&COMPARE_TIMERS[0], pwm_compare_cb, 0, b"pwm_cmp0\0")?;
        create_timer(&COMPARE_TIMERS[1], pwm_compare_cb, 1, b"pwm_cmp1\0")?;
        let pwm = create_timer(&PWM_TIMER, pwm_period_cb, 0, b"pwm\0")?;
        let fade = create_timer(&FADE_TIMER, fade_tick_cb, 0, b"fade\0")?;

        let ret = esp_timer_start_periodic(pwm, u64::from(pwm_period_us));
        if ret != ESP_OK as i32 {
            return Err(HwInitError::TimerStartFailed(ret));
        }
        let ret = esp_timer_start_periodic(fade, u64::from(fade_period_us));
        if ret != ESP_OK as i32 {
            return Err(HwInitError::TimerStartFailed(ret));
        }
    }

    info!("hw_timer: fade@{}us + pwm@{}us started", fade_period_us, pwm_period_us);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(fade_period_us: u32, pwm_period_us: u32) -> Result<(), HwInitError> {
    log::info!(
        "hw_timer(sim): fade@{}us + pwm@{}us not started (events pushed by caller)",
        fade_period_us,
        pwm_period_us
    );
    Ok(())
}

/// Arm the compare one-shot for `period`, `delay_us` after the latest
/// period-start.
///
/// The slot is picked by period parity, so the previous period's compare
/// is left alone and still reports its own tag if it fires late.
#[cfg(target_os = "espidf")]
pub fn arm_compare(delay_us: u32, period: u8) {
    let slot = usize::from(period & 1);
    let handle = COMPARE_TIMERS[slot].load(Ordering::Acquire);
    if handle.is_null() {
        return;
    }
    let elapsed = now_us().wrapping_sub(PERIOD_START_US.load(Ordering::Acquire));
    // SAFETY: handle was created in start_timers() and is never deleted
    // while the firmware runs.  The slot last ran two periods ago;
    // ESP_ERR_INVALID_STATE from stop just means it already fired.
    unsafe {
        esp_timer_stop(handle);
        COMPARE_TAGS[slot].store(period, Ordering::Release);
        let ret = esp_timer_start_once(handle, u64::from(remaining_delay_us(delay_us, elapsed)));
        if ret != ESP_OK as i32 {
            log::warn!("hw_timer: compare arm failed (rc={})", ret);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn arm_compare(_delay_us: u32, _period: u8) {}
