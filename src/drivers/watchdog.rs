//! Task Watchdog Timer (TWDT) driver.
//!
//! The dispatch loop never blocks, so if it stops draining events for
//! longer than the timeout something has wedged the main task.  The loop
//! calls `feed()` after every drain.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Default TWDT timeout for the dispatch loop.
pub const WATCHDOG_TIMEOUT_MS: u32 = 5_000;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Configure the TWDT and subscribe the calling task.
    ///
    /// Idle tasks are left unwatched since the spinning dispatch loop
    /// starves the idle task on its core.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: TWDT API calls from the main task during boot.
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK as i32 {
                    log::warn!("watchdog: reconfigure returned {} (may already be configured)", ret);
                }

                let subscribed = esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK as i32;
                if subscribed {
                    log::info!("watchdog: dispatch loop subscribed ({}ms timeout)", timeout_ms);
                } else {
                    log::warn!("watchdog: failed to subscribe dispatch loop");
                }
                Self { subscribed }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("watchdog(sim): {}ms timeout not enforced", timeout_ms);
            Self {}
        }
    }

    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: the calling task subscribed in new().
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}
