//! LED output drivers, hardware initialisation, and timer plumbing.

pub mod gpio_pin;
pub mod hw_init;
pub mod hw_pwm;
pub mod hw_timer;
pub mod watchdog;
