//! Application core: event routing, zero I/O.
//!
//! The [`dispatcher`] turns timer events into calls on the fade engine and
//! the software PWM.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod dispatcher;
pub mod events;
pub mod ports;
