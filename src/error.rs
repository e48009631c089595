//! Unified error types for the Signallicht firmware.
//!
//! Nothing in the fade path can fail once it is running: every value is
//! drawn from a validated palette and moves in unit steps over `u8`.  The
//! only errors are broken initialisation preconditions, which are rejected
//! when the engine or the configuration is built.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible construction step in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A palette must hold at least one brightness level.
    EmptyPalette,
    /// A channel cursor does not index into the palette.
    CursorOutOfRange { cursor: usize, len: usize },
    /// Configuration is invalid.
    Config(&'static str),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPalette => write!(f, "palette is empty"),
            Self::CursorOutOfRange { cursor, len } => {
                write!(f, "cursor {cursor} out of range for palette of {len}")
            }
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
