//! Per-LED brightness ramp state machine.

use core::cmp::Ordering;

use crate::error::{Error, Result};

use super::palette::Palette;

/// The three LEDs on the board, in the order the fade driver steps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LedChannel {
    Green = 0,
    Blue = 1,
    Red = 2,
}

impl LedChannel {
    pub const COUNT: usize = 3;

    /// Stepping order used by every fade tick.
    pub const ALL: [LedChannel; Self::COUNT] = [Self::Green, Self::Blue, Self::Red];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Red => "red",
        }
    }
}

/// What a single [`RampChannel::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// `current` moved up by one.
    Rising,
    /// `current` moved down by one.
    Falling,
    /// `current` had reached its target; the cursor moved on and a new
    /// target was loaded.  `current` did not change this tick.
    Advanced { cursor: usize, target: u8 },
}

/// One LED's ramp: where it is, where it is heading, and which palette
/// entry it is heading for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampChannel {
    current: u8,
    target: u8,
    cursor: usize,
}

impl RampChannel {
    /// Start at palette entry `cursor`, already sitting on its level.
    ///
    /// The first step therefore advances the cursor.
    pub fn new(palette: &Palette<'_>, cursor: usize) -> Result<Self> {
        let level = Self::checked_level(palette, cursor)?;
        Ok(Self {
            current: level,
            target: level,
            cursor,
        })
    }

    /// Start at palette entry `cursor` with an explicit brightness.
    pub fn with_current(palette: &Palette<'_>, cursor: usize, current: u8) -> Result<Self> {
        let target = Self::checked_level(palette, cursor)?;
        Ok(Self {
            current,
            target,
            cursor,
        })
    }

    fn checked_level(palette: &Palette<'_>, cursor: usize) -> Result<u8> {
        palette.get(cursor).ok_or(Error::CursorOutOfRange {
            cursor,
            len: palette.len(),
        })
    }

    /// Move one unit towards the target, or pick the next target if there.
    pub fn step(&mut self, palette: &Palette<'_>) -> StepOutcome {
        match self.current.cmp(&self.target) {
            // current < target <= u8::MAX, cannot overflow
            Ordering::Less => {
                self.current += 1;
                StepOutcome::Rising
            }
            Ordering::Greater => {
                self.current -= 1;
                StepOutcome::Falling
            }
            Ordering::Equal => {
                self.cursor = palette.next_cursor(self.cursor);
                self.target = palette.level(self.cursor);
                StepOutcome::Advanced {
                    cursor: self.cursor,
                    target: self.target,
                }
            }
        }
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
