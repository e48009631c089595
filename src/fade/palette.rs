//! Shared brightness palette.

use crate::error::{Error, Result};

/// Palette of the reference light: dark, bright, dim, full, ...
pub const DEFAULT_PALETTE: [u8; 8] = [0, 192, 64, 255, 32, 192, 96, 128];

/// An ordered, non-empty, read-only sequence of brightness levels.
///
/// Borrowed rather than owned so every channel can share one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette<'a> {
    levels: &'a [u8],
}

impl<'a> Palette<'a> {
    /// Wrap `levels`, rejecting an empty table (cursor arithmetic is modulo
    /// its length).
    pub fn new(levels: &'a [u8]) -> Result<Self> {
        if levels.is_empty() {
            return Err(Error::EmptyPalette);
        }
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always `false`; a `Palette` cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Brightness at `cursor`, or `None` past the end.
    pub fn get(&self, cursor: usize) -> Option<u8> {
        self.levels.get(cursor).copied()
    }

    /// Brightness at `cursor`, taken modulo `len()`.
    pub fn level(&self, cursor: usize) -> u8 {
        self.levels[cursor % self.levels.len()]
    }

    /// The cursor that follows `cursor`, wrapping back to 0.
    pub fn next_cursor(&self, cursor: usize) -> usize {
        (cursor + 1) % self.levels.len()
    }

    pub fn levels(&self) -> &'a [u8] {
        self.levels
    }
}
