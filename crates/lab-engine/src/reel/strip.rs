//! Reel strip geometry.
//!
//! A reel window shows one cell of a long vertical strip made of the symbol
//! set repeated `TOTAL_CYCLES` times. Spinning scrolls the strip upward
//! (offsets are negative) from the previously shown symbol in the first cycle
//! to the outcome in cycle `SELECTION_CYCLES`, so every spin travels the same
//! long distance and still starts where the last one stopped.

use serde::{Deserialize, Serialize};
use crate::error::{LabError, Result};

pub const SPIN_CYCLES: usize = 24;
/// Extra repetitions below the landing cycle so the strip never runs out.
pub const PADDING_CYCLES: usize = 2;
pub const TOTAL_CYCLES: usize = SPIN_CYCLES + PADDING_CYCLES;
pub const SELECTION_CYCLES: usize = 20;
pub const SYMBOL_HEIGHT: f32 = 80.0;
pub const SYMBOL_SPACING: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StripGeometry {
    pub symbol_height: f32,
    pub symbol_spacing: f32,
    pub total_cycles: usize,
    pub selection_cycles: usize,
}

impl Default for StripGeometry {
    fn default() -> Self {
        Self {
            symbol_height: SYMBOL_HEIGHT,
            symbol_spacing: SYMBOL_SPACING,
            total_cycles: TOTAL_CYCLES,
            selection_cycles: SELECTION_CYCLES,
        }
    }
}

impl StripGeometry {
    pub fn validate(&self) -> Result<()> {
        if self.selection_cycles >= self.total_cycles {
            return Err(LabError::StripTooShort {
                selection: self.selection_cycles,
                total: self.total_cycles,
            });
        }
        let pitch = self.pitch();
        if !(pitch.is_finite() && pitch > 0.0) {
            return Err(LabError::InvalidPitch(pitch));
        }
        Ok(())
    }

    /// Distance between the tops of two neighbouring cells.
    pub fn pitch(&self) -> f32 {
        self.symbol_height + self.symbol_spacing
    }

    /// Strip cell the reel stops on.
    pub fn landing_index(&self, symbols: usize, outcome: usize) -> usize {
        self.selection_cycles * symbols + outcome
    }

    pub fn final_offset(&self, symbols: usize, outcome: usize) -> f32 {
        -(self.landing_index(symbols, outcome) as f32 * self.pitch())
    }

    pub fn initial_offset(&self, previous_outcome: usize) -> f32 {
        -(previous_outcome as f32 * self.pitch())
    }

    /// Face printed on strip cell `index`.
    pub fn symbol_at(&self, symbols: usize, index: usize) -> usize {
        if symbols == 0 {
            return 0;
        }
        index % symbols
    }

    /// Face under the window at `offset`, snapping to the nearest cell.
    pub fn index_at_offset(&self, symbols: usize, offset: f32) -> usize {
        if symbols == 0 || !offset.is_finite() {
            return 0;
        }
        let cell = (-offset / self.pitch()).round().max(0.0) as usize;
        self.symbol_at(symbols, cell)
    }
}
