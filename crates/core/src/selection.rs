//! The currently selected palette cell.

use crate::color::Lch;
use crate::error::{Axis, PaletteError};
use crate::matrix::PaletteMatrix;
use crate::value::ColorValue;
use serde::{Deserialize, Serialize};

/// A `(hue, tone)` position in a [`PaletteMatrix`].
///
/// The selection does not own the matrix; the host keeps both and passes the
/// current matrix snapshot in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub hue_index: usize,
    pub tone_index: usize,
}

impl Selection {
    pub fn new(hue_index: usize, tone_index: usize) -> Self {
        Self {
            hue_index,
            tone_index,
        }
    }

    /// The selected color.
    pub fn resolve<'m>(&self, matrix: &'m PaletteMatrix) -> Result<&'m ColorValue, PaletteError> {
        matrix
            .color(self.hue_index, self.tone_index)
            .ok_or_else(|| self.out_of_range(matrix))
    }

    fn out_of_range(&self, matrix: &PaletteMatrix) -> PaletteError {
        if self.hue_index >= matrix.hues().len() {
            PaletteError::IndexOutOfRange {
                axis: Axis::Hue,
                index: self.hue_index,
                len: matrix.hues().len(),
            }
        } else {
            PaletteError::IndexOutOfRange {
                axis: Axis::Tone,
                index: self.tone_index,
                len: matrix.tones().len(),
            }
        }
    }

    /// Moves the selection onto the nearest existing cell, e.g. after the
    /// selected row or column was removed. Returns `None` for an empty matrix.
    pub fn clamped_to(&self, matrix: &PaletteMatrix) -> Option<Self> {
        let hues = matrix.hues().len();
        let tones = matrix.tones().len();
        if hues == 0 || tones == 0 {
            return None;
        }
        Some(Self::new(
            self.hue_index.min(hues - 1),
            self.tone_index.min(tones - 1),
        ))
    }

    /// Writes `lch` into the selected cell, returning the new matrix and the
    /// color that now occupies the cell.
    pub fn apply_lch(
        &self,
        matrix: &PaletteMatrix,
        lch: Lch,
    ) -> Result<(PaletteMatrix, ColorValue), PaletteError> {
        let next = matrix.set_color(lch, self.hue_index, self.tone_index)?;
        let color = self.resolve(&next)?.clone();
        Ok((next, color))
    }
}
