//! The hue × tone palette grid.
//!
//! A [`PaletteMatrix`] is a value: every edit returns a new matrix and leaves
//! the receiver untouched, so a failed edit can never leave a half-updated
//! grid behind. The rectangularity invariant (`colors.len() == hues.len()`,
//! every row `tones.len()` long) is checked at construction and preserved by
//! every edit.

use crate::color::Lch;
use crate::easing::Easing;
use crate::error::{Axis, PaletteError};
use crate::model::LchModel;
use crate::value::ColorValue;
use serde::Serialize;
use tracing::trace;

/// Name given to palettes that do not carry one.
pub const DEFAULT_PALETTE_NAME: &str = "Loaded palette";

/// Lightness range of the neutral ramp seeded into an empty row.
const GRAY_LIGHTEST: f64 = 95.0;
const GRAY_DARKEST: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteMatrix {
    name: String,
    mode: LchModel,
    hues: Vec<String>,
    tones: Vec<String>,
    colors: Vec<Vec<ColorValue>>,
}

fn check_index(axis: Axis, index: usize, len: usize) -> Result<(), PaletteError> {
    if index < len {
        Ok(())
    } else {
        Err(PaletteError::IndexOutOfRange { axis, index, len })
    }
}

fn check_shape(hues: usize, tones: usize, colors: &[Vec<ColorValue>]) -> Result<(), PaletteError> {
    let mismatch = |detail: String| PaletteError::ShapeMismatch {
        hues,
        tones,
        rows: colors.len(),
        detail,
    };
    if colors.len() != hues {
        return Err(mismatch(format!("{} hue names", hues)));
    }
    if let Some((i, row)) = colors.iter().enumerate().find(|(_, r)| r.len() != tones) {
        return Err(mismatch(format!("row {i} has {} colors", row.len())));
    }
    Ok(())
}

impl PaletteMatrix {
    /// Builds a matrix, checking that `colors` is `hues.len()` rows of
    /// `tones.len()` cells. Cells in another model are re-derived in `mode`.
    pub fn new(
        name: impl Into<String>,
        mode: LchModel,
        hues: Vec<String>,
        tones: Vec<String>,
        colors: Vec<Vec<ColorValue>>,
    ) -> Result<Self, PaletteError> {
        check_shape(hues.len(), tones.len(), &colors)?;
        let colors = colors
            .into_iter()
            .map(|row| row.into_iter().map(|c| in_mode(c, mode)).collect())
            .collect();
        Ok(Self {
            name: name.into(),
            mode,
            hues,
            tones,
            colors,
        })
    }

    /// A palette with the given tone columns and no hue rows.
    pub fn with_tones(mode: LchModel, tones: Vec<String>) -> Self {
        Self {
            name: DEFAULT_PALETTE_NAME.to_string(),
            mode,
            hues: Vec::new(),
            tones,
            colors: Vec::new(),
        }
    }

    /// Display name of the palette.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Model every cell is expressed in.
    pub fn mode(&self) -> LchModel {
        self.mode
    }

    /// Row labels.
    pub fn hues(&self) -> &[String] {
        &self.hues
    }

    /// Column labels.
    pub fn tones(&self) -> &[String] {
        &self.tones
    }

    /// Cells, one row per hue and one column per tone.
    pub fn colors(&self) -> &[Vec<ColorValue>] {
        &self.colors
    }

    /// The cell at `(hue_index, tone_index)`, if it exists.
    pub fn color(&self, hue_index: usize, tone_index: usize) -> Option<&ColorValue> {
        self.colors.get(hue_index)?.get(tone_index)
    }

    /// True when there is no cell, i.e. no hue or no tone.
    pub fn is_empty(&self) -> bool {
        self.hues.is_empty() || self.tones.is_empty()
    }

    /// Copy of the palette under a new name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Re-derives every cell in `mode` from its displayed hex.
    pub fn with_mode(&self, mode: LchModel) -> Self {
        if mode == self.mode {
            return self.clone();
        }
        trace!(from = %self.mode, to = %mode, "switching palette model");
        Self {
            mode,
            colors: self
                .colors
                .iter()
                .map(|row| row.iter().map(|c| c.with_mode(mode)).collect())
                .collect(),
            ..self.clone()
        }
    }

    /// Fails with `IndexOutOfRange` on a bad row index.
    pub fn rename_hue(&self, index: usize, name: impl Into<String>) -> Result<Self, PaletteError> {
        check_index(Axis::Hue, index, self.hues.len())?;
        let mut next = self.clone();
        next.hues[index] = name.into();
        Ok(next)
    }

    pub fn rename_tone(&self, index: usize, name: impl Into<String>) -> Result<Self, PaletteError> {
        check_index(Axis::Tone, index, self.tones.len())?;
        let mut next = self.clone();
        next.tones[index] = name.into();
        Ok(next)
    }

    /// Appends a row named `"Hue N"`: a copy of the last row, or a neutral
    /// light-to-dark ramp when there are no rows yet.
    pub fn add_hue(&self) -> Self {
        let row = match self.colors.last() {
            Some(last) => last.clone(),
            None => self.gray_ramp(),
        };
        self.push_row(row)
    }

    /// Appends a row with the hue of `text` and, column by column, the
    /// lightness and chroma of the last row. With no rows, every cell is the
    /// parsed color itself.
    pub fn add_hue_from_color(&self, text: &str) -> Result<Self, PaletteError> {
        let color = ColorValue::parse(self.mode, text)?;
        let row = match self.colors.last() {
            Some(last) => last
                .iter()
                .map(|prev| {
                    ColorValue::from_lch(self.mode, Lch::new(prev.l(), prev.c(), color.h()))
                })
                .collect(),
            None => vec![color; self.tones.len()],
        };
        Ok(self.push_row(row))
    }

    fn push_row(&self, row: Vec<ColorValue>) -> Self {
        let mut next = self.clone();
        next.hues.push(format!("Hue {}", self.hues.len() + 1));
        next.colors.push(row);
        next
    }

    fn gray_ramp(&self) -> Vec<ColorValue> {
        let n = self.tones.len();
        (0..n)
            .map(|i| {
                let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.5 };
                let l = GRAY_LIGHTEST + (GRAY_DARKEST - GRAY_LIGHTEST) * t;
                ColorValue::from_lch(self.mode, Lch::new(l, 0.0, 0.0))
            })
            .collect()
    }

    /// Appends a column named `"Tone N"`, copying each row's last cell (or a
    /// mid gray for rows that have no cells).
    pub fn add_tone(&self) -> Self {
        let mut next = self.clone();
        next.tones.push(format!("Tone {}", self.tones.len() + 1));
        for row in &mut next.colors {
            let cell = match row.last() {
                Some(last) => last.clone(),
                None => ColorValue::from_lch(self.mode, Lch::new(50.0, 0.0, 0.0)),
            };
            row.push(cell);
        }
        next
    }

    /// Drops row `index` with its cells.
    pub fn remove_hue(&self, index: usize) -> Result<Self, PaletteError> {
        check_index(Axis::Hue, index, self.hues.len())?;
        let mut next = self.clone();
        next.hues.remove(index);
        next.colors.remove(index);
        Ok(next)
    }

    /// Drops column `index` from every row.
    pub fn remove_tone(&self, index: usize) -> Result<Self, PaletteError> {
        check_index(Axis::Tone, index, self.tones.len())?;
        let mut next = self.clone();
        next.tones.remove(index);
        for row in &mut next.colors {
            row.remove(index);
        }
        Ok(next)
    }

    /// Replaces one cell with a color built from `lch` in this palette's model.
    pub fn set_color(
        &self,
        lch: Lch,
        hue_index: usize,
        tone_index: usize,
    ) -> Result<Self, PaletteError> {
        self.set_cell(hue_index, tone_index, ColorValue::from_lch(self.mode, lch))
    }

    /// Replaces one cell with an existing color.
    pub fn set_cell(
        &self,
        hue_index: usize,
        tone_index: usize,
        color: ColorValue,
    ) -> Result<Self, PaletteError> {
        check_index(Axis::Hue, hue_index, self.hues.len())?;
        check_index(Axis::Tone, tone_index, self.tones.len())?;
        let mut next = self.clone();
        next.colors[hue_index][tone_index] = in_mode(color, self.mode);
        Ok(next)
    }

    /// Replaces the whole grid. The labels are kept, so `colors` must have
    /// the current shape.
    pub fn set_colors(&self, colors: Vec<Vec<ColorValue>>) -> Result<Self, PaletteError> {
        Self::new(
            self.name.clone(),
            self.mode,
            self.hues.clone(),
            self.tones.clone(),
            colors,
        )
    }

    /// Spreads a row's lightness between its first and last cell along
    /// `easing`, keeping each cell's chroma and hue.
    pub fn resample_lightness(
        &self,
        hue_index: usize,
        easing: Easing,
    ) -> Result<Self, PaletteError> {
        check_index(Axis::Hue, hue_index, self.hues.len())?;
        let row = &self.colors[hue_index];
        let n = row.len();
        let (Some(first), Some(last)) = (row.first(), row.last()) else {
            return Ok(self.clone());
        };
        if n < 2 {
            return Ok(self.clone());
        }
        let (from, to) = (first.l(), last.l());
        trace!(hue = hue_index, %easing, from, to, "resampling lightness");
        let resampled = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let t = easing.apply(i as f64 / (n - 1) as f64);
                let l = from + (to - from) * t;
                ColorValue::from_lch(self.mode, Lch::new(l, cell.c(), cell.h()))
            })
            .collect();
        let mut next = self.clone();
        next.colors[hue_index] = resampled;
        Ok(next)
    }
}

fn in_mode(color: ColorValue, mode: LchModel) -> ColorValue {
    if color.mode() == mode {
        color
    } else {
        color.with_mode(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{prefix}{}", i * 100)).collect()
    }

    fn sample(hues: usize, tones: usize) -> PaletteMatrix {
        let mode = LchModel::Cielch;
        let colors = (0..hues)
            .map(|h| {
                (0..tones)
                    .map(|t| ColorValue::from_lch(mode, Lch::new(90.0 - 15.0 * t as f64, 30.0, 40.0 * h as f64)))
                    .collect()
            })
            .collect();
        PaletteMatrix::new("Test", mode, names("h", hues), names("", tones), colors).unwrap()
    }

    fn assert_rectangular(m: &PaletteMatrix) {
        assert_eq!(m.colors().len(), m.hues().len());
        for row in m.colors() {
            assert_eq!(row.len(), m.tones().len());
        }
    }

    // -- Construction --

    #[test]
    fn new_rejects_ragged_grid() {
        let mode = LchModel::Oklch;
        let cell = ColorValue::black(mode);
        let err = PaletteMatrix::new(
            "x",
            mode,
            names("h", 2),
            names("", 2),
            vec![vec![cell.clone(), cell.clone()], vec![cell]],
        )
        .unwrap_err();
        assert!(matches!(err, PaletteError::ShapeMismatch { hues: 2, tones: 2, rows: 2, .. }));
    }

    #[test]
    fn new_rejects_missing_rows() {
        let err = PaletteMatrix::new("x", LchModel::Oklch, names("h", 1), names("", 1), vec![]).unwrap_err();
        assert!(matches!(err, PaletteError::ShapeMismatch { rows: 0, .. }));
    }

    #[test]
    fn new_converts_cells_into_palette_model() {
        let cell = ColorValue::from_hex(LchModel::Oklch, "#3366cc").unwrap();
        let m = PaletteMatrix::new("x", LchModel::Cielch, names("h", 1), names("", 1), vec![vec![cell]]).unwrap();
        let stored = m.color(0, 0).unwrap();
        assert_eq!(stored.mode(), LchModel::Cielch);
        assert_eq!(stored.hex(), "#3366cc");
    }

    // -- Hue rows --

    #[test]
    fn add_hue_to_empty_matrix_seeds_gray_row() {
        let m = PaletteMatrix::with_tones(LchModel::Cielch, vec!["100".into(), "200".into()]);
        let next = m.add_hue();
        assert_eq!(next.hues(), ["Hue 1"]);
        assert_eq!(next.colors()[0].len(), 2);
        assert_rectangular(&next);
        let row = &next.colors()[0];
        assert!(row[0].l() > row[1].l(), "ramp runs light to dark");
        assert!(row.iter().all(|c| c.c() == 0.0));
        assert!(m.hues().is_empty(), "original untouched");
    }

    #[test]
    fn add_hue_duplicates_last_row() {
        let m = sample(2, 3);
        let next = m.add_hue();
        assert_eq!(next.hues().len(), 3);
        assert_eq!(next.hues()[2], "Hue 3");
        assert_eq!(next.colors()[2], m.colors()[1]);
    }

    #[test]
    fn add_hue_from_color_takes_hue_and_keeps_column_lightness() {
        let m = sample(1, 3);
        let next = m.add_hue_from_color("#0000ff").unwrap();
        let blue_h = ColorValue::parse(LchModel::Cielch, "#0000ff").unwrap().h();
        for (prev, new) in m.colors()[0].iter().zip(&next.colors()[1]) {
            assert_eq!(new.l(), prev.l());
            assert_eq!(new.c(), prev.c());
            assert!((new.h() - blue_h).abs() < 1e-9);
        }
        assert_eq!(next.hues()[1], "Hue 2");
    }

    #[test]
    fn add_hue_from_color_without_rows_repeats_the_color() {
        let m = PaletteMatrix::with_tones(LchModel::Oklch, names("", 2));
        let next = m.add_hue_from_color("tomato").unwrap();
        assert!(next.colors()[0].iter().all(|c| c.hex() == "#ff6347"));
    }

    #[test]
    fn add_hue_from_invalid_color_fails() {
        let m = sample(1, 2);
        assert!(matches!(
            m.add_hue_from_color("not a color"),
            Err(PaletteError::InvalidColor(_))
        ));
    }

    #[test]
    fn rename_and_remove_hue() {
        let m = sample(3, 2);
        let renamed = m.rename_hue(1, "Teal").unwrap();
        assert_eq!(renamed.hues()[1], "Teal");
        let removed = renamed.remove_hue(0).unwrap();
        assert_eq!(removed.hues(), ["Teal", "h300"]);
        assert_rectangular(&removed);
        assert!(matches!(
            m.rename_hue(3, "x"),
            Err(PaletteError::IndexOutOfRange { axis: Axis::Hue, index: 3, len: 3 })
        ));
    }

    // -- Tone columns --

    #[test]
    fn remove_tone_out_of_range_leaves_matrix_unchanged() {
        let m = sample(2, 3);
        let before = m.clone();
        let err = m.remove_tone(5).unwrap_err();
        assert!(matches!(
            err,
            PaletteError::IndexOutOfRange { axis: Axis::Tone, index: 5, len: 3 }
        ));
        assert_eq!(m, before);
    }

    #[test]
    fn add_tone_copies_last_column() {
        let m = sample(2, 2);
        let next = m.add_tone();
        assert_eq!(next.tones()[2], "Tone 3");
        for row in next.colors() {
            assert_eq!(row[2], row[1]);
        }
        assert_rectangular(&next);
    }

    #[test]
    fn add_tone_to_row_without_cells_seeds_gray() {
        let m = PaletteMatrix::with_tones(LchModel::Oklch, vec![]).add_hue();
        let next = m.add_tone();
        assert_eq!(next.colors()[0].len(), 1);
        assert_eq!(next.colors()[0][0].c(), 0.0);
    }

    #[test]
    fn rename_tone_checks_bounds() {
        let m = sample(1, 2);
        assert_eq!(m.rename_tone(0, "50").unwrap().tones()[0], "50");
        assert!(m.rename_tone(2, "x").is_err());
    }

    // -- Cells --

    #[test]
    fn set_color_replaces_one_cell() {
        let m = sample(2, 2);
        let lch = Lch::new(40.0, 20.0, 200.0);
        let next = m.set_color(lch, 1, 0).unwrap();
        assert_eq!(next.color(1, 0).unwrap().lch(), lch);
        assert_eq!(next.color(0, 0), m.color(0, 0));
        assert!(m.set_color(lch, 2, 0).is_err());
        assert!(m.set_color(lch, 0, 2).is_err());
    }

    #[test]
    fn set_colors_validates_shape() {
        let m = sample(2, 2);
        let grid = m.colors().to_vec();
        assert!(m.set_colors(grid.clone()).is_ok());
        assert!(m.set_colors(grid[..1].to_vec()).is_err());
    }

    #[test]
    fn with_mode_keeps_hex() {
        let m = sample(2, 3);
        let ok = m.with_mode(LchModel::Oklch);
        assert_eq!(ok.mode(), LchModel::Oklch);
        for (a, b) in m.colors().iter().flatten().zip(ok.colors().iter().flatten()) {
            assert_eq!(a.hex(), b.hex());
            assert_eq!(b.mode(), LchModel::Oklch);
        }
    }

    #[test]
    fn with_name_renames_palette() {
        assert_eq!(sample(1, 1).with_name("Brand").name(), "Brand");
    }

    // -- Resampling --

    #[test]
    fn linear_resample_spaces_lightness_evenly() {
        let m = sample(1, 5).set_color(Lch::new(20.0, 30.0, 0.0), 0, 4).unwrap();
        let next = m.resample_lightness(0, Easing::Linear).unwrap();
        let ls: Vec<f64> = next.colors()[0].iter().map(|c| c.l()).collect();
        for (i, l) in ls.iter().enumerate() {
            let expected = 90.0 - 70.0 * i as f64 / 4.0;
            assert!((l - expected).abs() < 1e-9, "tone {i}: {l} vs {expected}");
        }
        for (a, b) in m.colors()[0].iter().zip(&next.colors()[0]) {
            assert_eq!(a.c(), b.c());
            assert_eq!(a.h(), b.h());
        }
    }

    #[test]
    fn resample_short_row_is_a_no_op() {
        let m = sample(1, 1);
        assert_eq!(m.resample_lightness(0, Easing::EaseIn).unwrap(), m);
        assert!(m.resample_lightness(1, Easing::Linear).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            AddHue,
            AddTone,
            RemoveHue(usize),
            RemoveTone(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::AddHue),
                Just(Op::AddTone),
                (0usize..6).prop_map(Op::RemoveHue),
                (0usize..6).prop_map(Op::RemoveTone),
            ]
        }

        proptest! {
            #[test]
            fn edits_preserve_rectangularity(ops in prop::collection::vec(op(), 0..24)) {
                let mut m = sample(2, 3);
                for op in ops {
                    let next = match op {
                        Op::AddHue => Ok(m.add_hue()),
                        Op::AddTone => Ok(m.add_tone()),
                        Op::RemoveHue(i) => m.remove_hue(i),
                        Op::RemoveTone(i) => m.remove_tone(i),
                    };
                    if let Ok(next) = next {
                        m = next;
                    }
                    prop_assert_eq!(m.colors().len(), m.hues().len());
                    for row in m.colors() {
                        prop_assert_eq!(row.len(), m.tones().len());
                    }
                }
            }
        }
    }
}
