//! Error types for the tonegrid core.

use std::fmt;
use thiserror::Error;

/// Which dimension of a palette matrix an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// A row of the matrix.
    Hue,
    /// A column of the matrix.
    Tone,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Hue => f.write_str("hue"),
            Axis::Tone => f.write_str("tone"),
        }
    }
}

/// Errors produced by color and palette operations.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// A color string could not be parsed, or its coordinates are out of range.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A structural edit referenced a row or column that does not exist.
    #[error("{axis} index {index} out of range for palette with {len} {axis}s")]
    IndexOutOfRange { axis: Axis, index: usize, len: usize },

    /// A color grid did not match the hue/tone label vectors.
    #[error("shape mismatch: expected {hues}x{tones} colors, got {rows} rows ({detail})")]
    ShapeMismatch {
        hues: usize,
        tones: usize,
        rows: usize,
        detail: String,
    },

    /// A design-token, CSS-variable or hex-palette payload was malformed.
    #[error("import format error: {0}")]
    ImportFormat(String),

    /// A permalink or JSON payload could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Best-contrast selection was asked to choose from nothing.
    #[error("no candidate colors to choose from")]
    NoCandidates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_color_includes_message() {
        let err = PaletteError::InvalidColor("bad hex".into());
        let msg = format!("{err}");
        assert!(msg.contains("bad hex"), "missing message in: {msg}");
    }

    #[test]
    fn index_out_of_range_names_axis_index_and_len() {
        let err = PaletteError::IndexOutOfRange {
            axis: Axis::Tone,
            index: 5,
            len: 3,
        };
        let msg = format!("{err}");
        assert!(msg.contains("tone"), "missing axis in: {msg}");
        assert!(msg.contains('5'), "missing index in: {msg}");
        assert!(msg.contains('3'), "missing len in: {msg}");
    }

    #[test]
    fn shape_mismatch_includes_dimensions() {
        let err = PaletteError::ShapeMismatch {
            hues: 2,
            tones: 4,
            rows: 7,
            detail: "row 1 has 3 colors".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("2x4"), "missing expected shape in: {msg}");
        assert!(msg.contains('7'), "missing row count in: {msg}");
        assert!(msg.contains("row 1"), "missing detail in: {msg}");
    }

    #[test]
    fn import_format_includes_cause() {
        let err = PaletteError::ImportFormat("tokens must be an object".into());
        assert!(err.to_string().contains("tokens must be an object"));
    }

    #[test]
    fn parse_error_includes_cause() {
        let err = PaletteError::Parse("not lz-string data".into());
        assert!(err.to_string().contains("lz-string"));
    }

    #[test]
    fn palette_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PaletteError>();
    }

    #[test]
    fn palette_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<PaletteError>();
    }
}
