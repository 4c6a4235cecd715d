//! The hex-palette interchange format.
//!
//! ```json
//! { "name": "T", "tones": ["100"], "hues": [{ "name": "Red", "colors": ["#ff0000"] }] }
//! ```
//!
//! This is the shape saved to disk and embedded in permalinks. Reading is
//! lenient: `null` names and list entries are accepted and treated as missing.

use serde::{Deserialize, Deserializer, Serialize};
use tonegrid_core::{ColorValue, Lch, LchModel, PaletteError, PaletteMatrix, DEFAULT_PALETTE_NAME};
use tracing::debug;

/// Hue name used for rows that arrive without one.
pub const UNNAMED_HUE: &str = "???";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HexPalette {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub tones: Vec<String>,
    #[serde(default, deserialize_with = "lenient_hues")]
    pub hues: Vec<HexHue>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HexHue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub colors: Vec<String>,
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn lenient_strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let items: Option<Vec<Option<String>>> = Option::deserialize(d)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

fn lenient_hues<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<HexHue>, D::Error> {
    let items: Option<Vec<Option<HexHue>>> = Option::deserialize(d)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

impl HexPalette {
    /// Reads a hex palette from untrusted JSON (URL, clipboard, file).
    ///
    /// Fails with [`PaletteError::Parse`] on malformed JSON and with
    /// [`PaletteError::ImportFormat`] when there are no hues or no tones.
    pub fn from_json(json: &str) -> Result<Self, PaletteError> {
        let palette: HexPalette =
            serde_json::from_str(json).map_err(|e| PaletteError::Parse(e.to_string()))?;
        palette.validate()?;
        Ok(palette)
    }

    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.hues.is_empty() {
            return Err(PaletteError::ImportFormat("palette has no hues".into()));
        }
        if self.tones.is_empty() {
            return Err(PaletteError::ImportFormat("palette has no tones".into()));
        }
        Ok(())
    }

    /// Compact JSON, as embedded in permalinks.
    pub fn to_json(&self) -> Result<String, PaletteError> {
        serde_json::to_string(self).map_err(|e| PaletteError::Parse(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, PaletteError> {
        serde_json::to_string_pretty(self).map_err(|e| PaletteError::Parse(e.to_string()))
    }
}

/// Builds a palette matrix in `mode` from a hex palette.
///
/// Rows without colors are dropped and the width is the longest remaining
/// row, or the tone count when no row is left. Missing tone names become `index * 100`, missing hue names `???`,
/// and missing or unreadable colors black.
pub fn parse_hex_palette(hex: &HexPalette, mode: LchModel) -> Result<PaletteMatrix, PaletteError> {
    let hues: Vec<&HexHue> = hex.hues.iter().filter(|h| !h.colors.is_empty()).collect();
    let width = hues
        .iter()
        .map(|h| h.colors.len())
        .max()
        .unwrap_or(hex.tones.len());

    let tones = (0..width)
        .map(|i| match hex.tones.get(i) {
            Some(t) if !t.is_empty() => t.clone(),
            _ => (i * 100).to_string(),
        })
        .collect();
    let hue_names = hues
        .iter()
        .map(|h| {
            if h.name.is_empty() {
                UNNAMED_HUE.to_string()
            } else {
                h.name.clone()
            }
        })
        .collect();
    let colors = hues
        .iter()
        .map(|h| {
            (0..width)
                .map(|i| cell_or_black(mode, h.colors.get(i).map(String::as_str)))
                .collect()
        })
        .collect();

    let name = if hex.name.is_empty() {
        DEFAULT_PALETTE_NAME
    } else {
        hex.name.as_str()
    };
    PaletteMatrix::new(name, mode, hue_names, tones, colors)
}

/// Parses one imported cell, substituting black for missing or bad input.
pub(crate) fn cell_or_black(mode: LchModel, text: Option<&str>) -> ColorValue {
    match text.map(|t| ColorValue::from_hex(mode, t)) {
        Some(Ok(color)) => color,
        Some(Err(e)) => {
            debug!(error = %e, "unreadable color in import, using black");
            ColorValue::black(mode)
        }
        None => ColorValue::black(mode),
    }
}

/// Converts a matrix to the hex-palette shape.
pub fn export_hex_palette(matrix: &PaletteMatrix) -> HexPalette {
    HexPalette {
        name: matrix.name().to_string(),
        tones: matrix.tones().to_vec(),
        hues: matrix
            .hues()
            .iter()
            .zip(matrix.colors())
            .map(|(name, row)| HexHue {
                name: name.clone(),
                colors: row.iter().map(|c| c.hex().to_string()).collect(),
            })
            .collect(),
    }
}

/// Legacy saved palette that stored CIELCH triples instead of hex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OldLchPalette {
    pub name: String,
    pub tones: Vec<String>,
    pub hues: Vec<String>,
    /// `[l, c, h]` per cell, rows in `hues` order.
    pub colors: Vec<Vec<[f64; 3]>>,
}

impl OldLchPalette {
    pub fn to_hex_palette(&self) -> HexPalette {
        HexPalette {
            name: self.name.clone(),
            tones: self.tones.clone(),
            hues: self
                .hues
                .iter()
                .enumerate()
                .map(|(i, name)| HexHue {
                    name: name.clone(),
                    colors: self
                        .colors
                        .get(i)
                        .map(|row| {
                            row.iter()
                                .map(|&[l, c, h]| {
                                    let color =
                                        ColorValue::from_lch(LchModel::Cielch, Lch::new(l, c, h));
                                    color.hex().to_string()
                                })
                                .collect()
                        })
                        .unwrap_or_default(),
                })
                .collect(),
        }
    }
}
