#![deny(unsafe_code)]
//! Palette import and export.
//!
//! This crate sits between `tonegrid-core` (which owns the palette model) and
//! the CLI. It converts a [`PaletteMatrix`] to and from the hex-palette JSON
//! interchange shape, design tokens and CSS variables, writes Tailwind
//! snippets, and (with the default `permalink` feature) builds shareable
//! links.

pub mod css_vars;
pub mod hex;
#[cfg(feature = "permalink")]
pub mod permalink;
pub mod tailwind;
pub mod tokens;

pub use css_vars::{export_css, import_css};
pub use hex::{export_hex_palette, parse_hex_palette, HexHue, HexPalette, OldLchPalette};
pub use tailwind::{export_tailwind_v3_config, export_tailwind_v3_vars, export_tailwind_v4};
pub use tokens::{export_tokens, import_tokens};

use std::fmt;
use std::str::FromStr;
use tonegrid_core::{PaletteError, PaletteMatrix};

/// Text formats a palette can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Hex,
    Tokens,
    Css,
    TailwindV3Vars,
    TailwindV3Config,
    TailwindV4,
    /// A permalink; needs a base URL.
    Link,
}

impl Format {
    pub const ALL: [Format; 7] = [
        Format::Hex,
        Format::Tokens,
        Format::Css,
        Format::TailwindV3Vars,
        Format::TailwindV3Config,
        Format::TailwindV4,
        Format::Link,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Format::Hex => "hex",
            Format::Tokens => "tokens",
            Format::Css => "css",
            Format::TailwindV3Vars => "tailwind-v3-vars",
            Format::TailwindV3Config => "tailwind-v3-config",
            Format::TailwindV4 => "tailwind-v4",
            Format::Link => "link",
        }
    }

    /// Renders `matrix` in this format. `base_url` is only used by
    /// [`Format::Link`].
    pub fn export(self, matrix: &PaletteMatrix, base_url: &str) -> Result<String, PaletteError> {
        match self {
            Format::Hex => export_hex_palette(matrix).to_json_pretty(),
            Format::Tokens => serde_json::to_string_pretty(&export_tokens(matrix))
                .map_err(|e| PaletteError::Parse(e.to_string())),
            Format::Css => Ok(export_css(matrix)),
            Format::TailwindV3Vars => Ok(export_tailwind_v3_vars(matrix)),
            Format::TailwindV3Config => Ok(export_tailwind_v3_config(matrix)),
            Format::TailwindV4 => Ok(export_tailwind_v4(matrix)),
            Format::Link => export_link(matrix, base_url),
        }
    }
}

#[cfg(feature = "permalink")]
fn export_link(matrix: &PaletteMatrix, base_url: &str) -> Result<String, PaletteError> {
    permalink::palette_link(base_url, matrix)
}

#[cfg(not(feature = "permalink"))]
fn export_link(_matrix: &PaletteMatrix, _base_url: &str) -> Result<String, PaletteError> {
    Err(PaletteError::Parse(
        "permalinks need the `permalink` feature".into(),
    ))
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Format::ALL
            .into_iter()
            .find(|f| f.name() == key)
            .ok_or_else(|| {
                let names: Vec<&str> = Format::ALL.iter().map(|f| f.name()).collect();
                PaletteError::Parse(format!(
                    "unknown export format '{s}', expected one of {}",
                    names.join(", ")
                ))
            })
    }
}
