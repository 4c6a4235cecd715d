#![deny(unsafe_code)]
//! Color-science core for the tonegrid palette tool.
//!
//! Provides the perceptual models (`LchModel`: OKLCH, CIELCH), conversions
//! through CIE XYZ to sRGB, gamut membership and chroma-reduction mapping,
//! CSS color parsing, the immutable `ColorValue`, contrast metrics (WCAG,
//! APCA, CIEDE2000), and the copy-on-write `PaletteMatrix`.

pub mod color;
pub mod contrast;
pub mod easing;
pub mod error;
pub mod gamut;
pub mod matrix;
pub mod model;
pub mod parse;
pub mod selection;
pub mod value;

pub use color::{Lab, Lch, LinearRgb, OkLab, Srgb, Xyz};
pub use contrast::{
    apca_contrast, delta_e_contrast, get_most_contrast, wcag_contrast, ContrastMetric, InkMode,
};
pub use easing::Easing;
pub use error::{Axis, PaletteError};
pub use gamut::{force_into_gamut, is_within_gamut, Bisection, Gamut, GamutMapped};
pub use matrix::{PaletteMatrix, DEFAULT_PALETTE_NAME};
pub use model::{AxisRange, Conversions, LchModel, Ranges};
pub use parse::{parse_color, parse_srgb, ParsedColor};
pub use selection::Selection;
pub use value::ColorValue;
