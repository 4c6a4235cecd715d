//! CSS color string parsing.
//!
//! Syntax is handled by `csscolorparser`: hex (`#rgb`, `#rgba`, `#rrggbb`,
//! `#rrggbbaa`), named colors, `rgb()`, `hsl()`, `hwb()`, `lab()`, `lch()`,
//! `oklab()` and `oklch()`. Alpha is accepted and discarded. This module
//! decides which notations count as sRGB and keeps wide-gamut ones unclamped.

use crate::color::{srgb_to_xyz, to_polar, xyz_to_oklab};
use crate::color::{Lch, Srgb, Xyz};
use crate::error::PaletteError;
use crate::gamut::clamp_unit;

/// Functional notations whose coordinates may lie outside sRGB.
const WIDE_GAMUT_FUNCTIONS: [&str; 4] = ["lab", "lch", "oklab", "oklch"];

/// A parsed color and the kind of notation it was written in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedColor {
    /// Hex, named, `rgb()`, `hsl()` or `hwb()`; clamped to [0, 1].
    Srgb(Srgb),
    /// `lab()`, `lch()`, `oklab()` or `oklch()` as encoded sRGB; channels may
    /// fall outside [0, 1].
    WideGamut(Srgb),
}

impl ParsedColor {
    pub fn rgb(self) -> Srgb {
        match self {
            ParsedColor::Srgb(rgb) | ParsedColor::WideGamut(rgb) => rgb,
        }
    }

    pub fn to_xyz(self) -> Xyz {
        srgb_to_xyz(self.rgb())
    }

    /// OKLCH coordinates with lightness on 0..1, as CSS `oklch()` writes them.
    pub fn to_oklch_unit(self) -> Lch {
        let lab = xyz_to_oklab(self.to_xyz());
        to_polar(lab.l, lab.a, lab.b)
    }
}

fn invalid(text: &str, why: &str) -> PaletteError {
    PaletteError::InvalidColor(format!("'{text}': {why}"))
}

/// Parses any supported CSS color notation.
pub fn parse_color(text: &str) -> Result<ParsedColor, PaletteError> {
    let s = text.trim();
    // csscolorparser slices hex input by byte offset.
    if !s.is_ascii() {
        return Err(invalid(text, "non-ASCII color string"));
    }
    let color = csscolorparser::parse(s).map_err(|e| invalid(text, &e.to_string()))?;
    let rgb = Srgb {
        r: f64::from(color.r),
        g: f64::from(color.g),
        b: f64::from(color.b),
    };
    if ![rgb.r, rgb.g, rgb.b].iter().all(|c| c.is_finite()) {
        return Err(invalid(text, "non-finite channel"));
    }

    let function = s
        .split_once('(')
        .map(|(name, _)| name.trim().to_ascii_lowercase());
    match function {
        Some(name) if WIDE_GAMUT_FUNCTIONS.contains(&name.as_str()) => {
            Ok(ParsedColor::WideGamut(rgb))
        }
        _ => Ok(ParsedColor::Srgb(clamp_unit(rgb))),
    }
}

/// Parses a notation that denotes an sRGB color (hex, named, `rgb()`, `hsl()`,
/// `hwb()`).
pub fn parse_srgb(text: &str) -> Result<Srgb, PaletteError> {
    match parse_color(text)? {
        ParsedColor::Srgb(rgb) => Ok(rgb),
        ParsedColor::WideGamut(_) => Err(invalid(text, "not an sRGB color notation")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_of(text: &str) -> String {
        parse_srgb(text).unwrap().to_hex()
    }

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn parses_hex_variants() {
        assert_eq!(hex_of("#FF0000"), "#ff0000");
        assert_eq!(hex_of("#f00"), "#ff0000");
        assert_eq!(hex_of("#f008"), "#ff0000");
        assert_eq!(hex_of("#ff000080"), "#ff0000");
        assert_eq!(hex_of("  #00ff00 "), "#00ff00");
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(parse_color("#ff000").is_err());
        assert!(parse_color("#zzzzzz").is_err());
        assert!(parse_color("#").is_err());
        assert!(parse_color("#aaé").is_err());
    }

    #[test]
    fn parses_named_colors() {
        assert_eq!(hex_of("rebeccapurple"), "#663399");
        assert_eq!(hex_of("White"), "#ffffff");
        assert_eq!(hex_of("transparent"), "#000000");
        assert!(parse_color("notacolor").is_err());
    }

    #[test]
    fn parses_rgb_and_hsl() {
        assert_eq!(hex_of("rgb(255, 0, 0)"), "#ff0000");
        assert_eq!(hex_of("rgba(0,255,0,0.5)"), "#00ff00");
        assert_eq!(hex_of("hsl(0, 100%, 50%)"), "#ff0000");
        assert_eq!(hex_of("hsl(0, 0%, 100%)"), "#ffffff");
        assert!(parse_color("rgb(1, 2, 3").is_err());
    }

    #[test]
    fn srgb_notations_are_clamped() {
        let rgb = parse_srgb("rgb(300, -5, 0)").unwrap();
        assert!([rgb.r, rgb.g, rgb.b].iter().all(|c| (0.0..=1.0).contains(c)));
        assert_eq!(rgb.to_hex(), "#ff0000");
    }

    #[test]
    fn oklch_text_keeps_its_coordinates() {
        let lch = parse_color("oklch(0.7 0.1 200)").unwrap().to_oklch_unit();
        assert!(approx_eq(lch.l, 0.7, 1e-3), "l: {}", lch.l);
        assert!(approx_eq(lch.c, 0.1, 1e-3), "c: {}", lch.c);
        assert!(approx_eq(lch.h, 200.0, 0.5), "h: {}", lch.h);

        let percent = parse_color("oklch(70% 0.1 200deg)").unwrap().to_oklch_unit();
        assert!(approx_eq(percent.l, lch.l, 1e-9));
    }

    #[test]
    fn wide_gamut_notation_is_not_clamped() {
        let parsed = parse_color("oklch(0.9 0.3 150)").unwrap();
        assert!(matches!(parsed, ParsedColor::WideGamut(_)));
        let rgb = parsed.rgb();
        assert!(
            [rgb.r, rgb.g, rgb.b].iter().any(|c| !(0.0..=1.0).contains(c)),
            "{rgb:?}"
        );
    }

    #[test]
    fn cie_lch_is_wide_gamut() {
        let parsed = parse_color("lch(50 40 120)").unwrap();
        assert!(matches!(parsed, ParsedColor::WideGamut(_)));
    }

    #[test]
    fn srgb_only_parser_rejects_wide_gamut_notation() {
        assert!(parse_srgb("oklch(0.7 0.1 200)").is_err());
        assert!(parse_srgb("lch(50 40 120)").is_err());
        assert!(parse_srgb("teal").is_ok());
    }

    #[test]
    fn empty_string_is_rejected() {
        assert!(parse_color("").is_err());
        assert!(parse_color("   ").is_err());
    }
}
