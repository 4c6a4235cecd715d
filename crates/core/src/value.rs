//! The immutable color value stored in every palette cell.
//!
//! A [`ColorValue`] bundles the perceptual triple that produced it with the
//! displayable sRGB result and gamut flags. All derived fields are computed
//! once by the factories here, so a value never changes after construction;
//! edits build a new one.

use crate::color::{xyz_to_srgb, Lch, Srgb};
use crate::error::PaletteError;
use crate::gamut::{clamp_unit, force_into_gamut, is_within_gamut, Bisection, Gamut};
use crate::model::LchModel;
use crate::parse::{parse_color, parse_srgb, ParsedColor};
use serde::Serialize;

/// Slack on the OKLCH lightness bounds accepted by [`ColorValue::parse`], so
/// that white written in hex or as `lch(100 0 0)` is not rejected.
const LIGHTNESS_SLACK: f64 = 1e-5;

/// A color as shown in one palette cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorValue {
    mode: LchModel,
    l: f64,
    c: f64,
    h: f64,
    r: f64,
    g: f64,
    b: f64,
    hex: String,
    within_srgb: bool,
    within_p3: bool,
    within_rec2020: bool,
}

impl ColorValue {
    /// Builds a color from a perceptual triple (`lch2color`).
    ///
    /// Never fails: when the triple is outside sRGB the displayed color is
    /// found by chroma reduction, and the gamut flags record where the
    /// original triple actually lies.
    pub fn from_lch(mode: LchModel, lch: Lch) -> Self {
        let conv = mode.conversions();
        let xyz = (conv.lch_to_xyz)(lch);
        let direct = xyz_to_srgb(xyz);
        let within_srgb = is_within_gamut(direct);
        let rgb = if within_srgb {
            clamp_unit(direct)
        } else {
            let search = Bisection::for_axis(&conv.ranges.c);
            force_into_gamut(lch, |x| mode.lch_to_srgb(x), &search).rgb
        };
        let within_p3 = within_srgb || Gamut::DisplayP3.contains(xyz);
        let within_rec2020 = within_p3 || Gamut::Rec2020.contains(xyz);
        Self {
            mode,
            l: lch.l,
            c: lch.c,
            h: lch.h,
            r: rgb.r * 255.0,
            g: rgb.g * 255.0,
            b: rgb.b * 255.0,
            hex: rgb.to_hex(),
            within_srgb,
            within_p3,
            within_rec2020,
        }
    }

    /// Builds a color from an sRGB triple, clamped to [0, 1].
    ///
    /// Channels are quantized to 8 bits so `r`, `g`, `b` and `hex` agree exactly.
    pub fn from_srgb(mode: LchModel, rgb: Srgb) -> Self {
        let [r, g, b] = rgb.to_bytes();
        let rgb = Srgb::from_bytes(r, g, b);
        let lch = mode.srgb_to_lch(rgb);
        Self {
            mode,
            l: lch.l,
            c: lch.c,
            h: lch.h,
            r: r as f64,
            g: g as f64,
            b: b as f64,
            hex: rgb.to_hex(),
            within_srgb: true,
            within_p3: true,
            within_rec2020: true,
        }
    }

    /// Parses a hex (or other sRGB-based CSS) color (`hex2color`).
    pub fn from_hex(mode: LchModel, text: &str) -> Result<Self, PaletteError> {
        parse_srgb(text).map(|rgb| Self::from_srgb(mode, rgb))
    }

    /// Parses any supported CSS color, including wide-gamut `oklch()` and
    /// `lch()` notations (`anyToColor`).
    ///
    /// The color is checked in OKLCH whatever notation it was written in, so a
    /// CIE `lch()` hue above 360 is fine while a lightness just above white is
    /// not.
    pub fn parse(mode: LchModel, text: &str) -> Result<Self, PaletteError> {
        let parsed = parse_color(text)?;
        validate(parsed, text)?;
        let lch = mode.xyz_to_lch(parsed.to_xyz());
        let l = mode.ranges().l.clamp(lch.l);
        Ok(Self::from_lch(mode, Lch { l, ..lch }))
    }

    /// Opaque black in `mode`, used where imports find no readable color.
    pub fn black(mode: LchModel) -> Self {
        Self::from_srgb(mode, Srgb::from_bytes(0, 0, 0))
    }

    pub fn mode(&self) -> LchModel {
        self.mode
    }

    pub fn l(&self) -> f64 {
        self.l
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn lch(&self) -> Lch {
        Lch::new(self.l, self.c, self.h)
    }

    /// Channel values on 0..255 of the displayed (gamut-mapped) color.
    pub fn rgb(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// The displayed color as 8-bit channels; always matches [`Self::hex`].
    pub fn bytes(&self) -> [u8; 3] {
        let q = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn within_srgb(&self) -> bool {
        self.within_srgb
    }

    pub fn within_p3(&self) -> bool {
        self.within_p3
    }

    pub fn within_rec2020(&self) -> bool {
        self.within_rec2020
    }

    /// Same lightness at zero chroma.
    pub fn grayscale(&self) -> Self {
        Self::from_lch(self.mode, Lch::new(self.l, 0.0, 0.0))
    }

    /// Re-derives this color in another model from its displayed hex.
    pub fn with_mode(&self, mode: LchModel) -> Self {
        let [r, g, b] = self.bytes();
        Self::from_srgb(mode, Srgb::from_bytes(r, g, b))
    }
}

/// Checks the OKLCH form of any parsed color: l in [0, 1], c >= 0, and h in
/// [0, 360] unless c is 0.
fn validate(parsed: ParsedColor, text: &str) -> Result<(), PaletteError> {
    let lch = parsed.to_oklch_unit();
    let fail = |why: &str| Err(PaletteError::InvalidColor(format!("'{text}': {why}")));
    if lch.l < -LIGHTNESS_SLACK || lch.l > 1.0 + LIGHTNESS_SLACK {
        return fail("lightness out of range");
    }
    if lch.c < 0.0 {
        return fail("negative chroma");
    }
    if lch.c != 0.0 && !(0.0..=360.0).contains(&lch.h) {
        return fail("hue out of range");
    }
    Ok(())
}
