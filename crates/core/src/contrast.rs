//! Contrast and color-difference metrics.
//!
//! All functions take CSS color strings (hex, named, `rgb()`, `hsl()`) and fail
//! with [`PaletteError::InvalidColor`] when one cannot be parsed.
//!
//! - WCAG 2.x contrast ratio: symmetric, in [1, 21].
//! - APCA (W3 0.0.98G constants): signed Lc, positive for dark text on a
//!   light background. Argument order matters.
//! - Delta E: CIEDE2000 over CIELAB (D65). Symmetric, 0 for identical colors.

use crate::color::{relative_luminance, srgb_to_lab, Lab, Srgb};
use crate::error::PaletteError;
use crate::parse::parse_srgb;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// WCAG 2.x contrast ratio between two colors.
pub fn wcag_contrast(a: &str, b: &str) -> Result<f64, PaletteError> {
    Ok(wcag_ratio(parse_srgb(a)?, parse_srgb(b)?))
}

fn wcag_ratio(a: Srgb, b: Srgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

// APCA-W3 constants.
const APCA_COEF: [f64; 3] = [0.212_672_9, 0.715_152_2, 0.072_175_0];
const APCA_GAMMA: f64 = 2.4;
const BLACK_THRESHOLD: f64 = 0.022;
const BLACK_CLAMP: f64 = 1.414;
const NORM_BG: f64 = 0.56;
const NORM_TXT: f64 = 0.57;
const REV_BG: f64 = 0.65;
const REV_TXT: f64 = 0.62;
const SCALE: f64 = 1.14;
const OFFSET: f64 = 0.027;
const LO_CLIP: f64 = 0.1;
const DELTA_Y_MIN: f64 = 0.0005;

fn apca_luminance(c: Srgb) -> f64 {
    let y: f64 = [c.r, c.g, c.b]
        .iter()
        .zip(APCA_COEF)
        .map(|(&ch, k)| k * ch.clamp(0.0, 1.0).powf(APCA_GAMMA))
        .sum();
    if y < BLACK_THRESHOLD {
        y + (BLACK_THRESHOLD - y).powf(BLACK_CLAMP)
    } else {
        y
    }
}

/// APCA lightness contrast (Lc) of `foreground` text on `background`.
///
/// Positive values mean dark text on a light background, negative values
/// light text on a dark background. Near-identical luminances give 0.
pub fn apca_contrast(background: &str, foreground: &str) -> Result<f64, PaletteError> {
    Ok(apca_lc(parse_srgb(background)?, parse_srgb(foreground)?))
}

fn apca_lc(background: Srgb, foreground: Srgb) -> f64 {
    let y_bg = apca_luminance(background);
    let y_txt = apca_luminance(foreground);
    if (y_bg - y_txt).abs() < DELTA_Y_MIN {
        return 0.0;
    }
    if y_bg > y_txt {
        let sapc = (y_bg.powf(NORM_BG) - y_txt.powf(NORM_TXT)) * SCALE;
        if sapc < LO_CLIP {
            0.0
        } else {
            (sapc - OFFSET) * 100.0
        }
    } else {
        let sapc = (y_bg.powf(REV_BG) - y_txt.powf(REV_TXT)) * SCALE;
        if sapc > -LO_CLIP {
            0.0
        } else {
            (sapc + OFFSET) * 100.0
        }
    }
}

/// CIEDE2000 color difference.
pub fn delta_e_contrast(a: &str, b: &str) -> Result<f64, PaletteError> {
    Ok(ciede2000(srgb_to_lab(parse_srgb(a)?), srgb_to_lab(parse_srgb(b)?)))
}

/// CIEDE2000 with unit parametric factors.
pub fn ciede2000(lab1: Lab, lab2: Lab) -> f64 {
    const POW25_7: f64 = 6_103_515_625.0;

    let c1 = lab1.a.hypot(lab1.b);
    let c2 = lab2.a.hypot(lab2.b);
    let c_mean7 = ((c1 + c2) / 2.0).powi(7);
    let g = 0.5 * (1.0 - (c_mean7 / (c_mean7 + POW25_7)).sqrt());

    let a1 = lab1.a * (1.0 + g);
    let a2 = lab2.a * (1.0 + g);
    let c1p = a1.hypot(lab1.b);
    let c2p = a2.hypot(lab2.b);
    let h1p = hue_degrees(a1, lab1.b);
    let h2p = hue_degrees(a2, lab2.b);

    let dl = lab2.l - lab1.l;
    let dc = c2p - c1p;
    let chroma_product = c1p * c2p;
    let dh = if chroma_product == 0.0 {
        0.0
    } else {
        let d = h2p - h1p;
        if d > 180.0 {
            d - 360.0
        } else if d < -180.0 {
            d + 360.0
        } else {
            d
        }
    };
    let dh_big = 2.0 * chroma_product.sqrt() * (dh.to_radians() / 2.0).sin();

    let l_mean = (lab1.l + lab2.l) / 2.0;
    let cp_mean = (c1p + c2p) / 2.0;
    let hp_mean = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let hr = hp_mean.to_radians();
    let t = 1.0 - 0.17 * (hr - PI / 6.0).cos()
        + 0.24 * (2.0 * hr).cos()
        + 0.32 * (3.0 * hr + PI / 30.0).cos()
        - 0.20 * (4.0 * hr - 63f64.to_radians()).cos();

    let l50 = (l_mean - 50.0).powi(2);
    let sl = 1.0 + 0.015 * l50 / (20.0 + l50).sqrt();
    let sc = 1.0 + 0.045 * cp_mean;
    let sh = 1.0 + 0.015 * cp_mean * t;

    let d_theta = 30.0 * (-((hp_mean - 275.0) / 25.0).powi(2)).exp();
    let cp_mean7 = cp_mean.powi(7);
    let rc = 2.0 * (cp_mean7 / (cp_mean7 + POW25_7)).sqrt();
    let rt = -(2.0 * d_theta).to_radians().sin() * rc;

    let tl = dl / sl;
    let tc = dc / sc;
    let th = dh_big / sh;
    (tl * tl + tc * tc + th * th + rt * tc * th).max(0.0).sqrt()
}

fn hue_degrees(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        0.0
    } else {
        b.atan2(a).to_degrees().rem_euclid(360.0)
    }
}

/// Returns the candidate with the highest WCAG contrast against `hex`.
///
/// Ties go to the earliest candidate.
pub fn get_most_contrast<'a>(hex: &str, candidates: &[&'a str]) -> Result<&'a str, PaletteError> {
    let base = parse_srgb(hex)?;
    let mut best: Option<(&'a str, f64)> = None;
    for &candidate in candidates {
        let ratio = wcag_ratio(base, parse_srgb(candidate)?);
        match best {
            Some((_, r)) if ratio <= r => {}
            _ => best = Some((candidate, ratio)),
        }
    }
    best.map(|(c, _)| c).ok_or(PaletteError::NoCandidates)
}

/// Metric shown on swatches when comparing against a reference color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContrastMetric {
    Wcag,
    #[default]
    Apca,
    DeltaE,
}

impl ContrastMetric {
    pub const ALL: [ContrastMetric; 3] = [
        ContrastMetric::Wcag,
        ContrastMetric::Apca,
        ContrastMetric::DeltaE,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ContrastMetric::Wcag => "wcag",
            ContrastMetric::Apca => "apca",
            ContrastMetric::DeltaE => "delta-e",
        }
    }

    /// Measures `hex` against the reference color `versus`.
    ///
    /// For APCA the reference is the background.
    pub fn measure(self, versus: &str, hex: &str) -> Result<f64, PaletteError> {
        match self {
            ContrastMetric::Wcag => wcag_contrast(versus, hex),
            ContrastMetric::Apca => apca_contrast(versus, hex),
            ContrastMetric::DeltaE => delta_e_contrast(versus, hex),
        }
    }

    /// The value as printed on a swatch: floored to one decimal.
    pub fn overlay_label(self, versus: &str, hex: &str) -> Result<f64, PaletteError> {
        self.measure(versus, hex).map(|v| (v * 10.0).floor() / 10.0)
    }
}

impl fmt::Display for ContrastMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContrastMetric {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        ContrastMetric::ALL
            .into_iter()
            .find(|m| m.name() == key || (key == "deltae" && *m == ContrastMetric::DeltaE))
            .ok_or_else(|| {
                PaletteError::Parse(format!(
                    "unknown contrast metric '{s}', expected wcag, apca or delta-e"
                ))
            })
    }
}

/// Which ink is used for text drawn on a swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InkMode {
    White,
    Black,
    /// Whichever of black and white reads better.
    #[default]
    Max,
}

impl InkMode {
    /// Text color for a swatch filled with `hex`.
    pub fn ink_for(self, hex: &str) -> Result<&'static str, PaletteError> {
        match self {
            InkMode::White => Ok("#fff"),
            InkMode::Black => Ok("#000"),
            InkMode::Max => get_most_contrast(hex, &["#000", "#fff"]),
        }
    }
}

impl FromStr for InkMode {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(InkMode::White),
            "black" => Ok(InkMode::Black),
            "max" => Ok(InkMode::Max),
            _ => Err(PaletteError::Parse(format!(
                "unknown ink mode '{s}', expected white, black or max"
            ))),
        }
    }
}
