//! Perceptual color models: OKLCH and CIELCH.
//!
//! The set of models is closed, so each [`LchModel`] tag resolves to a static
//! [`Conversions`] table instead of a trait object. Both models use lightness
//! on 0..100 so a palette can switch models without rescaling its UI axes.

use crate::color::{
    from_polar, lab_to_xyz, oklab_to_xyz, srgb_to_xyz, to_polar, xyz_to_lab, xyz_to_oklab,
    xyz_to_srgb, Lab, Lch, OkLab, Srgb, Xyz,
};
use crate::error::PaletteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bounds and editing granularity of one axis of a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Decimal places shown when the value is displayed.
    pub precision: u32,
}

impl AxisRange {
    /// Inclusive on both ends.
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Pins `v` to `[min, max]`.
    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Per-axis ranges of a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ranges {
    pub l: AxisRange,
    pub c: AxisRange,
    pub h: AxisRange,
}

/// Conversion function set for one perceptual model.
#[derive(Debug)]
pub struct Conversions {
    pub model: LchModel,
    pub ranges: Ranges,
    pub lch_to_xyz: fn(Lch) -> Xyz,
    pub xyz_to_lch: fn(Xyz) -> Lch,
}

const HUE_RANGE: AxisRange = AxisRange {
    min: 0.0,
    max: 360.0,
    step: 0.5,
    precision: 1,
};

const LIGHTNESS_RANGE: AxisRange = AxisRange {
    min: 0.0,
    max: 100.0,
    step: 0.5,
    precision: 1,
};

static OKLCH: Conversions = Conversions {
    model: LchModel::Oklch,
    ranges: Ranges {
        l: LIGHTNESS_RANGE,
        c: AxisRange {
            min: 0.0,
            max: 0.37,
            step: 0.001,
            precision: 3,
        },
        h: HUE_RANGE,
    },
    lch_to_xyz: oklch_to_xyz,
    xyz_to_lch: xyz_to_oklch,
};

static CIELCH: Conversions = Conversions {
    model: LchModel::Cielch,
    ranges: Ranges {
        l: LIGHTNESS_RANGE,
        c: AxisRange {
            min: 0.0,
            max: 134.0,
            step: 0.5,
            precision: 1,
        },
        h: HUE_RANGE,
    },
    lch_to_xyz: cielch_to_xyz,
    xyz_to_lch: xyz_to_cielch,
};

fn oklch_to_xyz(lch: Lch) -> Xyz {
    let (l, a, b) = from_polar(Lch {
        l: lch.l / 100.0,
        ..lch
    });
    oklab_to_xyz(OkLab { l, a, b })
}

fn xyz_to_oklch(xyz: Xyz) -> Lch {
    let lab = xyz_to_oklab(xyz);
    let lch = to_polar(lab.l, lab.a, lab.b);
    Lch {
        l: lch.l * 100.0,
        ..lch
    }
}

fn cielch_to_xyz(lch: Lch) -> Xyz {
    let (l, a, b) = from_polar(lch);
    lab_to_xyz(Lab { l, a, b })
}

fn xyz_to_cielch(xyz: Xyz) -> Lch {
    let lab = xyz_to_lab(xyz);
    to_polar(lab.l, lab.a, lab.b)
}

/// A perceptual lightness/chroma/hue model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LchModel {
    /// Cylindrical OKLab.
    Oklch,
    /// Cylindrical CIELAB (D65).
    #[default]
    Cielch,
}

impl LchModel {
    pub const ALL: [LchModel; 2] = [LchModel::Oklch, LchModel::Cielch];

    /// Looks up the conversion table for this model.
    pub fn conversions(self) -> &'static Conversions {
        match self {
            LchModel::Oklch => &OKLCH,
            LchModel::Cielch => &CIELCH,
        }
    }

    /// Lowercase name, as accepted by `FromStr` and written by serde.
    pub fn name(self) -> &'static str {
        match self {
            LchModel::Oklch => "oklch",
            LchModel::Cielch => "cielch",
        }
    }

    /// Slider bounds for each axis.
    pub fn ranges(self) -> &'static Ranges {
        &self.conversions().ranges
    }

    /// Converts model coordinates (lightness on 0..100) to D65 XYZ.
    pub fn lch_to_xyz(self, lch: Lch) -> Xyz {
        (self.conversions().lch_to_xyz)(lch)
    }

    /// Inverse of [`LchModel::lch_to_xyz`]. Achromatic colors get hue 0.
    pub fn xyz_to_lch(self, xyz: Xyz) -> Lch {
        (self.conversions().xyz_to_lch)(xyz)
    }

    /// Full conversion to gamma-encoded sRGB, unclamped.
    pub fn lch_to_srgb(self, lch: Lch) -> Srgb {
        xyz_to_srgb(self.lch_to_xyz(lch))
    }

    /// Gamma-encoded sRGB into this model.
    pub fn srgb_to_lch(self, rgb: Srgb) -> Lch {
        self.xyz_to_lch(srgb_to_xyz(rgb))
    }
}

impl fmt::Display for LchModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LchModel {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LchModel::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                PaletteError::Parse(format!(
                    "unknown color model '{s}', expected oklch or cielch"
                ))
            })
    }
}
