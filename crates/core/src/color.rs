//! Color types and conversion functions for tonegrid.
//!
//! Provides the device types (`Srgb`, `LinearRgb`), the D65 connection space
//! (`Xyz`), the two rectangular perceptual spaces (`OkLab`, `Lab`) and the
//! cylindrical triple `Lch` shared by both perceptual models. All conversions
//! are pure functions over `f64`.
//!
//! Channel values are not clamped by these functions: colors outside the sRGB
//! gamut produce linear or encoded channels below 0 or above 1, which the
//! gamut module relies on to detect and repair them.

use crate::error::PaletteError;
use glam::{DMat3, DVec3};
use std::sync::LazyLock;

/// sRGB color with gamma-encoded components, nominally in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Linear-light RGB color (gamma-decoded) in the sRGB primaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// CIE XYZ tristimulus values relative to D65, with Y of reference white = 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// OKLab perceptual color space, lightness in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OkLab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// CIELAB (D65 reference white), lightness in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Lightness, chroma and hue in the units of a perceptual model.
///
/// Both models in [`crate::model::LchModel`] express lightness on 0..100;
/// chroma units are model specific; hue is in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl Lch {
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }
}

/// D65 reference white from its xy chromaticity (0.3127, 0.3290).
pub const D65: Xyz = Xyz {
    x: 0.3127 / 0.3290,
    y: 1.0,
    z: (1.0 - 0.3127 - 0.3290) / 0.3290,
};

/// Chroma below this is treated as achromatic and reports hue 0.
pub const ACHROMATIC_CHROMA: f64 = 1e-10;

const SRGB_TO_XYZ_ROWS: [[f64; 3]; 3] = [
    [0.412_390_799_265_959_5, 0.357_584_339_383_878, 0.180_480_788_401_834_3],
    [0.212_639_005_871_510_36, 0.715_168_678_767_755_9, 0.072_192_315_360_733_71],
    [0.019_330_818_715_591_85, 0.119_194_779_794_625_99, 0.950_532_152_249_660_6],
];

const XYZ_TO_LMS_ROWS: [[f64; 3]; 3] = [
    [0.819_022_437_996_703, 0.361_906_260_052_890_4, -0.128_873_781_520_987_9],
    [0.032_983_653_932_388_5, 0.929_286_861_586_343_4, 0.036_144_666_350_642_4],
    [0.048_177_189_359_624_2, 0.264_239_531_752_730_8, 0.633_547_828_469_430_9],
];

const LMS_TO_OKLAB_ROWS: [[f64; 3]; 3] = [
    [0.210_454_268_309_314, 0.793_617_774_702_305_4, -0.004_072_043_011_619_3],
    [1.977_998_532_431_168_4, -2.428_592_242_048_58, 0.450_593_709_617_411],
    [0.025_904_042_465_547_8, 0.782_771_712_457_529_6, -0.808_675_754_923_077_4],
];

/// Builds a glam matrix from row-major coefficients.
pub(crate) fn rows_to_mat(rows: [[f64; 3]; 3]) -> DMat3 {
    DMat3::from_cols_array_2d(&rows).transpose()
}

static SRGB_TO_XYZ: LazyLock<DMat3> = LazyLock::new(|| rows_to_mat(SRGB_TO_XYZ_ROWS));
static XYZ_TO_SRGB: LazyLock<DMat3> = LazyLock::new(|| SRGB_TO_XYZ.inverse());
static XYZ_TO_LMS: LazyLock<DMat3> = LazyLock::new(|| rows_to_mat(XYZ_TO_LMS_ROWS));
static LMS_TO_XYZ: LazyLock<DMat3> = LazyLock::new(|| XYZ_TO_LMS.inverse());
static LMS_TO_OKLAB: LazyLock<DMat3> = LazyLock::new(|| rows_to_mat(LMS_TO_OKLAB_ROWS));
static OKLAB_TO_LMS: LazyLock<DMat3> = LazyLock::new(|| LMS_TO_OKLAB.inverse());

impl Xyz {
    pub(crate) fn to_vec(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub(crate) fn from_vec(v: DVec3) -> Self {
        Xyz {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl Srgb {
    /// Builds a color from 8-bit channel values.
    pub fn from_bytes(r: u8, g: u8, b: u8) -> Srgb {
        Srgb {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Quantizes to 8-bit channels, clamping to [0, 1] first.
    pub fn to_bytes(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Parses a hex color string like "#ff00aa", "ff00aa" or "#f0a" (case insensitive).
    ///
    /// Returns `PaletteError::InvalidColor` if the input is not a 3- or 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, PaletteError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PaletteError::InvalidColor(format!(
                "non-hex digits in color: {hex}"
            )));
        }
        let channel = |s: &str, name: &str| {
            u8::from_str_radix(s, 16)
                .map_err(|e| PaletteError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        match hex.len() {
            6 => Ok(Srgb::from_bytes(
                channel(&hex[0..2], "red")?,
                channel(&hex[2..4], "green")?,
                channel(&hex[4..6], "blue")?,
            )),
            3 => Ok(Srgb::from_bytes(
                channel(&hex[0..1], "red")? * 17,
                channel(&hex[1..2], "green")? * 17,
                channel(&hex[2..3], "blue")? * 17,
            )),
            n => Err(PaletteError::InvalidColor(format!(
                "expected 3 or 6 hex digits, got {n}"
            ))),
        }
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    ///
    /// Components are quantized to 8-bit (0-255) with rounding.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Applies inverse sRGB gamma to a single component, mirrored for negatives.
pub fn srgb_component_to_linear(c: f64) -> f64 {
    let abs = c.abs();
    let lin = if abs <= 0.04045 {
        abs / 12.92
    } else {
        ((abs + 0.055) / 1.055).powf(2.4)
    };
    lin.copysign(c)
}

/// Applies sRGB gamma to a single linear component, mirrored for negatives.
pub fn linear_component_to_srgb(c: f64) -> f64 {
    let abs = c.abs();
    let enc = if abs <= 0.0031308 {
        abs * 12.92
    } else {
        1.055 * abs.powf(1.0 / 2.4) - 0.055
    };
    enc.copysign(c)
}

/// Converts sRGB to linear RGB by applying inverse sRGB gamma.
pub fn srgb_to_linear(c: Srgb) -> LinearRgb {
    LinearRgb {
        r: srgb_component_to_linear(c.r),
        g: srgb_component_to_linear(c.g),
        b: srgb_component_to_linear(c.b),
    }
}

/// Converts linear RGB to sRGB by applying sRGB gamma.
pub fn linear_to_srgb(c: LinearRgb) -> Srgb {
    Srgb {
        r: linear_component_to_srgb(c.r),
        g: linear_component_to_srgb(c.g),
        b: linear_component_to_srgb(c.b),
    }
}

/// Converts linear sRGB to XYZ (D65).
pub fn linear_to_xyz(c: LinearRgb) -> Xyz {
    Xyz::from_vec(*SRGB_TO_XYZ * DVec3::new(c.r, c.g, c.b))
}

/// Converts XYZ (D65) to linear sRGB. Out-of-gamut colors yield channels outside [0, 1].
pub fn xyz_to_linear(c: Xyz) -> LinearRgb {
    let v = *XYZ_TO_SRGB * c.to_vec();
    LinearRgb {
        r: v.x,
        g: v.y,
        b: v.z,
    }
}

/// Convenience: sRGB to XYZ via linear light.
pub fn srgb_to_xyz(c: Srgb) -> Xyz {
    linear_to_xyz(srgb_to_linear(c))
}

/// Convenience: XYZ to gamma-encoded sRGB, unclamped.
pub fn xyz_to_srgb(c: Xyz) -> Srgb {
    linear_to_srgb(xyz_to_linear(c))
}

/// Converts XYZ (D65) to OKLab.
pub fn xyz_to_oklab(c: Xyz) -> OkLab {
    let lms = *XYZ_TO_LMS * c.to_vec();
    let lab = *LMS_TO_OKLAB * DVec3::new(lms.x.cbrt(), lms.y.cbrt(), lms.z.cbrt());
    OkLab {
        l: lab.x,
        a: lab.y,
        b: lab.z,
    }
}

/// Converts OKLab to XYZ (D65).
pub fn oklab_to_xyz(c: OkLab) -> Xyz {
    let lms_ = *OKLAB_TO_LMS * DVec3::new(c.l, c.a, c.b);
    Xyz::from_vec(*LMS_TO_XYZ * (lms_ * lms_ * lms_))
}

const LAB_EPSILON: f64 = 216.0 / 24389.0;
const LAB_KAPPA: f64 = 24389.0 / 27.0;

/// Converts XYZ (D65) to CIELAB relative to the D65 white.
pub fn xyz_to_lab(c: Xyz) -> Lab {
    let f = |t: f64| {
        if t > LAB_EPSILON {
            t.cbrt()
        } else {
            (LAB_KAPPA * t + 16.0) / 116.0
        }
    };
    let fx = f(c.x / D65.x);
    let fy = f(c.y / D65.y);
    let fz = f(c.z / D65.z);
    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Converts CIELAB (D65 white) to XYZ.
pub fn lab_to_xyz(c: Lab) -> Xyz {
    let fy = (c.l + 16.0) / 116.0;
    let fx = c.a / 500.0 + fy;
    let fz = fy - c.b / 200.0;
    let finv = |f: f64| {
        let cube = f * f * f;
        if cube > LAB_EPSILON {
            cube
        } else {
            (116.0 * f - 16.0) / LAB_KAPPA
        }
    };
    let y = if c.l > LAB_KAPPA * LAB_EPSILON {
        fy * fy * fy
    } else {
        c.l / LAB_KAPPA
    };
    Xyz {
        x: finv(fx) * D65.x,
        y: y * D65.y,
        z: finv(fz) * D65.z,
    }
}

/// Converts rectangular opponent coordinates to lightness/chroma/hue.
///
/// NaN guard: if chroma is below [`ACHROMATIC_CHROMA`], hue is set to 0.0 to
/// avoid indeterminate `atan2(0, 0)` results.
pub fn to_polar(l: f64, a: f64, b: f64) -> Lch {
    let c = (a * a + b * b).sqrt();
    let h = if c < ACHROMATIC_CHROMA {
        0.0
    } else {
        b.atan2(a).to_degrees().rem_euclid(360.0)
    };
    Lch { l, c, h }
}

/// Converts lightness/chroma/hue to rectangular `(l, a, b)`.
pub fn from_polar(lch: Lch) -> (f64, f64, f64) {
    let h = lch.h.to_radians();
    (lch.l, lch.c * h.cos(), lch.c * h.sin())
}

/// Convenience: sRGB to CIELAB.
pub fn srgb_to_lab(c: Srgb) -> Lab {
    xyz_to_lab(srgb_to_xyz(c))
}

/// Convenience: sRGB to OKLCh with lightness on 0..1, as CSS `oklch()` writes it.
pub fn srgb_to_oklch_unit(c: Srgb) -> Lch {
    let lab = xyz_to_oklab(srgb_to_xyz(c));
    to_polar(lab.l, lab.a, lab.b)
}

/// Relative luminance (Y) of an sRGB color.
pub fn relative_luminance(c: Srgb) -> f64 {
    srgb_to_xyz(c).y
}
