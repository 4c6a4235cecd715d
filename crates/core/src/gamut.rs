//! Gamut membership and gamut mapping.
//!
//! Out-of-gamut colors are repaired by reducing chroma at fixed lightness and
//! hue until the color fits sRGB. The search is a bounded bisection so it is
//! guaranteed to terminate; [`Bisection`] is kept separate from the color
//! math so it can be tested (and reused) on its own.

use crate::color::{rows_to_mat, Lch, Srgb, Xyz};
use crate::model::AxisRange;
use glam::DMat3;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Slack allowed on each side of [0, 1] when testing membership, so that
/// colors sitting exactly on the boundary survive floating-point noise.
pub const GAMUT_EPSILON: f64 = 1e-6;

/// Returns true if every encoded sRGB channel lies in [0, 1].
pub fn is_within_gamut(rgb: Srgb) -> bool {
    [rgb.r, rgb.g, rgb.b].iter().all(|&c| channel_in_unit(c))
}

fn channel_in_unit(c: f64) -> bool {
    (-GAMUT_EPSILON..=1.0 + GAMUT_EPSILON).contains(&c)
}

/// Clamps each channel to [0, 1].
pub fn clamp_unit(rgb: Srgb) -> Srgb {
    Srgb {
        r: rgb.r.clamp(0.0, 1.0),
        g: rgb.g.clamp(0.0, 1.0),
        b: rgb.b.clamp(0.0, 1.0),
    }
}

/// An RGB output gamut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gamut {
    Srgb,
    DisplayP3,
    Rec2020,
}

const P3_TO_XYZ_ROWS: [[f64; 3]; 3] = [
    [0.486_570_948_648_216_2, 0.265_667_693_169_093_06, 0.198_217_285_234_362_5],
    [0.228_974_564_069_748_8, 0.691_738_521_836_506_4, 0.079_286_914_093_745],
    [0.0, 0.045_113_381_858_902_64, 1.043_944_368_900_976],
];

const REC2020_TO_XYZ_ROWS: [[f64; 3]; 3] = [
    [0.636_958_048_301_291_4, 0.144_616_903_586_208_32, 0.168_880_975_164_172_1],
    [0.262_700_212_011_267_1, 0.677_998_071_518_870_8, 0.059_301_716_469_861_96],
    [0.0, 0.028_072_693_049_087_428, 1.060_985_057_710_791],
];

static XYZ_TO_P3: LazyLock<DMat3> = LazyLock::new(|| rows_to_mat(P3_TO_XYZ_ROWS).inverse());
static XYZ_TO_REC2020: LazyLock<DMat3> =
    LazyLock::new(|| rows_to_mat(REC2020_TO_XYZ_ROWS).inverse());

impl Gamut {
    /// Linear-light channels of `xyz` in this gamut's primaries.
    pub fn linear_channels(self, xyz: Xyz) -> [f64; 3] {
        let v = match self {
            Gamut::Srgb => {
                let lin = crate::color::xyz_to_linear(xyz);
                return [lin.r, lin.g, lin.b];
            }
            Gamut::DisplayP3 => *XYZ_TO_P3 * xyz.to_vec(),
            Gamut::Rec2020 => *XYZ_TO_REC2020 * xyz.to_vec(),
        };
        [v.x, v.y, v.z]
    }

    /// Returns true if `xyz` is displayable in this gamut.
    ///
    /// The transfer functions of all three spaces map [0, 1] onto itself, so
    /// testing linear channels is equivalent to testing encoded ones.
    pub fn contains(self, xyz: Xyz) -> bool {
        self.linear_channels(xyz).iter().all(|&c| channel_in_unit(c))
    }
}

/// Bounded bisection toward the boundary of a monotonic predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    /// Hard cap on predicate evaluations.
    pub max_iterations: u32,
    /// Stop once the bracket is at most this wide.
    pub tolerance: f64,
}

impl Default for Bisection {
    fn default() -> Self {
        Self {
            max_iterations: 32,
            tolerance: 1e-6,
        }
    }
}

impl Bisection {
    /// Search sized for a chroma axis: converges to 0.01% of the axis span.
    pub fn for_axis(range: &AxisRange) -> Self {
        Self {
            max_iterations: 32,
            tolerance: range.span() * 1e-4,
        }
    }

    /// Narrows `[low, high]` where `holds(low)` is assumed true and
    /// `holds(high)` false, returning the last midpoint known to hold (or `low`).
    ///
    /// The bracket may be given in either direction.
    pub fn boundary(&self, low: f64, high: f64, mut holds: impl FnMut(f64) -> bool) -> f64 {
        let (mut lo, mut hi) = (low, high);
        for _ in 0..self.max_iterations {
            if (hi - lo).abs() <= self.tolerance {
                break;
            }
            let mid = lo + (hi - lo) / 2.0;
            if holds(mid) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }
}

/// Result of gamut mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamutMapped {
    /// Encoded sRGB, every channel in [0, 1].
    pub rgb: Srgb,
    /// Chroma the returned color was computed with.
    pub chroma: f64,
    /// True when even zero chroma was out of gamut and channels were clamped.
    pub clamped: bool,
}

/// Maps `lch` into sRGB by reducing chroma at fixed lightness and hue.
///
/// `lch_to_rgb` is the model's full conversion to encoded sRGB. When the
/// direct conversion already fits, it is returned unchanged (apart from
/// clamping boundary noise).
pub fn force_into_gamut(
    lch: Lch,
    lch_to_rgb: impl Fn(Lch) -> Srgb,
    search: &Bisection,
) -> GamutMapped {
    let direct = lch_to_rgb(lch);
    if is_within_gamut(direct) {
        return GamutMapped {
            rgb: clamp_unit(direct),
            chroma: lch.c,
            clamped: false,
        };
    }

    let at = |c: f64| lch_to_rgb(Lch { c, ..lch });
    if !is_within_gamut(at(0.0)) {
        debug!(
            l = lch.l,
            c = lch.c,
            h = lch.h,
            "achromatic color out of gamut, clamping channels"
        );
        return GamutMapped {
            rgb: clamp_unit(direct),
            chroma: lch.c,
            clamped: true,
        };
    }

    let chroma = search.boundary(0.0, lch.c, |c| is_within_gamut(at(c)));
    trace!(from = lch.c, to = chroma, "reduced chroma into sRGB");
    GamutMapped {
        rgb: clamp_unit(at(chroma)),
        chroma,
        clamped: false,
    }
}
