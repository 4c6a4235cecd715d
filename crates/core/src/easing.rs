//! Easing curves used to redistribute lightness along a palette row.

use crate::error::PaletteError;
use crate::gamut::Bisection;
use std::fmt;
use std::str::FromStr;

/// A timing curve mapping progress `t` in [0, 1] to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`; `x1` and `x2` lie in [0, 1].
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Easing {
    /// Evaluates the curve. Input is clamped to [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                if t <= 0.0 {
                    return 0.0;
                }
                if t >= 1.0 {
                    return 1.0;
                }
                let search = Bisection {
                    max_iterations: 40,
                    tolerance: 1e-7,
                };
                let u = search.boundary(0.0, 1.0, |u| bezier_axis(u, x1, x2) <= t);
                bezier_axis(u, y1, y2)
            }
        }
    }
}

/// One coordinate of a cubic Bezier with end points 0 and 1.
fn bezier_axis(u: f64, p1: f64, p2: f64) -> f64 {
    let mu = 1.0 - u;
    3.0 * mu * mu * u * p1 + 3.0 * mu * u * u * p2 + u * u * u
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("linear"),
            Easing::EaseIn => f.write_str("ease-in"),
            Easing::EaseOut => f.write_str("ease-out"),
            Easing::EaseInOut => f.write_str("ease-in-out"),
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

impl FromStr for Easing {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        match key.as_str() {
            "linear" => return Ok(Easing::Linear),
            "ease-in" | "easein" => return Ok(Easing::EaseIn),
            "ease-out" | "easeout" => return Ok(Easing::EaseOut),
            "ease-in-out" | "easeinout" => return Ok(Easing::EaseInOut),
            _ => {}
        }
        let bad = || PaletteError::Parse(format!("unknown easing '{s}'"));
        let inner = key
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(bad)?;
        let values = inner
            .split(',')
            .map(|v| v.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(bad)?;
        let [x1, y1, x2, y2] = values[..] else {
            return Err(bad());
        };
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(PaletteError::Parse(format!(
                "cubic-bezier x values must lie in [0, 1]: '{s}'"
            )));
        }
        Ok(Easing::CubicBezier { x1, y1, x2, y2 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-4;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn named_curves_at_midpoint() {
        assert!(approx_eq(Easing::Linear.apply(0.5), 0.5));
        assert!(approx_eq(Easing::EaseIn.apply(0.5), 0.25));
        assert!(approx_eq(Easing::EaseOut.apply(0.5), 0.75));
        assert!(approx_eq(Easing::EaseInOut.apply(0.5), 0.5));
        assert!(approx_eq(Easing::EaseInOut.apply(0.25), 0.125));
    }

    #[test]
    fn curves_fix_end_points() {
        let bezier: Easing = "cubic-bezier(0.4, 0, 0.2, 1)".parse().unwrap();
        for e in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            bezier,
        ] {
            assert!(approx_eq(e.apply(0.0), 0.0), "{e}");
            assert!(approx_eq(e.apply(1.0), 1.0), "{e}");
        }
    }

    #[test]
    fn linear_bezier_is_identity() {
        let e = Easing::CubicBezier {
            x1: 0.25,
            y1: 0.25,
            x2: 0.75,
            y2: 0.75,
        };
        for t in [0.1, 0.3, 0.5, 0.9] {
            assert!(approx_eq(e.apply(t), t), "t={t}: {}", e.apply(t));
        }
    }

    #[test]
    fn bezier_ease_out_is_above_diagonal() {
        let e: Easing = "cubic-bezier(0, 0, 0.58, 1)".parse().unwrap();
        assert!(e.apply(0.5) > 0.5);
    }

    #[test]
    fn parses_names_and_bezier() {
        assert_eq!("EaseIn".parse::<Easing>().unwrap(), Easing::EaseIn);
        assert_eq!("ease-in-out".parse::<Easing>().unwrap(), Easing::EaseInOut);
        assert_eq!(
            "cubic-bezier(0.4,0,0.2,1)".parse::<Easing>().unwrap(),
            Easing::CubicBezier {
                x1: 0.4,
                y1: 0.0,
                x2: 0.2,
                y2: 1.0
            }
        );
        assert!("cubic-bezier(0.4, 0, 0.2)".parse::<Easing>().is_err());
        assert!("cubic-bezier(1.5, 0, 0.2, 1)".parse::<Easing>().is_err());
        assert!("bounce".parse::<Easing>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for text in ["linear", "ease-in", "ease-out", "ease-in-out", "cubic-bezier(0.4, 0, 0.2, 1)"] {
            let e: Easing = text.parse().unwrap();
            assert_eq!(e.to_string(), text);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn bezier_is_monotonic_for_monotonic_controls(
                x1 in 0.0_f64..=1.0,
                y1 in 0.0_f64..=1.0,
                x2 in 0.0_f64..=1.0,
                y2 in 0.0_f64..=1.0,
                a in 0.0_f64..=1.0,
                b in 0.0_f64..=1.0,
            ) {
                let e = Easing::CubicBezier { x1, y1, x2, y2 };
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(e.apply(lo) <= e.apply(hi) + 1e-6);
            }
        }
    }
}
