//! Easing curves.
//!
//! A [`Curve`] maps linear leg progress (0.0 to 1.0) to eased progress. The
//! controller never evaluates it itself; it is handed to the progress driver
//! together with the leg durations.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::error::{LoopError, LoopResult};

/// Easing function applied by the progress driver
#[derive(Clone, Default)]
pub enum Curve {
    /// Constant speed
    #[default]
    Linear,
    /// Starts slow, ends fast
    EaseIn,
    /// Starts fast, ends slow
    EaseOut,
    /// Slow start and end, fast middle
    EaseInOut,
    /// CSS cubic-bezier curve (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
    /// User-defined function
    Custom(Arc<dyn Fn(f32) -> f32 + Send + Sync>),
}

impl Curve {
    /// Evaluate the curve at `t`. Input is clamped to [0, 1]; the end points
    /// always map to themselves so leg bounds stay exact.
    pub fn transform(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Curve::Linear => t,
            Curve::EaseIn => t * t,
            Curve::EaseOut => t * (2.0 - t),
            Curve::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Curve::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, *x1, *y1, *x2, *y2),
            Curve::Custom(f) => f(t),
        }
    }

    /// Create a custom curve from a closure
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        Curve::Custom(Arc::new(f))
    }

    /// Reject bezier control points whose x lies outside [0, 1]. Such a
    /// curve is not a function of time and would make progress jump.
    pub fn validate(&self) -> LoopResult<()> {
        if let Curve::CubicBezier(x1, _, x2, _) = self {
            let unit = 0.0..=1.0;
            if !unit.contains(x1) || !unit.contains(x2) {
                return Err(LoopError::InvalidConfiguration(format!(
                    "cubic-bezier x control points must lie in [0, 1], got {x1} and {x2}"
                )));
            }
        }
        Ok(())
    }

    /// Config-file name of the curve (custom curves have none)
    pub fn name(&self) -> &'static str {
        match self {
            Curve::Linear => "linear",
            Curve::EaseIn => "ease-in",
            Curve::EaseOut => "ease-out",
            Curve::EaseInOut => "ease-in-out",
            Curve::CubicBezier(..) => "cubic-bezier",
            Curve::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "CubicBezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
            other => f.write_str(other.name()),
        }
    }
}

/// Curves compare by shape. Two custom closures are never equal, which makes
/// a reconfiguration with a custom curve always count as a curve change.
impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Curve::Linear, Curve::Linear)
            | (Curve::EaseIn, Curve::EaseIn)
            | (Curve::EaseOut, Curve::EaseOut)
            | (Curve::EaseInOut, Curve::EaseInOut) => true,
            (Curve::CubicBezier(a, b, c, d), Curve::CubicBezier(e, f, g, h)) => {
                a == e && b == f && c == g && d == h
            }
            (Curve::Custom(a), Curve::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Parses `linear`, `ease-in`, `ease-out`, `ease-in-out` and
/// `cubic-bezier(x1, y1, x2, y2)`.
impl FromStr for Curve {
    type Err = LoopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "linear" => Ok(Curve::Linear),
            "ease-in" | "ease_in" | "easein" => Ok(Curve::EaseIn),
            "ease-out" | "ease_out" | "easeout" => Ok(Curve::EaseOut),
            "ease-in-out" | "ease_in_out" | "easeinout" => Ok(Curve::EaseInOut),
            bezier if bezier.starts_with("cubic-bezier(") && bezier.ends_with(')') => {
                let inner = &bezier["cubic-bezier(".len()..bezier.len() - 1];
                let points = inner
                    .split(',')
                    .map(|p| p.trim().parse::<f32>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| LoopError::Parse(format!("curve \"{s}\": {e}")))?;
                match points.as_slice() {
                    [x1, y1, x2, y2] => {
                        let curve = Curve::CubicBezier(*x1, *y1, *x2, *y2);
                        curve.validate()?;
                        Ok(curve)
                    }
                    _ => Err(LoopError::Parse(format!(
                        "curve \"{s}\": expected 4 control points, got {}",
                        points.len()
                    ))),
                }
            }
            _ => Err(LoopError::Parse(format!("unknown curve: \"{s}\""))),
        }
    }
}

impl<'de> Deserialize<'de> for Curve {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Cubic bezier evaluation, solving x(t) = input with Newton-Raphson.
/// Requires x1 and x2 in [0, 1] (see [`Curve::validate`]).
fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let mut current_t = t;
    for _ in 0..8 {
        let current_x = bezier_axis(current_t, x1, x2);
        let slope = bezier_slope(current_t, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        current_t -= (current_x - t) / slope;
    }
    bezier_axis(current_t, y1, y2)
}

fn bezier_axis(t: f32, p1: f32, p2: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

fn bezier_slope(t: f32, p1: f32, p2: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}
