use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

const EPSILON: f64 = 1e-7;
const NEWTON_ITERATIONS: usize = 8;

/// CSS timing functions a rotation can be animated with.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum TimingCurve {
    #[strum(to_string = "linear")]
    Linear,
    #[strum(to_string = "ease")]
    Ease,
    #[strum(to_string = "ease-in", serialize = "ease_in")]
    EaseIn,
    #[strum(to_string = "ease-out", serialize = "ease_out")]
    EaseOut,
    #[default]
    #[strum(to_string = "ease-in-out", serialize = "ease_in_out")]
    EaseInOut,
}

impl TimingCurve {
    fn bezier(self) -> Option<CubicBezier> {
        let (x1, y1, x2, y2) = match self {
            Self::Linear => return None,
            Self::Ease => (0.25, 0.1, 0.25, 1.0),
            Self::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => (0.42, 0.0, 0.58, 1.0),
        };
        Some(CubicBezier { x1, y1, x2, y2 })
    }

    /// Maps linear progress in `[0, 1]` to eased progress. Input is clamped.
    pub fn sample(self, progress: f64) -> f64 {
        let t = progress.clamp(0.0, 1.0);
        self.bezier().map_or(t, |curve| curve.solve(t))
    }
}

/// Cubic bezier with fixed end points (0, 0) and (1, 1).
#[derive(Debug, Clone, Copy)]
struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    fn coordinate(p1: f64, p2: f64, s: f64) -> f64 {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        ((a * s + b) * s + c) * s
    }

    fn slope_x(&self, s: f64) -> f64 {
        let c = 3.0 * self.x1;
        let b = 3.0 * (self.x2 - self.x1) - c;
        let a = 1.0 - c - b;
        (3.0 * a * s + 2.0 * b) * s + c
    }

    fn x(&self, s: f64) -> f64 {
        Self::coordinate(self.x1, self.x2, s)
    }

    fn y(&self, s: f64) -> f64 {
        Self::coordinate(self.y1, self.y2, s)
    }

    /// Finds the curve parameter for `x` (Newton first, bisection as fallback) and returns its `y`.
    fn solve(&self, x: f64) -> f64 {
        let mut s = x;
        for _ in 0..NEWTON_ITERATIONS {
            let error = self.x(s) - x;
            if error.abs() < EPSILON {
                return self.y(s);
            }
            let slope = self.slope_x(s);
            if slope.abs() < 1e-6 {
                break;
            }
            s -= error / slope;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        while hi - lo > EPSILON {
            let value = self.x(s);
            if (value - x).abs() < EPSILON {
                break;
            }
            if value < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        self.y(s)
    }
}
