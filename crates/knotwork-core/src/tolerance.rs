/// Tolerances for knot comparisons and parameter domain checks.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Distance below which two knot values count as the same knot
    pub knot: f64,
    /// Slack allowed outside a parameter domain before a value is rejected.
    /// Values inside the slack are snapped onto the nearest bound.
    pub parametric: f64,
}

impl Tolerance {
    pub const DEFAULT_KNOT: f64 = 1e-12;
    pub const DEFAULT_PARAMETRIC: f64 = 1e-10;

    pub fn new(knot: f64, parametric: f64) -> Self {
        Self { knot, parametric }
    }

    pub fn default_precision() -> Self {
        Self {
            knot: Self::DEFAULT_KNOT,
            parametric: Self::DEFAULT_PARAMETRIC,
        }
    }

    pub fn loose() -> Self {
        Self {
            knot: 1e-9,
            parametric: 1e-6,
        }
    }

    pub fn tight() -> Self {
        Self {
            knot: 1e-14,
            parametric: 1e-14,
        }
    }

    /// No slack at all: only parameters exactly inside the domain are accepted.
    pub fn exact() -> Self {
        Self {
            knot: 0.0,
            parametric: 0.0,
        }
    }

    /// Check if two knot values coincide within knot tolerance
    pub fn knot_eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.knot
    }

    /// Snap `t` onto `[min, max]` if it lies within the parametric slack.
    ///
    /// Returns `None` for values further out, and for NaN.
    pub fn snap_to_domain(self, t: f64, min: f64, max: f64) -> Option<f64> {
        if t.is_nan() {
            return None;
        }
        if t < min {
            (min - t <= self.parametric).then_some(min)
        } else if t > max {
            (t - max <= self.parametric).then_some(max)
        } else {
            Some(t)
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
