//! Knot vectors and knot span lookup for B-spline/NURBS evaluation.

use std::ops::Index;

use knotwork_core::traits::Validate;
use knotwork_core::{Direction, Result, SplineError, Tolerance};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::basis::one_basis;

/// A non-decreasing sequence of finite knot values.
///
/// Construction validates the ordering; the vector is immutable afterwards.
/// Curves and surfaces take their knot vectors by value, so a bound vector is
/// never shared with the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct KnotVector {
    knots: Vec<f64>,
}

impl KnotVector {
    pub fn new(knots: Vec<f64>) -> Result<Self> {
        let kv = Self { knots };
        kv.validate()?;
        Ok(kv)
    }

    /// Open uniform knot vector on `[0, 1]` for `count` control points.
    ///
    /// The first and last knots are repeated `degree + 1` times and the
    /// interior knots are evenly spaced.
    pub fn clamped_uniform(degree: usize, count: usize) -> Result<Self> {
        if count <= degree {
            return Err(SplineError::DegreeTooHigh { degree, count });
        }
        let interior = count - degree - 1;
        let mut knots = Vec::with_capacity(count + degree + 1);
        knots.extend(std::iter::repeat(0.0).take(degree + 1));
        knots.extend((1..=interior).map(|i| i as f64 / (interior + 1) as f64));
        knots.extend(std::iter::repeat(1.0).take(degree + 1));
        Self::new(knots)
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.knots.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.knots
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.knots.iter().copied()
    }

    /// Valid parameter interval `(knots[p], knots[len - p - 1])` for degree `p`.
    ///
    /// # Panics
    /// If the vector holds fewer than `degree + 1` knots.
    pub fn domain(&self, degree: usize) -> (f64, f64) {
        (self.knots[degree], self.knots[self.knots.len() - degree - 1])
    }

    /// Number of knots equal to `value` within the knot tolerance.
    pub fn multiplicity(&self, value: f64, tol: Tolerance) -> usize {
        self.knots.iter().filter(|&&k| tol.knot_eq(k, value)).count()
    }

    /// Whether both ends repeat their knot `degree + 1` times.
    pub fn is_clamped(&self, degree: usize, tol: Tolerance) -> bool {
        let (Some(&first), Some(&last)) = (self.knots.first(), self.knots.last()) else {
            return false;
        };
        self.knots.len() >= 2 * (degree + 1)
            && self.knots[..=degree].iter().all(|&k| tol.knot_eq(k, first))
            && self.knots[self.knots.len() - degree - 1..]
                .iter()
                .all(|&k| tol.knot_eq(k, last))
    }

    /// Cox-de Boor basis function `N_{i,degree}(t)` over this knot vector.
    ///
    /// Fails if the function's support `knots[i..=i + degree + 1]` runs past
    /// the end of the vector.
    pub fn basis(&self, i: usize, degree: usize, t: f64) -> Result<f64> {
        let fits = i
            .checked_add(degree)
            .and_then(|last| last.checked_add(1))
            .is_some_and(|last| last < self.knots.len());
        if !fits {
            return Err(SplineError::InvalidOperation(format!(
                "basis N[{i},{degree}] runs past the {} knots of the vector",
                self.knots.len()
            )));
        }
        Ok(one_basis(i, degree, &self.knots, t))
    }

    /// Check that this vector fits `count` control points of the given degree:
    /// `count > degree`, `len == count + degree + 1`, and a non-empty domain.
    pub fn check_layout(&self, degree: usize, count: usize, direction: Direction) -> Result<()> {
        if count <= degree {
            return Err(SplineError::DegreeTooHigh { degree, count });
        }
        let expected = count + degree + 1;
        if self.knots.len() != expected {
            return Err(SplineError::KnotCountMismatch {
                direction,
                expected,
                actual: self.knots.len(),
            });
        }
        let (min, max) = self.domain(degree);
        if min >= max {
            return Err(SplineError::InvalidKnots(format!(
                "empty {direction} parameter domain [{min}, {max}]"
            )));
        }
        Ok(())
    }
}

impl Validate for KnotVector {
    fn validate(&self) -> Result<()> {
        if self.knots.is_empty() {
            return Err(SplineError::InvalidKnots("knot vector is empty".into()));
        }
        if let Some(i) = self.knots.iter().position(|k| !k.is_finite()) {
            return Err(SplineError::InvalidKnots(format!(
                "knot {i} is not finite: {}",
                self.knots[i]
            )));
        }
        if let Some(i) = self.knots.windows(2).position(|w| w[1] < w[0]) {
            return Err(SplineError::InvalidKnots(format!(
                "knots decrease at index {}: {} > {}",
                i + 1,
                self.knots[i],
                self.knots[i + 1]
            )));
        }
        Ok(())
    }
}

impl Index<usize> for KnotVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.knots[index]
    }
}

impl AsRef<[f64]> for KnotVector {
    fn as_ref(&self) -> &[f64] {
        &self.knots
    }
}

impl TryFrom<Vec<f64>> for KnotVector {
    type Error = SplineError;

    fn try_from(knots: Vec<f64>) -> Result<Self> {
        Self::new(knots)
    }
}

impl From<KnotVector> for Vec<f64> {
    fn from(kv: KnotVector) -> Self {
        kv.knots
    }
}

/// Check `t` against `domain`, snapping values within the parametric slack.
pub fn check_parameter(t: f64, domain: (f64, f64), tol: Tolerance) -> Result<f64> {
    let (min, max) = domain;
    tol.snap_to_domain(t, min, max).ok_or_else(|| {
        trace!(t, min, max, "parameter rejected");
        SplineError::OutOfDomain { value: t, min, max }
    })
}

/// Find the knot span index for parameter `t` in the knot vector.
///
/// Returns the index `i` such that `knots[i] <= t < knots[i+1]`. At or past the
/// upper end `knots[n+1]` the last non-empty span is returned, so the domain
/// is closed on the right; below `knots[degree]` the first non-empty span is.
///
/// # Arguments
/// * `degree` - Degree of the B-spline
/// * `knots` - The knot vector, with a non-empty domain
/// * `n` - Number of control points minus 1
/// * `t` - Parameter value
pub fn find_span(degree: usize, knots: &[f64], n: usize, t: f64) -> usize {
    if t >= knots[n + 1] {
        let mut span = n;
        while span > degree && knots[span] >= knots[span + 1] {
            span -= 1;
        }
        return span;
    }
    if t < knots[degree] {
        let mut span = degree;
        while span < n && knots[span] >= knots[span + 1] {
            span += 1;
        }
        return span;
    }

    // Binary search with knots[low] <= t < knots[high]
    let mut low = degree;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;

    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }

    mid
}
