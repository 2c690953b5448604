//! B-spline and NURBS curve implementations.

use knotwork_core::traits::{BoundingBox, Validate};
use knotwork_core::{Direction, Result, SplineError, Tolerance};
use knotwork_math::{Aabb3, DVec3, Point3};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::Curve;
use crate::nurbs::{all_basis, check_parameter, deboor, KnotVector};

fn control_hull(points: &[Point3]) -> (Point3, Point3) {
    Aabb3::from_points(points)
        .map(|b| (b.min, b.max))
        .unwrap_or((DVec3::ZERO, DVec3::ZERO))
}

pub(crate) fn check_weight(row: usize, column: usize, weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(SplineError::InvalidWeight {
            row,
            column,
            weight,
        })
    }
}

/// A B-spline curve defined by degree, knot vector, and control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BSplineCurveData")]
pub struct BSplineCurve {
    degree: usize,
    knots: KnotVector,
    control_points: Vec<Point3>,
}

#[derive(Deserialize)]
struct BSplineCurveData {
    degree: usize,
    knots: KnotVector,
    control_points: Vec<Point3>,
}

impl TryFrom<BSplineCurveData> for BSplineCurve {
    type Error = SplineError;

    fn try_from(data: BSplineCurveData) -> Result<Self> {
        Self::new(data.degree, data.knots, data.control_points)
    }
}

impl BSplineCurve {
    /// Build a curve, rejecting knot vectors whose length is not
    /// `control_points.len() + degree + 1` and degrees that need more points.
    pub fn new(degree: usize, knots: KnotVector, control_points: Vec<Point3>) -> Result<Self> {
        let curve = Self {
            degree,
            knots,
            control_points,
        };
        if let Err(err) = curve.validate() {
            debug!(%err, "rejected B-spline curve");
            return Err(err);
        }
        debug!(
            degree,
            control_points = curve.control_points.len(),
            domain = ?curve.domain(),
            "built B-spline curve"
        );
        Ok(curve)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    pub fn control_points(&self) -> &[Point3] {
        &self.control_points
    }

    /// Evaluate with a caller-chosen domain tolerance.
    pub fn evaluate_with(&self, t: f64, tol: Tolerance) -> Result<Point3> {
        let t = check_parameter(t, self.domain(), tol)?;
        Ok(deboor::curve_point(
            self.degree,
            self.knots.as_slice(),
            &self.control_points,
            t,
        ))
    }

    /// Weighted sum of every control point with its basis value at `t`.
    ///
    /// No domain check: outside the knot support, and at the last knot of a
    /// clamped vector, every basis value is 0 and the result is the zero vector.
    pub fn basis_sum(&self, t: f64) -> Point3 {
        all_basis(
            self.degree,
            self.knots.as_slice(),
            self.control_points.len(),
            t,
        )
        .iter()
        .zip(&self.control_points)
        .fold(DVec3::ZERO, |acc, (&b, &p)| acc + b * p)
    }
}

impl Validate for BSplineCurve {
    fn validate(&self) -> Result<()> {
        self.knots
            .check_layout(self.degree, self.control_points.len(), Direction::Curve)
    }
}

impl Curve for BSplineCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        self.evaluate_with(t, Tolerance::default())
    }

    fn domain(&self) -> (f64, f64) {
        self.knots.domain(self.degree)
    }
}

impl BoundingBox for BSplineCurve {
    type Point = Point3;

    fn bounding_box(&self) -> (Point3, Point3) {
        control_hull(&self.control_points)
    }
}

/// A NURBS (Non-Uniform Rational B-Spline) curve.
///
/// Every control point carries a non-negative weight; evaluation divides the
/// weighted sum by the sum of weighted basis values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NurbsCurveData")]
pub struct NurbsCurve {
    degree: usize,
    knots: KnotVector,
    control_points: Vec<Point3>,
    weights: Vec<f64>,
}

#[derive(Deserialize)]
struct NurbsCurveData {
    degree: usize,
    knots: KnotVector,
    control_points: Vec<Point3>,
    weights: Vec<f64>,
}

impl TryFrom<NurbsCurveData> for NurbsCurve {
    type Error = SplineError;

    fn try_from(data: NurbsCurveData) -> Result<Self> {
        Self::new(data.degree, data.knots, data.control_points, data.weights)
    }
}

impl NurbsCurve {
    pub fn new(
        degree: usize,
        knots: KnotVector,
        control_points: Vec<Point3>,
        weights: Vec<f64>,
    ) -> Result<Self> {
        let curve = Self {
            degree,
            knots,
            control_points,
            weights,
        };
        if let Err(err) = curve.validate() {
            debug!(%err, "rejected NURBS curve");
            return Err(err);
        }
        debug!(
            degree,
            control_points = curve.control_points.len(),
            "built NURBS curve"
        );
        Ok(curve)
    }

    /// Rational form of a B-spline curve with every weight set to 1.
    pub fn from_bspline(curve: BSplineCurve) -> Self {
        let weights = vec![1.0; curve.control_points.len()];
        Self {
            degree: curve.degree,
            knots: curve.knots,
            control_points: curve.control_points,
            weights,
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    pub fn control_points(&self) -> &[Point3] {
        &self.control_points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn evaluate_with(&self, t: f64, tol: Tolerance) -> Result<Point3> {
        let t = check_parameter(t, self.domain(), tol)?;
        deboor::rational_curve_point(
            self.degree,
            self.knots.as_slice(),
            &self.control_points,
            &self.weights,
            t,
        )
        .ok_or_else(|| {
            trace!(t, "rational curve denominator vanished");
            SplineError::ZeroDenominator { u: t, v: None }
        })
    }
}

impl Validate for NurbsCurve {
    fn validate(&self) -> Result<()> {
        self.knots
            .check_layout(self.degree, self.control_points.len(), Direction::Curve)?;
        if self.weights.len() != self.control_points.len() {
            return Err(SplineError::MalformedGrid(format!(
                "{} weights for {} control points",
                self.weights.len(),
                self.control_points.len()
            )));
        }
        self.weights
            .iter()
            .enumerate()
            .try_for_each(|(i, &w)| check_weight(0, i, w))
    }
}

impl Curve for NurbsCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        self.evaluate_with(t, Tolerance::default())
    }

    fn domain(&self) -> (f64, f64) {
        self.knots.domain(self.degree)
    }
}

impl BoundingBox for NurbsCurve {
    type Point = Point3;

    fn bounding_box(&self) -> (Point3, Point3) {
        control_hull(&self.control_points)
    }
}
