//! B-spline and NURBS surface implementations.

use knotwork_core::traits::{BoundingBox, Validate};
use knotwork_core::{Direction, Result, SplineError, Tolerance};
use knotwork_math::{Aabb3, DVec3, Point3};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::Surface;
use crate::curve::check_weight;
use crate::nurbs::deboor::{self, RationalSum};
use crate::nurbs::{all_basis, check_parameter, KnotVector};

/// Check that `grid` is non-empty and rectangular; returns `(rows, columns)`.
fn grid_shape(grid: &[Vec<Point3>]) -> Result<(usize, usize)> {
    let columns = grid
        .first()
        .map(Vec::len)
        .ok_or_else(|| SplineError::MalformedGrid("control grid has no rows".into()))?;
    if columns == 0 {
        return Err(SplineError::MalformedGrid("control grid has empty rows".into()));
    }
    if let Some((i, row)) = grid.iter().enumerate().find(|(_, row)| row.len() != columns) {
        return Err(SplineError::MalformedGrid(format!(
            "row {i} has {} points, row 0 has {columns}",
            row.len()
        )));
    }
    Ok((grid.len(), columns))
}

fn check_layout(
    degree_u: usize,
    degree_v: usize,
    knots_u: &KnotVector,
    knots_v: &KnotVector,
    control_points: &[Vec<Point3>],
) -> Result<()> {
    let (rows, columns) = grid_shape(control_points)?;
    knots_u.check_layout(degree_u, rows, Direction::U)?;
    knots_v.check_layout(degree_v, columns, Direction::V)
}

fn grid_hull(grid: &[Vec<Point3>]) -> (Point3, Point3) {
    Aabb3::from_points(grid.iter().flatten())
        .map(|b| (b.min, b.max))
        .unwrap_or((DVec3::ZERO, DVec3::ZERO))
}

/// A B-spline surface defined by degrees, knot vectors, and a 2D grid of control points.
///
/// `control_points[i][j]` is the control point at row `i` (u-direction) and
/// column `j` (v-direction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BSplineSurfaceData")]
pub struct BSplineSurface {
    degree_u: usize,
    degree_v: usize,
    knots_u: KnotVector,
    knots_v: KnotVector,
    control_points: Vec<Vec<Point3>>,
}

#[derive(Deserialize)]
struct BSplineSurfaceData {
    degree_u: usize,
    degree_v: usize,
    knots_u: KnotVector,
    knots_v: KnotVector,
    control_points: Vec<Vec<Point3>>,
}

impl TryFrom<BSplineSurfaceData> for BSplineSurface {
    type Error = SplineError;

    fn try_from(data: BSplineSurfaceData) -> Result<Self> {
        Self::new(
            data.degree_u,
            data.degree_v,
            data.knots_u,
            data.knots_v,
            data.control_points,
        )
    }
}

impl BSplineSurface {
    pub fn new(
        degree_u: usize,
        degree_v: usize,
        knots_u: KnotVector,
        knots_v: KnotVector,
        control_points: Vec<Vec<Point3>>,
    ) -> Result<Self> {
        let surface = Self {
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            control_points,
        };
        if let Err(err) = surface.validate() {
            debug!(%err, "rejected B-spline surface");
            return Err(err);
        }
        debug!(
            degree_u,
            degree_v,
            rows = surface.row_count(),
            columns = surface.column_count(),
            "built B-spline surface"
        );
        Ok(surface)
    }

    pub fn degrees(&self) -> (usize, usize) {
        (self.degree_u, self.degree_v)
    }

    pub fn knots_u(&self) -> &KnotVector {
        &self.knots_u
    }

    pub fn knots_v(&self) -> &KnotVector {
        &self.knots_v
    }

    pub fn control_points(&self) -> &[Vec<Point3>] {
        &self.control_points
    }

    pub fn evaluate_with(&self, u: f64, v: f64, tol: Tolerance) -> Result<Point3> {
        let u = check_parameter(u, self.domain_u(), tol)?;
        let v = check_parameter(v, self.domain_v(), tol)?;
        Ok(deboor::surface_point(
            self.degree_u,
            self.degree_v,
            self.knots_u.as_slice(),
            self.knots_v.as_slice(),
            &self.control_points,
            u,
            v,
        ))
    }

    /// Tensor-product sum over the whole grid, without a domain check.
    pub fn basis_sum(&self, u: f64, v: f64) -> Point3 {
        let basis_u = all_basis(self.degree_u, self.knots_u.as_slice(), self.row_count(), u);
        let basis_v = all_basis(self.degree_v, self.knots_v.as_slice(), self.column_count(), v);

        let mut point = DVec3::ZERO;
        for (&bu, row) in basis_u.iter().zip(&self.control_points) {
            for (&bv, &cp) in basis_v.iter().zip(row) {
                point += bu * bv * cp;
            }
        }
        point
    }
}

impl Validate for BSplineSurface {
    fn validate(&self) -> Result<()> {
        check_layout(
            self.degree_u,
            self.degree_v,
            &self.knots_u,
            &self.knots_v,
            &self.control_points,
        )
    }
}

impl Surface for BSplineSurface {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        self.evaluate_with(u, v, Tolerance::default())
    }

    fn row_count(&self) -> usize {
        self.control_points.len()
    }

    fn column_count(&self) -> usize {
        self.control_points[0].len()
    }

    fn domain_u(&self) -> (f64, f64) {
        self.knots_u.domain(self.degree_u)
    }

    fn domain_v(&self) -> (f64, f64) {
        self.knots_v.domain(self.degree_v)
    }
}

impl BoundingBox for BSplineSurface {
    type Point = Point3;

    fn bounding_box(&self) -> (Point3, Point3) {
        grid_hull(&self.control_points)
    }
}

/// A NURBS surface (rational B-spline surface).
///
/// `weights[i][j]` belongs to `control_points[i][j]`. Weights are
/// non-negative; with every weight equal to 1 the surface coincides with the
/// [`BSplineSurface`] over the same grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NurbsSurfaceData")]
pub struct NurbsSurface {
    degree_u: usize,
    degree_v: usize,
    knots_u: KnotVector,
    knots_v: KnotVector,
    control_points: Vec<Vec<Point3>>,
    weights: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct NurbsSurfaceData {
    degree_u: usize,
    degree_v: usize,
    knots_u: KnotVector,
    knots_v: KnotVector,
    control_points: Vec<Vec<Point3>>,
    weights: Vec<Vec<f64>>,
}

impl TryFrom<NurbsSurfaceData> for NurbsSurface {
    type Error = SplineError;

    fn try_from(data: NurbsSurfaceData) -> Result<Self> {
        Self::new(
            data.degree_u,
            data.degree_v,
            data.knots_u,
            data.knots_v,
            data.control_points,
            data.weights,
        )
    }
}

impl NurbsSurface {
    pub fn new(
        degree_u: usize,
        degree_v: usize,
        knots_u: KnotVector,
        knots_v: KnotVector,
        control_points: Vec<Vec<Point3>>,
        weights: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let surface = Self {
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            control_points,
            weights,
        };
        if let Err(err) = surface.validate() {
            debug!(%err, "rejected NURBS surface");
            return Err(err);
        }
        debug!(
            degree_u,
            degree_v,
            rows = surface.row_count(),
            columns = surface.column_count(),
            domain_u = ?surface.domain_u(),
            domain_v = ?surface.domain_v(),
            "built NURBS surface"
        );
        Ok(surface)
    }

    /// Rational form of a B-spline surface with every weight set to 1.
    pub fn from_bspline(surface: BSplineSurface) -> Self {
        let weights = surface
            .control_points
            .iter()
            .map(|row| vec![1.0; row.len()])
            .collect();
        Self {
            degree_u: surface.degree_u,
            degree_v: surface.degree_v,
            knots_u: surface.knots_u,
            knots_v: surface.knots_v,
            control_points: surface.control_points,
            weights,
        }
    }

    pub fn degrees(&self) -> (usize, usize) {
        (self.degree_u, self.degree_v)
    }

    pub fn knots_u(&self) -> &KnotVector {
        &self.knots_u
    }

    pub fn knots_v(&self) -> &KnotVector {
        &self.knots_v
    }

    pub fn control_points(&self) -> &[Vec<Point3>] {
        &self.control_points
    }

    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    pub fn evaluate_with(&self, u: f64, v: f64, tol: Tolerance) -> Result<Point3> {
        let u = check_parameter(u, self.domain_u(), tol)?;
        let v = check_parameter(v, self.domain_v(), tol)?;
        deboor::rational_surface_point(
            self.degree_u,
            self.degree_v,
            self.knots_u.as_slice(),
            self.knots_v.as_slice(),
            &self.control_points,
            &self.weights,
            u,
            v,
        )
        .ok_or_else(|| zero_denominator(u, v))
    }

    /// Rational tensor-product sum over the whole grid.
    ///
    /// Each direction's basis row is computed once and reused across the
    /// other direction. There is no domain check: outside the knot support
    /// every basis product is 0 and the call fails with `ZeroDenominator`.
    pub fn rational_sum(&self, u: f64, v: f64) -> Result<Point3> {
        let basis_u = all_basis(self.degree_u, self.knots_u.as_slice(), self.row_count(), u);
        let basis_v = all_basis(self.degree_v, self.knots_v.as_slice(), self.column_count(), v);

        let mut sum = RationalSum::new();
        for ((&bu, points), ws) in basis_u.iter().zip(&self.control_points).zip(&self.weights) {
            for ((&bv, &cp), &w) in basis_v.iter().zip(points).zip(ws) {
                sum.add(bu * bv, w, cp);
            }
        }
        sum.finish().ok_or_else(|| zero_denominator(u, v))
    }
}

fn zero_denominator(u: f64, v: f64) -> SplineError {
    trace!(u, v, "rational surface denominator vanished");
    SplineError::ZeroDenominator { u, v: Some(v) }
}

impl Validate for NurbsSurface {
    fn validate(&self) -> Result<()> {
        check_layout(
            self.degree_u,
            self.degree_v,
            &self.knots_u,
            &self.knots_v,
            &self.control_points,
        )?;
        if self.weights.len() != self.control_points.len() {
            return Err(SplineError::MalformedGrid(format!(
                "{} weight rows for {} point rows",
                self.weights.len(),
                self.control_points.len()
            )));
        }
        for (i, (ws, pts)) in self.weights.iter().zip(&self.control_points).enumerate() {
            if ws.len() != pts.len() {
                return Err(SplineError::MalformedGrid(format!(
                    "weight row {i} has {} entries, point row has {}",
                    ws.len(),
                    pts.len()
                )));
            }
            for (j, &w) in ws.iter().enumerate() {
                check_weight(i, j, w)?;
            }
        }
        Ok(())
    }
}

impl Surface for NurbsSurface {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        self.evaluate_with(u, v, Tolerance::default())
    }

    fn row_count(&self) -> usize {
        self.control_points.len()
    }

    fn column_count(&self) -> usize {
        self.control_points[0].len()
    }

    fn domain_u(&self) -> (f64, f64) {
        self.knots_u.domain(self.degree_u)
    }

    fn domain_v(&self) -> (f64, f64) {
        self.knots_v.domain(self.degree_v)
    }
}

impl BoundingBox for NurbsSurface {
    type Point = Point3;

    fn bounding_box(&self) -> (Point3, Point3) {
        grid_hull(&self.control_points)
    }
}
