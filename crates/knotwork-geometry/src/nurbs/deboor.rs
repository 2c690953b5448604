//! Span-based evaluation of B-spline and NURBS curves and surfaces.
//!
//! Each evaluator locates the knot span once per direction, computes the
//! `degree + 1` non-vanishing basis values, and accumulates only over them.
//! The basis values come from the same recurrence as the literal Cox-de Boor
//! sums, so inside the domain both give the same bits.
//!
//! Rational evaluators return `None` when the weighted basis sum is exactly
//! zero; callers turn that into an error. When every contributing weight is
//! exactly 1 they return the weighted sum undivided, which is then the
//! non-rational point bit for bit.

use knotwork_math::{DVec3, Point3};

use super::basis::span_basis;
use super::knot::find_span;

/// Non-vanishing basis row at `t` and the index of its first control point.
fn basis_row(degree: usize, knots: &[f64], count: usize, t: f64) -> (usize, Vec<f64>) {
    let span = find_span(degree, knots, count - 1, t);
    (span - degree, span_basis(degree, knots, span, t))
}

/// Accumulated `sum(b * w * P)` and `sum(b * w)` with a flag for all-unit weights.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RationalSum {
    numerator: Point3,
    denominator: f64,
    unit_weights: bool,
}

impl RationalSum {
    pub(crate) fn new() -> Self {
        Self {
            numerator: DVec3::ZERO,
            denominator: 0.0,
            unit_weights: true,
        }
    }

    #[inline]
    pub(crate) fn add(&mut self, basis: f64, weight: f64, point: Point3) {
        let bw = basis * weight;
        self.numerator += bw * point;
        self.denominator += bw;
        self.unit_weights &= weight == 1.0;
    }

    /// The rational point, or `None` when the denominator vanished.
    pub(crate) fn finish(self) -> Option<Point3> {
        if self.denominator == 0.0 {
            None
        } else if self.unit_weights {
            Some(self.numerator)
        } else {
            Some(self.numerator / self.denominator)
        }
    }
}

/// Evaluate a B-spline curve point at parameter `t`.
pub fn curve_point(degree: usize, knots: &[f64], control_points: &[Point3], t: f64) -> Point3 {
    let (first, basis) = basis_row(degree, knots, control_points.len(), t);

    basis
        .iter()
        .zip(&control_points[first..])
        .fold(DVec3::ZERO, |acc, (&b, &p)| acc + b * p)
}

/// Evaluate a rational B-spline (NURBS) curve point at parameter `t`.
pub fn rational_curve_point(
    degree: usize,
    knots: &[f64],
    control_points: &[Point3],
    weights: &[f64],
    t: f64,
) -> Option<Point3> {
    let (first, basis) = basis_row(degree, knots, control_points.len(), t);

    let mut sum = RationalSum::new();
    for ((&b, &w), &p) in basis.iter().zip(&weights[first..]).zip(&control_points[first..]) {
        sum.add(b, w, p);
    }
    sum.finish()
}

/// Evaluate a B-spline surface point at parameters `(u, v)`.
pub fn surface_point(
    degree_u: usize,
    degree_v: usize,
    knots_u: &[f64],
    knots_v: &[f64],
    control_points: &[Vec<Point3>],
    u: f64,
    v: f64,
) -> Point3 {
    let (first_u, basis_u) = basis_row(degree_u, knots_u, control_points.len(), u);
    let (first_v, basis_v) = basis_row(degree_v, knots_v, control_points[0].len(), v);

    let mut point = DVec3::ZERO;
    for (i, &bu) in basis_u.iter().enumerate() {
        let row = &control_points[first_u + i][first_v..];
        for (&bv, &cp) in basis_v.iter().zip(row) {
            point += bu * bv * cp;
        }
    }

    point
}

/// Evaluate a NURBS surface point at parameters `(u, v)`.
#[allow(clippy::too_many_arguments)]
pub fn rational_surface_point(
    degree_u: usize,
    degree_v: usize,
    knots_u: &[f64],
    knots_v: &[f64],
    control_points: &[Vec<Point3>],
    weights: &[Vec<f64>],
    u: f64,
    v: f64,
) -> Option<Point3> {
    let (first_u, basis_u) = basis_row(degree_u, knots_u, control_points.len(), u);
    let (first_v, basis_v) = basis_row(degree_v, knots_v, control_points[0].len(), v);

    let mut sum = RationalSum::new();
    for (i, &bu) in basis_u.iter().enumerate() {
        let (points, ws) = (&control_points[first_u + i], &weights[first_u + i]);
        for (j, &bv) in basis_v.iter().enumerate() {
            sum.add(bu * bv, ws[first_v + j], points[first_v + j]);
        }
    }
    sum.finish()
}
