//! Curve traits and implementations.

mod bspline;

use knotwork_core::Result;
use knotwork_math::Point3;

pub use bspline::{BSplineCurve, NurbsCurve};
pub(crate) use bspline::check_weight;

/// Trait for parametric curves in 3D space.
pub trait Curve: Send + Sync {
    /// Evaluate the curve at parameter `t`.
    ///
    /// Parameters outside [`Curve::domain`] fail with `OutOfDomain`.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);
}
