//! Surface traits and implementations.

mod bspline;

use knotwork_core::Result;
use knotwork_math::Point3;

pub use bspline::{BSplineSurface, NurbsSurface};

/// Trait for parametric surfaces over a rectangular control grid.
///
/// Rows run along the u-direction and columns along the v-direction.
pub trait Surface: Send + Sync {
    /// Evaluate the surface at parameters `(u, v)`.
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3>;

    /// Number of control points along the u-direction.
    fn row_count(&self) -> usize;

    /// Number of control points along the v-direction.
    fn column_count(&self) -> usize;

    /// Return the u-parameter domain `(u_min, u_max)`.
    fn domain_u(&self) -> (f64, f64);

    /// Return the v-parameter domain `(v_min, v_max)`.
    fn domain_v(&self) -> (f64, f64);
}
