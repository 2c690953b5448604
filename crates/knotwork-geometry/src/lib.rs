//! Knotwork geometry: knot vectors, B-spline curves, and NURBS surfaces.

pub mod curve;
pub mod nurbs;
pub mod sample;
pub mod surface;

pub use curve::{BSplineCurve, Curve, NurbsCurve};
pub use nurbs::KnotVector;
pub use surface::{BSplineSurface, NurbsSurface, Surface};
