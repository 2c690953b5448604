use crate::error::Result;

/// Check the structural invariants of a curve, surface, or knot vector.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Axis-aligned box enclosing an entity's control hull.
pub trait BoundingBox {
    type Point;
    fn bounding_box(&self) -> (Self::Point, Self::Point);
}
