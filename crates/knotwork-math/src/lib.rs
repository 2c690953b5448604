//! Knotwork math primitives.
//!
//! Curves and surfaces share one immutable 3-component value type. `DVec3`
//! is `Copy`, compares by value, and provides `+`, `-`, `v * s`, `s * v` and
//! `v / s`, which is all the evaluators need.

pub mod aabb;

pub use aabb::Aabb3;
pub use glam::{dvec3, DVec3};

pub type Point3 = DVec3;
pub type Vector3 = DVec3;
