//! NURBS core algorithms: knot vectors, basis functions, and span-based evaluation.

pub mod basis;
pub mod deboor;
pub mod knot;

pub use basis::{all_basis, one_basis, one_basis_recursive, span_basis};
pub use knot::{check_parameter, find_span, KnotVector};
