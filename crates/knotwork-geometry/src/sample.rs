//! Batch evaluation of curves and surfaces over uniform parameter grids.
//!
//! Every sample is independent, so the grids are evaluated in parallel with
//! rayon. The first failing sample aborts the batch with its error.

use knotwork_core::{Result, SplineError};
use knotwork_math::Point3;
use rayon::prelude::*;
use tracing::debug;

use crate::curve::Curve;
use crate::surface::Surface;

/// `count` evenly spaced parameters covering `[min, max]`.
///
/// The last value is exactly `max`; a single sample sits at `min`.
pub fn parameter_grid(min: f64, max: f64, count: usize) -> Result<Vec<f64>> {
    match count {
        0 => Err(SplineError::InvalidOperation(
            "sample count must be at least 1".into(),
        )),
        1 => Ok(vec![min]),
        _ => {
            let last = count - 1;
            Ok((0..count)
                .map(|i| {
                    if i == last {
                        max
                    } else {
                        min + (max - min) * i as f64 / last as f64
                    }
                })
                .collect())
        }
    }
}

/// Evaluate `curve` at `count` evenly spaced parameters across its domain.
pub fn sample_curve<C>(curve: &C, count: usize) -> Result<Vec<Point3>>
where
    C: Curve + ?Sized,
{
    let (t_min, t_max) = curve.domain();
    let params = parameter_grid(t_min, t_max, count)?;
    debug!(count, t_min, t_max, "sampling curve");

    params.par_iter().map(|&t| curve.evaluate(t)).collect()
}

/// Evaluate `surface` on a `u_count x v_count` grid across its domain.
///
/// `result[i][j]` is the point at the `i`-th u-parameter and `j`-th v-parameter.
pub fn sample_surface<S>(surface: &S, u_count: usize, v_count: usize) -> Result<Vec<Vec<Point3>>>
where
    S: Surface + ?Sized,
{
    let (u_min, u_max) = surface.domain_u();
    let (v_min, v_max) = surface.domain_v();
    let us = parameter_grid(u_min, u_max, u_count)?;
    let vs = parameter_grid(v_min, v_max, v_count)?;
    debug!(u_count, v_count, "sampling surface");

    us.par_iter()
        .map(|&u| {
            vs.iter()
                .map(|&v| surface.evaluate(u, v))
                .collect::<Result<Vec<_>>>()
        })
        .collect()
}
