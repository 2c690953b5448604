//! Cox-de Boor basis functions.
//!
//! `N_{i,0}(t)` is 1 on the half-open interval `[knots[i], knots[i+1])` and 0
//! elsewhere. For `j > 0`:
//!
//! ```text
//! N_{i,j}(t) = a * N_{i,j-1}(t) + b * N_{i+1,j-1}(t)
//! a = (t - knots[i]) / (knots[i+j] - knots[i])
//! b = 1 - (t - knots[i+1]) / (knots[i+j+1] - knots[i+1])
//! ```
//!
//! where each fraction with a zero denominator is taken as 0. The table-based
//! routines here perform exactly the arithmetic of the recursion, entry by
//! entry, so their results are bit-identical to [`one_basis_recursive`].

/// `num / den`, or 0 when the knot difference `den` is zero.
#[inline]
fn knot_ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

#[inline]
fn step(knots: &[f64], i: usize, t: f64) -> f64 {
    if knots[i] <= t && t < knots[i + 1] {
        1.0
    } else {
        0.0
    }
}

/// Blend `N_{i,j-1}` and `N_{i+1,j-1}` into `N_{i,j}`.
#[inline]
fn raise(knots: &[f64], i: usize, j: usize, t: f64, lower: f64, upper: f64) -> f64 {
    let a = knot_ratio(t - knots[i], knots[i + j] - knots[i]);
    let b = 1.0 - knot_ratio(t - knots[i + 1], knots[i + j + 1] - knots[i + 1]);
    a * lower + b * upper
}

/// Literal Cox-de Boor recursion. Exponential in `degree`; kept as the
/// reference the table-based routines are checked against.
///
/// # Panics
/// If `i + degree + 1 >= knots.len()`.
pub fn one_basis_recursive(i: usize, degree: usize, knots: &[f64], t: f64) -> f64 {
    if degree == 0 {
        return step(knots, i, t);
    }
    let lower = one_basis_recursive(i, degree - 1, knots, t);
    let upper = one_basis_recursive(i + 1, degree - 1, knots, t);
    raise(knots, i, degree, t, lower, upper)
}

/// Basis function `N_{i,degree}(t)` from a bottom-up triangular table.
///
/// Runs in `O(degree^2)` time with one `degree + 1` scratch row.
///
/// # Panics
/// If `i + degree + 1 >= knots.len()`.
pub fn one_basis(i: usize, degree: usize, knots: &[f64], t: f64) -> f64 {
    let mut n: Vec<f64> = (0..=degree).map(|k| step(knots, i + k, t)).collect();

    for j in 1..=degree {
        for k in 0..=degree - j {
            n[k] = raise(knots, i + k, j, t, n[k], n[k + 1]);
        }
    }

    n[0]
}

/// All `count` basis functions `N_{0,degree}(t) .. N_{count-1,degree}(t)`.
///
/// Shares one triangular table across every index, so a full row costs
/// `O(count * degree)`. Values outside the knot support come out as 0.
///
/// # Panics
/// If `count + degree >= knots.len()`.
pub fn all_basis(degree: usize, knots: &[f64], count: usize, t: f64) -> Vec<f64> {
    let width = count + degree;
    let mut n: Vec<f64> = (0..width).map(|i| step(knots, i, t)).collect();

    for j in 1..=degree {
        for i in 0..width - j {
            n[i] = raise(knots, i, j, t, n[i], n[i + 1]);
        }
    }

    n.truncate(count);
    n
}

/// The `degree + 1` basis functions that can be non-zero on knot span `span`,
/// `N_{span-degree,degree}(t)` through `N_{span,degree}(t)`.
///
/// The degree-0 row is 1 at `span` and 0 elsewhere. Inside `[knots[span],
/// knots[span+1])` that is exactly the half-open step row, so the values are
/// bit-identical to [`one_basis_recursive`]. At the last knot of the domain it
/// closes the interval on the right.
///
/// # Panics
/// If `span < degree` or `span + degree + 1 >= knots.len()`.
pub fn span_basis(degree: usize, knots: &[f64], span: usize, t: f64) -> Vec<f64> {
    let first = span - degree;
    let width = 2 * degree + 1;
    let mut n: Vec<f64> = (0..width)
        .map(|k| if first + k == span { 1.0 } else { 0.0 })
        .collect();

    for j in 1..=degree {
        for k in 0..width - j {
            n[k] = raise(knots, first + k, j, t, n[k], n[k + 1]);
        }
    }

    n.truncate(degree + 1);
    n
}
