use approx::assert_abs_diff_eq;
use knotwork_core::traits::BoundingBox;
use knotwork_core::SplineError;
use knotwork_geometry::nurbs::{all_basis, one_basis, one_basis_recursive};
use knotwork_geometry::sample::{sample_curve, sample_surface};
use knotwork_geometry::{BSplineCurve, BSplineSurface, Curve, KnotVector, NurbsSurface, Surface};
use knotwork_math::{dvec3, Aabb3, Point3};

fn knots(values: &[f64]) -> KnotVector {
    KnotVector::new(values.to_vec()).unwrap()
}

fn assert_point_eq(actual: Point3, expected: Point3) {
    assert!(
        (actual - expected).length() < 1e-12,
        "expected {expected:?}, got {actual:?}"
    );
}

/// 4x5 bicubic-by-quadratic grid with a bump in the middle.
fn wavy_grid() -> Vec<Vec<Point3>> {
    (0..4)
        .map(|i| {
            (0..5)
                .map(|j| {
                    let z = ((i * 7 + j * 3) % 5) as f64 * 0.25;
                    dvec3(i as f64, j as f64, z)
                })
                .collect()
        })
        .collect()
}

fn wavy_bspline() -> BSplineSurface {
    BSplineSurface::new(
        3,
        2,
        KnotVector::clamped_uniform(3, 4).unwrap(),
        knots(&[0.0, 0.0, 0.0, 0.3, 0.7, 1.0, 1.0, 1.0]),
        wavy_grid(),
    )
    .unwrap()
}

#[test]
fn test_linear_curve_midpoint() {
    let curve = BSplineCurve::new(
        1,
        knots(&[0.0, 0.0, 1.0, 1.0]),
        vec![dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0)],
    )
    .unwrap();
    assert_point_eq(curve.evaluate(0.5).unwrap(), dvec3(0.5, 0.0, 0.0));
}

#[test]
fn test_quadratic_curve_domain_bounds() {
    let points = vec![dvec3(1.0, 2.0, 3.0), dvec3(4.0, -1.0, 0.5), dvec3(-2.0, 0.0, 7.0)];
    let kv = knots(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    let curve = BSplineCurve::new(2, kv, points.clone()).unwrap();

    assert_eq!(curve.evaluate(0.0).unwrap(), points[0]);
    assert_point_eq(curve.evaluate(1.0).unwrap(), points[2]);
}

#[test]
fn test_endpoint_interpolation_clamped_cubic() {
    let points: Vec<Point3> = (0..7)
        .map(|i| dvec3(i as f64, (i * i) as f64 * 0.1, -(i as f64)))
        .collect();
    let kv = KnotVector::clamped_uniform(3, 7).unwrap();
    let curve = BSplineCurve::new(3, kv, points.clone()).unwrap();
    let (t_min, t_max) = curve.domain();

    assert_point_eq(curve.evaluate(t_min).unwrap(), points[0]);
    assert_point_eq(curve.evaluate(t_max).unwrap(), points[6]);
}

#[test]
fn test_bilinear_rational_surface_centroid() {
    let surface = NurbsSurface::new(
        1,
        1,
        knots(&[0.0, 0.0, 1.0, 1.0]),
        knots(&[0.0, 0.0, 1.0, 1.0]),
        vec![
            vec![dvec3(0.0, 0.0, 0.0), dvec3(0.0, 1.0, 0.0)],
            vec![dvec3(1.0, 0.0, 0.0), dvec3(1.0, 1.0, 0.0)],
        ],
        vec![vec![1.0, 1.0], vec![1.0, 1.0]],
    )
    .unwrap();

    assert_point_eq(surface.evaluate(0.5, 0.5).unwrap(), dvec3(0.5, 0.5, 0.0));
    assert_eq!(surface.row_count(), 2);
    assert_eq!(surface.column_count(), 2);
}

#[test]
fn test_partition_of_unity_non_uniform() {
    let kv = [0.0, 0.0, 0.0, 0.2, 0.2, 0.5, 0.9, 1.0, 1.0, 1.0];
    let degree = 2;
    let count = kv.len() - degree - 1;
    for k in 0..100 {
        let t = k as f64 / 100.0;
        let sum: f64 = (0..count).map(|i| one_basis(i, degree, &kv, t)).sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_degree_zero_step_any_knots() {
    let kv = [-1.0, 0.5, 0.5, 2.0, 8.0];
    for i in 0..kv.len() - 1 {
        for k in -20..=100 {
            let t = k as f64 / 10.0;
            let expected = if kv[i] <= t && t < kv[i + 1] { 1.0 } else { 0.0 };
            assert_eq!(one_basis(i, 0, &kv, t), expected);
        }
    }
}

#[test]
fn test_iterative_basis_matches_recursive_definition() {
    let kv = [0.0, 0.1, 0.1, 0.1, 0.4, 0.55, 0.7, 0.7, 1.0, 1.2, 1.3, 1.3];
    for degree in 0..=4 {
        let count = kv.len() - degree - 1;
        for k in -5..=140 {
            let t = k as f64 / 100.0;
            let row = all_basis(degree, &kv, count, t);
            for (i, value) in row.iter().enumerate() {
                let reference = one_basis_recursive(i, degree, &kv, t);
                assert_eq!(value.to_bits(), reference.to_bits(), "i={i} p={degree} t={t}");
            }
        }
    }
}

#[test]
fn test_rational_with_unit_weights_matches_bspline_surface() {
    let plain = wavy_bspline();
    let rational = NurbsSurface::from_bspline(plain.clone());

    for a in 0..=50 {
        for b in 0..=50 {
            let (u, v) = (a as f64 / 50.0, b as f64 / 50.0);
            let expected = plain.evaluate(u, v).unwrap();
            assert_eq!(rational.evaluate(u, v).unwrap(), expected, "u={u} v={v}");
            if a < 50 && b < 50 {
                assert_eq!(rational.rational_sum(u, v).unwrap(), expected, "u={u} v={v}");
                assert_eq!(plain.basis_sum(u, v), expected, "u={u} v={v}");
            }
        }
    }
}

#[test]
fn test_curve_evaluate_matches_literal_recursive_sum() {
    let kv = [0.0, 0.0, 0.0, 0.0, 0.13, 0.37, 0.37, 0.71, 1.0, 1.0, 1.0, 1.0];
    let points: Vec<Point3> = (0..8)
        .map(|i| dvec3(i as f64 * 0.7, ((i * 5) % 3) as f64 - 1.1, (i as f64).sqrt()))
        .collect();
    let curve = BSplineCurve::new(3, knots(&kv), points.clone()).unwrap();

    for k in 0..1000 {
        let t = k as f64 / 1000.0;
        let literal = points
            .iter()
            .enumerate()
            .fold(Point3::ZERO, |acc, (i, &p)| acc + one_basis_recursive(i, 3, &kv, t) * p);
        assert_eq!(curve.evaluate(t).unwrap(), literal, "t={t}");
    }
}

#[test]
fn test_surface_corners_interpolate_clamped_grid() {
    let surface = wavy_bspline();
    let grid = wavy_grid();
    assert_point_eq(surface.evaluate(0.0, 0.0).unwrap(), grid[0][0]);
    assert_point_eq(surface.evaluate(1.0, 0.0).unwrap(), grid[3][0]);
    assert_point_eq(surface.evaluate(0.0, 1.0).unwrap(), grid[0][4]);
    assert_point_eq(surface.evaluate(1.0, 1.0).unwrap(), grid[3][4]);
}

#[test]
fn test_points_stay_inside_control_hull() {
    let weights: Vec<Vec<f64>> = (0..4)
        .map(|i| (0..5).map(|j| 0.5 + ((i + j) % 3) as f64).collect())
        .collect();
    let surface = NurbsSurface::new(
        3,
        2,
        KnotVector::clamped_uniform(3, 4).unwrap(),
        KnotVector::clamped_uniform(2, 5).unwrap(),
        wavy_grid(),
        weights,
    )
    .unwrap();
    let (min, max) = surface.bounding_box();
    let hull = Aabb3::new(min, max).expanded(1e-12);

    for row in sample_surface(&surface, 9, 9).unwrap() {
        for p in row {
            assert!(hull.contains_point(p), "{p:?} outside control hull");
        }
    }
}

#[test]
fn test_domain_errors_are_distinct() {
    let surface = wavy_bspline();
    assert!(matches!(
        surface.evaluate(1.5, 0.5),
        Err(SplineError::OutOfDomain { value, .. }) if value == 1.5
    ));

    let zero = NurbsSurface::new(
        1,
        1,
        knots(&[0.0, 0.0, 1.0, 1.0]),
        knots(&[0.0, 0.0, 1.0, 1.0]),
        vec![vec![dvec3(0.0, 0.0, 0.0); 2]; 2],
        vec![vec![0.0; 2]; 2],
    )
    .unwrap();
    assert!(matches!(
        zero.evaluate(0.25, 0.75),
        Err(SplineError::ZeroDenominator { .. })
    ));
}

#[test]
fn test_zero_point_with_weights_is_a_valid_origin() {
    let origin = NurbsSurface::new(
        1,
        1,
        knots(&[0.0, 0.0, 1.0, 1.0]),
        knots(&[0.0, 0.0, 1.0, 1.0]),
        vec![vec![dvec3(0.0, 0.0, 0.0); 2]; 2],
        vec![vec![1.0, 2.0], vec![0.5, 1.0]],
    )
    .unwrap();
    assert_eq!(origin.evaluate(0.25, 0.75).unwrap(), Point3::ZERO);
    assert_eq!(origin.rational_sum(0.25, 0.75).unwrap(), Point3::ZERO);

    let unit = NurbsSurface::new(
        1,
        1,
        knots(&[0.0, 0.0, 1.0, 1.0]),
        knots(&[0.0, 0.0, 1.0, 1.0]),
        vec![vec![dvec3(0.0, 0.0, 0.0); 2]; 2],
        vec![vec![1.0; 2]; 2],
    )
    .unwrap();
    assert_eq!(unit.evaluate(0.25, 0.75).unwrap(), Point3::ZERO);
}

#[test]
fn test_knot_vector_is_owned_after_binding() {
    let mut source = vec![0.0, 0.0, 1.0, 1.0];
    let curve = BSplineCurve::new(
        1,
        KnotVector::new(source.clone()).unwrap(),
        vec![dvec3(0.0, 0.0, 0.0), dvec3(2.0, 0.0, 0.0)],
    )
    .unwrap();
    source[2] = 5.0;

    assert_eq!(curve.knots().as_slice(), &[0.0, 0.0, 1.0, 1.0]);
    assert_point_eq(curve.evaluate(0.5).unwrap(), dvec3(1.0, 0.0, 0.0));
}

#[test]
fn test_concurrent_evaluation_is_deterministic() {
    let surface = NurbsSurface::from_bspline(wavy_bspline());
    let serial: Vec<Point3> = (0..64)
        .map(|k| surface.evaluate(k as f64 / 63.0, 1.0 - k as f64 / 63.0).unwrap())
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    (0..64)
                        .map(|k| surface.evaluate(k as f64 / 63.0, 1.0 - k as f64 / 63.0).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), serial);
        }
    });
}

#[test]
fn test_sample_curve_hits_both_ends() {
    let points = vec![
        dvec3(0.0, 0.0, 0.0),
        dvec3(1.0, 2.0, 0.0),
        dvec3(3.0, 1.0, 1.0),
        dvec3(4.0, 0.0, 0.0),
    ];
    let kv = KnotVector::clamped_uniform(2, 4).unwrap();
    let curve = BSplineCurve::new(2, kv, points.clone()).unwrap();
    let samples = sample_curve(&curve, 17).unwrap();
    assert_eq!(samples.len(), 17);
    assert_point_eq(samples[0], points[0]);
    assert_point_eq(samples[16], points[3]);
}
