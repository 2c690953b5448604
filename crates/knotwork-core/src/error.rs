use thiserror::Error;

/// Parametric direction of a knot vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The single direction of a curve.
    Curve,
    U,
    V,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Curve => write!(f, "curve"),
            Direction::U => write!(f, "u"),
            Direction::V => write!(f, "v"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SplineError {
    #[error("Invalid knot vector: {0}")]
    InvalidKnots(String),

    #[error("Knot count mismatch in {direction} direction: expected {expected}, got {actual}")]
    KnotCountMismatch {
        direction: Direction,
        expected: usize,
        actual: usize,
    },

    #[error("Degree {degree} needs more than {count} control points")]
    DegreeTooHigh { degree: usize, count: usize },

    #[error("Malformed control grid: {0}")]
    MalformedGrid(String),

    #[error("Invalid weight {weight} at [{row}][{column}]")]
    InvalidWeight {
        row: usize,
        column: usize,
        weight: f64,
    },

    #[error("Parameter {value} outside domain [{min}, {max}]")]
    OutOfDomain { value: f64, min: f64, max: f64 },

    /// The weighted basis sum vanished, so the rational point is undefined.
    /// `v` is `None` for curves.
    #[error(
        "Rational denominator is zero at u={u}{}",
        .v.map(|v| format!(", v={v}")).unwrap_or_default()
    )]
    ZeroDenominator { u: f64, v: Option<f64> },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, SplineError>;
