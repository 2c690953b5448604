pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{Direction, Result, SplineError};
pub use tolerance::Tolerance;
