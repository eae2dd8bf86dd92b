//! Error types for model construction and solving.

use crate::simplex::Phase;
use thiserror::Error;

/// Errors raised while building or solving a linear program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LpError {
    /// The objective has no coefficients.
    #[error("objective must have at least one coefficient")]
    EmptyObjective,
    /// The program has no constraint rows.
    #[error("linear program must have at least one constraint")]
    NoConstraints,
    /// A constraint row does not match the objective length.
    #[error("constraint {row} has {found} coefficients, expected {expected}")]
    DimensionMismatch {
        /// Zero-based constraint index.
        row: usize,
        /// Number of decision variables.
        expected: usize,
        /// Coefficients actually supplied.
        found: usize,
    },
    /// A sparse coefficient names a variable that does not exist.
    #[error("sparse coefficient index {index} out of range for {num_vars} variables")]
    SparseIndexOutOfRange {
        /// Offending variable index.
        index: usize,
        /// Number of decision variables.
        num_vars: usize,
    },
    /// A phase ran into the configured pivot cap.
    #[error("{phase} phase exceeded the iteration limit of {limit} pivots")]
    IterationLimit {
        /// Phase that hit the cap.
        phase: Phase,
        /// Configured cap.
        limit: usize,
    },
    /// Rounding noise broke a structural guarantee of the method: the
    /// phase-1 objective appeared unbounded, or a basic artificial had no
    /// column to be exchanged with.
    #[error("{phase} phase broke down numerically")]
    NumericalBreakdown {
        /// Phase in which the breakdown was detected.
        phase: Phase,
    },
}
