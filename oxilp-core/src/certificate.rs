//! Independent checking of solver certificates.
//!
//! Every [`LpResult`] carries enough data to be verified against the
//! original program without re-running the simplex method:
//!
//! - **Optimal**: `x ≥ 0`, `Ax ≤ b`, `y ≥ 0`, `yᵀA ≥ cᵀ` and
//!   `cᵀx = value = yᵀb`. `y` is then dual feasible and weak duality
//!   proves `x` optimal.
//! - **Infeasible** (Farkas): `y ≤ 0`, `yᵀA ≤ 0` and `yᵀb > 0`. A feasible
//!   `x` would give `0 ≥ yᵀAx ≥ yᵀb > 0`.
//! - **Unbounded**: the point is feasible, `d ≥ 0`, `Ad ≤ 0` and `cᵀd > 0`.
//!
//! Every number must be finite; `NaN` and infinities are rejected before
//! any tolerance comparison.
//!
//! ## References
//!
//! - Schrijver: "Theory of Linear and Integer Programming" (1986)

use crate::problem::LinearProgram;
use crate::result::LpResult;
use crate::scalar::{Scalar, all_zero, dot};
use thiserror::Error;

/// A certificate property that does not hold.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CertificateError {
    /// A vector has the wrong number of entries.
    #[error("{what} has {found} entries, expected {expected}")]
    LengthMismatch {
        /// Which vector.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        found: usize,
    },
    /// An entry is infinite or `NaN`.
    #[error("{what} entry {index} is not finite")]
    NotFinite {
        /// Which vector or value.
        what: &'static str,
        /// Offending position.
        index: usize,
    },
    /// A primal variable is negative.
    #[error("variable {index} is negative ({value})")]
    NegativeVariable {
        /// Variable index.
        index: usize,
        /// Offending value.
        value: f64,
    },
    /// The primal point violates a constraint.
    #[error("constraint {row} violated: activity {activity} exceeds rhs {rhs}")]
    ConstraintViolated {
        /// Constraint index.
        row: usize,
        /// `Aᵢ · x`.
        activity: f64,
        /// `bᵢ`.
        rhs: f64,
    },
    /// A dual price is negative.
    #[error("dual price {index} is negative ({value})")]
    NegativeDual {
        /// Constraint index.
        index: usize,
        /// Offending value.
        value: f64,
    },
    /// `yᵀA ≥ cᵀ` fails on a column.
    #[error("dual constraint of variable {index} violated: yᵀAⱼ - cⱼ = {value}")]
    DualInfeasible {
        /// Variable index.
        index: usize,
        /// `yᵀAⱼ - cⱼ`.
        value: f64,
    },
    /// The reported value is not `cᵀx`.
    #[error("reported objective {reported} differs from cᵀx = {primal}")]
    ValueMismatch {
        /// Value stored in the result.
        reported: f64,
        /// Recomputed `cᵀx`.
        primal: f64,
    },
    /// Primal and dual objectives differ.
    #[error("duality gap: cᵀx = {primal}, yᵀb = {dual}")]
    DualityGap {
        /// `cᵀx`.
        primal: f64,
        /// `yᵀb`.
        dual: f64,
    },
    /// The certificate is the zero vector.
    #[error("infeasibility certificate is zero")]
    ZeroCertificate,
    /// A Farkas multiplier is positive.
    #[error("Farkas multiplier {index} is positive ({value})")]
    FarkasMultiplierPositive {
        /// Constraint index.
        index: usize,
        /// Offending multiplier.
        value: f64,
    },
    /// `yᵀA` has a positive component.
    #[error("Farkas combination yᵀA is positive on variable {index} ({value})")]
    FarkasCombinationPositive {
        /// Variable index.
        index: usize,
        /// Component of `yᵀA`.
        value: f64,
    },
    /// `yᵀb` is not positive.
    #[error("Farkas right-hand side yᵀb = {value} is not positive")]
    FarkasRhsNotPositive {
        /// `yᵀb`.
        value: f64,
    },
    /// The ray has a negative component.
    #[error("ray component {index} is negative ({value})")]
    RayNegative {
        /// Variable index.
        index: usize,
        /// Offending value.
        value: f64,
    },
    /// The ray leaves the feasible region.
    #[error("ray leaves the feasible region on constraint {row} (Aᵢ · d = {value})")]
    RayNotFeasible {
        /// Constraint index.
        row: usize,
        /// `Aᵢ · d`.
        value: f64,
    },
    /// The objective does not grow along the ray.
    #[error("objective does not improve along the ray (cᵀd = {value})")]
    RayNotImproving {
        /// `cᵀd`.
        value: f64,
    },
}

/// Check `result` against `lp` with absolute tolerance `tolerance`.
pub fn verify<T: Scalar>(
    lp: &LinearProgram<T>,
    result: &LpResult<T>,
    tolerance: f64,
) -> Result<(), CertificateError> {
    match result {
        LpResult::Optimal { value, x, duals } => {
            verify_optimal(lp, value, x, duals, tolerance)
        }
        LpResult::Infeasible { certificate } => verify_farkas(lp, certificate, tolerance),
        LpResult::Unbounded { point, direction } => {
            verify_ray(lp, point, direction, tolerance)
        }
    }
}

/// Check a primal/dual pair for optimality.
pub fn verify_optimal<T: Scalar>(
    lp: &LinearProgram<T>,
    value: &T,
    x: &[T],
    duals: &[T],
    tolerance: f64,
) -> Result<(), CertificateError> {
    check_length("dual vector", lp.num_constraints(), duals.len())?;
    check_finite("objective value", std::slice::from_ref(value))?;
    check_finite("dual vector", duals)?;
    verify_primal_feasible(lp, x, tolerance)?;

    for (index, y) in duals.iter().enumerate() {
        if y.is_negative_beyond(tolerance) {
            return Err(CertificateError::NegativeDual {
                index,
                value: y.as_f64(),
            });
        }
    }

    for (index, c) in lp.objective().iter().enumerate() {
        let reduced = column_combination(lp, duals, index) - c.clone();
        if reduced.is_negative_beyond(tolerance) {
            return Err(CertificateError::DualInfeasible {
                index,
                value: reduced.as_f64(),
            });
        }
    }

    let primal = lp.objective_value(x);
    if !primal.approx_eq(value, tolerance) {
        return Err(CertificateError::ValueMismatch {
            reported: value.as_f64(),
            primal: primal.as_f64(),
        });
    }

    let dual = lp
        .rhs()
        .zip(duals)
        .fold(T::zero(), |acc, (b, y)| acc + b.clone() * y.clone());
    if !primal.approx_eq(&dual, tolerance) {
        return Err(CertificateError::DualityGap {
            primal: primal.as_f64(),
            dual: dual.as_f64(),
        });
    }

    Ok(())
}

/// Check `x ≥ 0` and `Ax ≤ b`.
pub fn verify_primal_feasible<T: Scalar>(
    lp: &LinearProgram<T>,
    x: &[T],
    tolerance: f64,
) -> Result<(), CertificateError> {
    check_length("primal vector", lp.num_vars(), x.len())?;
    check_finite("primal vector", x)?;

    for (index, value) in x.iter().enumerate() {
        if value.is_negative_beyond(tolerance) {
            return Err(CertificateError::NegativeVariable {
                index,
                value: value.as_f64(),
            });
        }
    }

    for (row, constraint) in lp.constraints().iter().enumerate() {
        let activity = constraint.activity(x);
        let slack = constraint.rhs.clone() - activity.clone();
        if slack.is_negative_beyond(tolerance) {
            return Err(CertificateError::ConstraintViolated {
                row,
                activity: activity.as_f64(),
                rhs: constraint.rhs.as_f64(),
            });
        }
    }

    Ok(())
}

/// Check a Farkas certificate: `y ≤ 0`, `yᵀA ≤ 0` and `yᵀb > 0`.
pub fn verify_farkas<T: Scalar>(
    lp: &LinearProgram<T>,
    certificate: &[T],
    tolerance: f64,
) -> Result<(), CertificateError> {
    check_length("certificate", lp.num_constraints(), certificate.len())?;
    check_finite("certificate", certificate)?;
    if all_zero(certificate) {
        return Err(CertificateError::ZeroCertificate);
    }

    for (index, y) in certificate.iter().enumerate() {
        if y.is_positive_beyond(tolerance) {
            return Err(CertificateError::FarkasMultiplierPositive {
                index,
                value: y.as_f64(),
            });
        }
    }

    for index in 0..lp.num_vars() {
        let combined = column_combination(lp, certificate, index);
        if combined.is_positive_beyond(tolerance) {
            return Err(CertificateError::FarkasCombinationPositive {
                index,
                value: combined.as_f64(),
            });
        }
    }

    let rhs = lp
        .rhs()
        .zip(certificate)
        .fold(T::zero(), |acc, (b, y)| acc + b.clone() * y.clone());
    if !rhs.is_positive_beyond(tolerance) {
        return Err(CertificateError::FarkasRhsNotPositive {
            value: rhs.as_f64(),
        });
    }

    Ok(())
}

/// Check an unbounded ray: `point` feasible, `d ≥ 0`, `Ad ≤ 0`, `cᵀd > 0`.
pub fn verify_ray<T: Scalar>(
    lp: &LinearProgram<T>,
    point: &[T],
    direction: &[T],
    tolerance: f64,
) -> Result<(), CertificateError> {
    verify_primal_feasible(lp, point, tolerance)?;
    check_length("direction", lp.num_vars(), direction.len())?;
    check_finite("direction", direction)?;

    for (index, d) in direction.iter().enumerate() {
        if d.is_negative_beyond(tolerance) {
            return Err(CertificateError::RayNegative {
                index,
                value: d.as_f64(),
            });
        }
    }

    for (row, constraint) in lp.constraints().iter().enumerate() {
        let value = constraint.activity(direction);
        if value.is_positive_beyond(tolerance) {
            return Err(CertificateError::RayNotFeasible {
                row,
                value: value.as_f64(),
            });
        }
    }

    let gain = dot(lp.objective(), direction);
    if !gain.is_positive_beyond(tolerance) {
        return Err(CertificateError::RayNotImproving {
            value: gain.as_f64(),
        });
    }

    Ok(())
}

/// `Σᵢ yᵢ Aᵢⱼ` for column `index`.
fn column_combination<T: Scalar>(lp: &LinearProgram<T>, y: &[T], index: usize) -> T {
    lp.constraints()
        .iter()
        .zip(y)
        .fold(T::zero(), |acc, (c, y)| acc + c.coeffs[index].clone() * y.clone())
}

fn check_finite<T: Scalar>(what: &'static str, values: &[T]) -> Result<(), CertificateError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(CertificateError::NotFinite { what, index }),
        None => Ok(()),
    }
}

fn check_length(what: &'static str, expected: usize, found: usize) -> Result<(), CertificateError> {
    if expected == found {
        Ok(())
    } else {
        Err(CertificateError::LengthMismatch {
            what,
            expected,
            found,
        })
    }
}
