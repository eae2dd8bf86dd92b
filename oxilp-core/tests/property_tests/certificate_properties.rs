//! Property-based tests for certificate checking
//!
//! This module tests:
//! - Certificates survive positive scaling where the math says they should
//! - Moving along an unbounded ray stays feasible and improves
//! - Tampered certificates are rejected

use num_bigint::BigInt;
use num_rational::BigRational;
use oxilp_core::certificate::{verify_farkas, verify_optimal, verify_primal_feasible};
use oxilp_core::{Constraint, LinearProgram, LpResult, solve};
use proptest::prelude::*;

fn rat(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

/// Strategy for generating exact programs with two rows and two variables
fn program_strategy() -> impl Strategy<Value = LinearProgram<BigRational>> {
    (
        prop::collection::vec(-5i64..=5i64, 2),
        prop::collection::vec((prop::collection::vec(-5i64..=5i64, 2), -5i64..=10i64), 2),
    )
        .prop_map(|(objective, rows)| {
            let constraints = rows
                .into_iter()
                .map(|(coeffs, rhs)| Constraint::new(coeffs.into_iter().map(rat).collect(), rat(rhs)))
                .collect();
            LinearProgram::new(objective.into_iter().map(rat).collect(), constraints)
                .expect("dimensions match")
        })
}

#[cfg(test)]
mod certificate_transformations {
    use super::*;

    proptest! {
        /// A Farkas certificate scaled by k > 0 is still a certificate
        #[test]
        fn farkas_scaling(lp in program_strategy(), k in 1i64..10i64) {
            if let LpResult::Infeasible { certificate } = solve(&lp).expect("no limit") {
                let scaled: Vec<BigRational> = certificate.iter().map(|y| y * rat(k)).collect();
                prop_assert!(verify_farkas(&lp, &scaled, 0.0).is_ok());

                let negated: Vec<BigRational> = certificate.iter().map(|y| -y).collect();
                prop_assert!(verify_farkas(&lp, &negated, 0.0).is_err());
            }
        }

        /// Points along an unbounded ray stay feasible and improve
        #[test]
        fn ray_walk(lp in program_strategy(), t in 1i64..20i64) {
            if let LpResult::Unbounded { point, direction } = solve(&lp).expect("no limit") {
                let moved: Vec<BigRational> = point
                    .iter()
                    .zip(&direction)
                    .map(|(p, d)| p + d * rat(t))
                    .collect();
                prop_assert!(verify_primal_feasible(&lp, &moved, 0.0).is_ok());
                prop_assert!(lp.objective_value(&moved) > lp.objective_value(&point));
            }
        }

        /// Shifting the reported optimum breaks the certificate
        #[test]
        fn tampered_optimum_rejected(lp in program_strategy(), delta in 1i64..5i64) {
            if let LpResult::Optimal { value, x, duals } = solve(&lp).expect("no limit") {
                prop_assert!(verify_optimal(&lp, &value, &x, &duals, 0.0).is_ok());
                let wrong = value + rat(delta);
                prop_assert!(verify_optimal(&lp, &wrong, &x, &duals, 0.0).is_err());
            }
        }
    }
}
