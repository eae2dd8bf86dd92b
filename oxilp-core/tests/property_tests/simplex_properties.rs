//! Property-based tests for the two-phase simplex
//!
//! This module tests:
//! - Every outcome carries a certificate that verifies
//! - Floating and exact arithmetic classify identically
//! - Solving is deterministic
//! - Optimal values react correctly to objective scaling and redundant rows

use num_bigint::BigInt;
use num_rational::BigRational;
use oxilp_core::{
    Constraint, LinearProgram, LpResult, SimplexConfig, TwoPhaseSolver, verify,
};
use proptest::prelude::*;

/// Strategy for generating small constraint coefficients
fn coeff_strategy() -> impl Strategy<Value = i64> {
    -5i64..=5i64
}

/// Strategy for generating right-hand sides, biased towards feasibility
fn rhs_strategy() -> impl Strategy<Value = i64> {
    -5i64..=10i64
}

/// Strategy for generating programs with 1-3 rows and 1-3 variables
fn program_strategy() -> impl Strategy<Value = LinearProgram<i64>> {
    (1usize..=3, 1usize..=3)
        .prop_flat_map(|(m, n)| {
            (
                prop::collection::vec(coeff_strategy(), n),
                prop::collection::vec(
                    (prop::collection::vec(coeff_strategy(), n), rhs_strategy()),
                    m,
                ),
            )
        })
        .prop_map(|(objective, rows)| {
            let constraints = rows
                .into_iter()
                .map(|(coeffs, rhs)| Constraint::new(coeffs, rhs))
                .collect();
            LinearProgram::new(objective, constraints).expect("dimensions match")
        })
}

/// Solver with a generous pivot cap so that a cycling bug fails instead of hanging
fn solver() -> TwoPhaseSolver {
    TwoPhaseSolver::new(SimplexConfig::default().with_max_iterations(500))
}

fn exact(lp: &LinearProgram<i64>) -> LinearProgram<BigRational> {
    LinearProgram::from_integers(lp)
}

fn approx(lp: &LinearProgram<i64>) -> LinearProgram<f64> {
    LinearProgram::from_integers(lp)
}

fn rat(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

#[cfg(test)]
mod certificate_validity {
    use super::*;

    proptest! {
        /// Exact results always verify with zero tolerance
        #[test]
        fn exact_result_verifies(lp in program_strategy()) {
            let lp = exact(&lp);
            let result = solver().solve(&lp).expect("no cycling");
            prop_assert!(verify(&lp, &result, 0.0).is_ok(), "{:?}", result);
        }

        /// Floating results verify with a small tolerance
        #[test]
        fn float_result_verifies(lp in program_strategy()) {
            let lp = approx(&lp);
            let result = solver().solve(&lp).expect("no cycling");
            prop_assert!(verify(&lp, &result, 1e-6).is_ok(), "{:?}", result);
        }

        /// Optimal primal values are non-negative and duals certify them
        #[test]
        fn optimal_duals_are_tight(lp in program_strategy()) {
            let lp = exact(&lp);
            if let LpResult::Optimal { value, x, duals } = solver().solve(&lp).expect("no cycling") {
                prop_assert_eq!(lp.objective_value(&x), value.clone());
                let dual_value = lp
                    .rhs()
                    .zip(&duals)
                    .fold(rat(0), |acc, (b, y)| acc + b * y);
                prop_assert_eq!(dual_value, value);
            }
        }
    }
}

#[cfg(test)]
mod classification_properties {
    use super::*;

    proptest! {
        /// Floating and exact solves agree on the outcome and the optimum
        #[test]
        fn float_agrees_with_exact(lp in program_strategy()) {
            let exact_result = solver().solve(&exact(&lp)).expect("no cycling");
            let float_result = solver().solve(&approx(&lp)).expect("no cycling");

            prop_assert_eq!(exact_result.status_keyword(), float_result.status_keyword());
            if let (Some(e), Some(f)) = (exact_result.objective_value(), float_result.objective_value()) {
                let e: f64 = oxilp_core::Scalar::as_f64(e);
                prop_assert!((e - f).abs() < 1e-6, "exact {} vs float {}", e, f);
            }
        }

        /// Solving twice gives identical results
        #[test]
        fn solve_is_deterministic(lp in program_strategy()) {
            let lp = approx(&lp);
            let first = solver().solve(&lp).expect("no cycling");
            let second = solver().solve(&lp).expect("no cycling");
            prop_assert_eq!(first, second);
        }

        /// Scaling the objective by k > 0 scales the optimum by k
        #[test]
        fn objective_scaling(lp in program_strategy(), k in 1i64..5i64) {
            let base = exact(&lp);
            let scaled = LinearProgram::new(
                base.objective().iter().map(|c| c * rat(k)).collect(),
                base.constraints().to_vec(),
            )
            .expect("same dimensions");

            let base_result = solver().solve(&base).expect("no cycling");
            let scaled_result = solver().solve(&scaled).expect("no cycling");

            prop_assert_eq!(base_result.status_keyword(), scaled_result.status_keyword());
            if let (Some(b), Some(s)) = (base_result.objective_value(), scaled_result.objective_value()) {
                prop_assert_eq!(b * rat(k), s.clone());
            }
        }

        /// Duplicating a constraint does not change the outcome
        #[test]
        fn redundant_row_is_harmless(lp in program_strategy()) {
            let base = exact(&lp);
            let mut rows = base.constraints().to_vec();
            rows.push(rows[0].clone());
            let doubled = LinearProgram::new(base.objective().to_vec(), rows)
                .expect("same dimensions");

            let base_result = solver().solve(&base).expect("no cycling");
            let doubled_result = solver().solve(&doubled).expect("no cycling");

            prop_assert_eq!(base_result.status_keyword(), doubled_result.status_keyword());
            prop_assert_eq!(base_result.objective_value(), doubled_result.objective_value());
            prop_assert!(verify(&doubled, &doubled_result, 0.0).is_ok());
        }

        /// Non-negative right-hand sides are never infeasible
        #[test]
        fn origin_feasible_is_never_infeasible(lp in program_strategy()) {
            let base = exact(&lp);
            let rows = base
                .constraints()
                .iter()
                .map(|c| Constraint::new(c.coeffs.clone(), c.rhs.clone().max(rat(0))))
                .collect();
            let shifted = LinearProgram::new(base.objective().to_vec(), rows)
                .expect("same dimensions");

            let result = solver().solve(&shifted).expect("no cycling");
            prop_assert!(!result.is_infeasible());
        }
    }
}
