//! Fuzz target for the two-phase simplex
//!
//! Builds small programs from structured input, solves them with exact and
//! floating arithmetic, and checks that both engines classify alike and
//! that every returned certificate verifies.

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use num_rational::BigRational;
use oxilp_core::{Constraint, LinearProgram, SimplexConfig, TwoPhaseSolver, verify};

#[derive(Debug, Arbitrary)]
struct Row {
    coeffs: [i8; 6],
    rhs: i8,
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    let num_vars: usize = match unstructured.arbitrary::<u8>() {
        Ok(n) => usize::from(n % 6) + 1,
        Err(_) => return,
    };
    let num_rows: usize = match unstructured.arbitrary::<u8>() {
        Ok(n) => usize::from(n % 6) + 1,
        Err(_) => return,
    };
    let objective: [i8; 6] = match unstructured.arbitrary() {
        Ok(o) => o,
        Err(_) => return,
    };

    let mut constraints = Vec::with_capacity(num_rows);
    for _ in 0..num_rows {
        let row: Row = match unstructured.arbitrary() {
            Ok(r) => r,
            Err(_) => return,
        };
        constraints.push(Constraint::new(
            row.coeffs[..num_vars].iter().map(|&a| i64::from(a)).collect(),
            i64::from(row.rhs),
        ));
    }

    let objective = objective[..num_vars].iter().map(|&c| i64::from(c)).collect();
    let Ok(lp) = LinearProgram::new(objective, constraints) else {
        return;
    };

    let solver = TwoPhaseSolver::new(SimplexConfig::default().with_max_iterations(10_000));

    let exact = LinearProgram::<BigRational>::from_integers(&lp);
    let exact_result = solver.solve(&exact).expect("Bland's rule terminates");
    assert!(verify(&exact, &exact_result, 0.0).is_ok(), "{exact_result:?}");

    let approx = LinearProgram::<f64>::from_integers(&lp);
    let result = solver.solve(&approx).expect("float engine classifies");
    assert_eq!(result.status_keyword(), exact_result.status_keyword());
    assert!(verify(&approx, &result, 1e-6).is_ok(), "{result:?}");
});
