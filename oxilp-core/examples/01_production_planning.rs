//! Production planning with dual prices.
//!
//! A workshop makes tables and chairs from limited wood and labour. The
//! optimal plan is printed with the shadow price of each resource, then the
//! certificate is checked.
//!
//! Run with: cargo run -p oxilp-core --example 01_production_planning

use num_rational::BigRational;
use oxilp_core::{LinearProgram, LinearProgramBuilder, LpResult, TwoPhaseSolver, verify};

fn main() {
    // profit: 7 per table, 5 per chair
    // wood:   3 per table, 4 per chair, 2400 available
    // labour: 2 per table, 1 per chair, 1000 available
    // chairs: at most 450
    let lp = match LinearProgramBuilder::new(vec![7, 5])
        .constraint(vec![3, 4], 2400)
        .constraint(vec![2, 1], 1000)
        .constraint(vec![0, 1], 450)
        .build()
    {
        Ok(lp) => lp,
        Err(err) => {
            eprintln!("invalid program: {err}");
            return;
        }
    };

    let resources = ["wood", "labour", "chair capacity"];
    let exact = LinearProgram::<BigRational>::from_integers(&lp);
    let solver = TwoPhaseSolver::default();

    let (result, stats) = match solver.solve_with_stats(&exact) {
        Ok(solved) => solved,
        Err(err) => {
            eprintln!("solve failed: {err}");
            return;
        }
    };

    match &result {
        LpResult::Optimal { value, x, duals } => {
            println!("profit: {value}");
            println!("tables: {}, chairs: {}", x[0], x[1]);
            for (name, price) in resources.iter().zip(duals) {
                println!("shadow price of {name}: {price}");
            }
        }
        other => println!("unexpected outcome: {}", other.status_keyword()),
    }

    println!(
        "pivots: {} (phase 1) + {} (phase 2)",
        stats.phase1_pivots, stats.phase2_pivots
    );

    match verify(&exact, &result, 0.0) {
        Ok(()) => println!("certificate verified"),
        Err(err) => println!("certificate rejected: {err}"),
    }
}
