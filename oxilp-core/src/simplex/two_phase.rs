//! Two-phase tableau simplex.
//!
//! Phase 1 sign-normalizes the constraint rows, adds one artificial variable
//! per row and minimizes their sum. A positive minimum proves infeasibility;
//! the tracking block then holds a Farkas certificate. Otherwise the real
//! objective row, pivoted in lockstep with the tableau throughout phase 1,
//! is loaded and phase 2 optimizes it.
//!
//! Every solve builds its own tableau; nothing is shared between calls.

use super::phase::{Phase, PhaseOutcome, PhaseRunner};
use super::tableau::Tableau;
use crate::error::LpError;
use crate::problem::LinearProgram;
use crate::result::LpResult;
use crate::scalar::Scalar;
use serde::Serialize;
use tracing::{debug, warn};

/// Numeric configuration of the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexConfig {
    /// Magnitudes below this are rounding noise and become zero.
    pub zero_tolerance: f64,
    /// Fractional digits kept when cleaning the tableau.
    pub round_digits: u32,
    /// Phase-1 optimum below `-feasibility_tolerance` means infeasible.
    pub feasibility_tolerance: f64,
    /// Optional pivot cap per phase.
    pub max_iterations: Option<usize>,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            zero_tolerance: 1e-9,
            round_digits: 12,
            feasibility_tolerance: 1e-8,
            max_iterations: None,
        }
    }
}

impl SimplexConfig {
    /// Set the noise tolerance.
    #[must_use]
    pub fn with_zero_tolerance(mut self, tolerance: f64) -> Self {
        self.zero_tolerance = tolerance;
        self
    }

    /// Set the number of fractional digits kept by noise rounding.
    #[must_use]
    pub fn with_round_digits(mut self, digits: u32) -> Self {
        self.round_digits = digits;
        self
    }

    /// Set the phase-1 feasibility tolerance.
    #[must_use]
    pub fn with_feasibility_tolerance(mut self, tolerance: f64) -> Self {
        self.feasibility_tolerance = tolerance;
        self
    }

    /// Cap the number of pivots per phase.
    #[must_use]
    pub fn with_max_iterations(mut self, limit: usize) -> Self {
        self.max_iterations = Some(limit);
        self
    }
}

/// Counters collected during one solve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimplexStats {
    /// Constraint rows negated to make the right-hand side non-negative.
    pub rows_normalized: usize,
    /// Pivots performed in phase 1.
    pub phase1_pivots: usize,
    /// Pivots performed in phase 2.
    pub phase2_pivots: usize,
    /// Pivots on a row with zero right-hand side.
    pub degenerate_pivots: usize,
    /// Artificial variables pivoted out of the basis after phase 1.
    pub artificials_driven_out: usize,
}

impl SimplexStats {
    /// Total pivots over both phases.
    pub fn total_pivots(&self) -> usize {
        self.phase1_pivots + self.phase2_pivots
    }

    pub(crate) fn record_pivots(&mut self, phase: Phase, pivots: usize) {
        match phase {
            Phase::Feasibility => self.phase1_pivots += pivots,
            Phase::Optimality => self.phase2_pivots += pivots,
        }
    }
}

/// Result of phase 1.
enum Feasibility<T> {
    /// Feasible; carries the real objective row expressed in the final
    /// phase-1 basis.
    Feasible { objective_row: Vec<T> },
    /// Infeasible with its Farkas certificate.
    Infeasible { certificate: Vec<T> },
}

/// Two-phase simplex solver.
#[derive(Debug, Clone, Default)]
pub struct TwoPhaseSolver {
    config: SimplexConfig,
}

impl TwoPhaseSolver {
    /// Create a solver with `config`.
    pub fn new(config: SimplexConfig) -> Self {
        Self { config }
    }

    /// Solver configuration.
    pub fn config(&self) -> &SimplexConfig {
        &self.config
    }

    /// Classify and solve `lp`.
    pub fn solve<T: Scalar>(&self, lp: &LinearProgram<T>) -> Result<LpResult<T>, LpError> {
        self.solve_with_stats(lp).map(|(result, _)| result)
    }

    /// Classify and solve `lp`, also returning pivot counters.
    pub fn solve_with_stats<T: Scalar>(
        &self,
        lp: &LinearProgram<T>,
    ) -> Result<(LpResult<T>, SimplexStats), LpError> {
        let mut stats = SimplexStats::default();
        let mut tableau = Tableau::build(lp);
        let runner = PhaseRunner::new(&self.config);

        debug!(
            constraints = lp.num_constraints(),
            vars = lp.num_vars(),
            "starting two-phase simplex"
        );

        let objective_row = match self.phase_one(&runner, &mut tableau, &mut stats)? {
            Feasibility::Feasible { objective_row } => objective_row,
            Feasibility::Infeasible { certificate } => {
                debug!(pivots = stats.phase1_pivots, "program is infeasible");
                return Ok((LpResult::Infeasible { certificate }, stats));
            }
        };

        tableau.set_objective_row(objective_row);
        let result = match runner.run(Phase::Optimality, &mut tableau, &mut [], &mut stats)? {
            PhaseOutcome::Optimal { value, x, prices } => LpResult::Optimal {
                value,
                x,
                duals: prices,
            },
            PhaseOutcome::Unbounded { point, direction } => {
                LpResult::Unbounded { point, direction }
            }
        };

        debug!(
            status = result.status_keyword(),
            phase1 = stats.phase1_pivots,
            phase2 = stats.phase2_pivots,
            "solve finished"
        );
        Ok((result, stats))
    }

    fn phase_one<T: Scalar>(
        &self,
        runner: &PhaseRunner<'_>,
        tableau: &mut Tableau<T>,
        stats: &mut SimplexStats,
    ) -> Result<Feasibility<T>, LpError> {
        stats.rows_normalized = tableau.normalize_rhs_signs();
        tableau.append_artificials();

        // The real objective, carried through phase 1 as an extra row.
        let mut carried = vec![tableau.objective_row().to_vec()];
        tableau.load_phase_one_objective();

        let outcome = runner.run(Phase::Feasibility, tableau, &mut carried, stats)?;
        let (value, prices) = match outcome {
            PhaseOutcome::Optimal { value, prices, .. } => (value, prices),
            // The auxiliary objective is bounded below by zero.
            PhaseOutcome::Unbounded { .. } => {
                return Err(LpError::NumericalBreakdown {
                    phase: Phase::Feasibility,
                });
            }
        };

        // Row 0 holds minus the remaining artificial mass.
        if value.is_negative_beyond(self.config.feasibility_tolerance) {
            let certificate = prices.into_iter().map(|p| -p).collect();
            return Ok(Feasibility::Infeasible { certificate });
        }

        self.drive_out_artificials(runner, tableau, &mut carried, stats)?;
        tableau.drop_artificials(&mut carried);

        let objective_row = carried.pop().unwrap_or_default();
        Ok(Feasibility::Feasible { objective_row })
    }

    /// Pivot every artificial still basic (at level zero) out of the basis
    /// on a structural or slack column of its row.
    fn drive_out_artificials<T: Scalar>(
        &self,
        runner: &PhaseRunner<'_>,
        tableau: &mut Tableau<T>,
        carried: &mut [Vec<T>],
        stats: &mut SimplexStats,
    ) -> Result<(), LpError> {
        for row in tableau.artificial_basic_rows() {
            let replacement = tableau
                .structural_range()
                .chain(tableau.slack_range())
                .filter(|&col| tableau.find_basic_column(col).is_none())
                .find(|&col| !tableau.get(row, col).is_zero());

            match replacement {
                Some(col) => {
                    debug!(row, col, "driving artificial out of the basis");
                    runner.forced_pivot(tableau, row, col, carried);
                    stats.artificials_driven_out += 1;
                }
                None => {
                    // The slack block stays invertible in exact arithmetic.
                    warn!(row, "no column available to replace a basic artificial");
                    return Err(LpError::NumericalBreakdown {
                        phase: Phase::Feasibility,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Solve `lp` with the default configuration.
pub fn solve<T: Scalar>(lp: &LinearProgram<T>) -> Result<LpResult<T>, LpError> {
    TwoPhaseSolver::default().solve(lp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Constraint, LinearProgramBuilder};

    #[test]
    fn test_config_builders() {
        let config = SimplexConfig::default()
            .with_zero_tolerance(1e-7)
            .with_round_digits(10)
            .with_feasibility_tolerance(1e-6)
            .with_max_iterations(50);
        assert_eq!(config.zero_tolerance, 1e-7);
        assert_eq!(config.round_digits, 10);
        assert_eq!(config.feasibility_tolerance, 1e-6);
        assert_eq!(config.max_iterations, Some(50));
    }

    #[test]
    fn test_optimal_without_negative_rhs() {
        let lp = LinearProgramBuilder::new(vec![3.0, 2.0])
            .constraint(vec![1.0, 1.0], 4.0)
            .constraint(vec![1.0, 0.0], 3.0)
            .build()
            .expect("valid program");

        let (result, stats) = TwoPhaseSolver::default()
            .solve_with_stats(&lp)
            .expect("no iteration limit");

        assert_eq!(
            result,
            LpResult::Optimal {
                value: 11.0,
                x: vec![3.0, 1.0],
                duals: vec![2.0, 1.0],
            }
        );
        assert_eq!(stats.rows_normalized, 0);
        assert!(stats.phase1_pivots > 0);
        assert_eq!(stats.artificials_driven_out, 0);
    }

    #[test]
    fn test_infeasible_certificate() {
        let lp = LinearProgram::new(vec![1.0], vec![Constraint::new(vec![1.0], -1.0)])
            .expect("valid program");

        let (result, stats) = TwoPhaseSolver::default()
            .solve_with_stats(&lp)
            .expect("no iteration limit");

        assert_eq!(
            result,
            LpResult::Infeasible {
                certificate: vec![-1.0]
            }
        );
        assert_eq!(stats.rows_normalized, 1);
        assert_eq!(stats.phase2_pivots, 0);
    }

    #[test]
    fn test_negative_rhs_feasible() {
        // max -x1 - x2 s.t. -x1 - x2 <= -2 (x1 + x2 >= 2), x1 <= 5
        let lp = LinearProgramBuilder::new(vec![-1.0, -1.0])
            .constraint(vec![-1.0, -1.0], -2.0)
            .constraint(vec![1.0, 0.0], 5.0)
            .build()
            .expect("valid program");

        let result = solve(&lp).expect("no iteration limit");
        let LpResult::Optimal { value, x, duals } = result else {
            panic!("expected optimal, got {result:?}");
        };
        assert_eq!(value, -2.0);
        assert_eq!(x[0] + x[1], 2.0);
        assert_eq!(duals, vec![1.0, 0.0]);
    }

    #[test]
    fn test_missing_replacement_column_is_an_error() {
        let lp = LinearProgramBuilder::new(vec![3.0, 2.0])
            .constraint(vec![1.0, 1.0], 4.0)
            .constraint(vec![1.0, 0.0], 3.0)
            .build()
            .expect("valid program");
        // A tolerance this large clamps every artificial row to zero.
        let solver = TwoPhaseSolver::new(SimplexConfig::default().with_zero_tolerance(1e6));

        let mut tableau = Tableau::build(&lp);
        tableau.append_artificials();
        tableau.round_noise(solver.config().zero_tolerance, solver.config().round_digits);
        let runner = PhaseRunner::new(solver.config());
        let mut stats = SimplexStats::default();
        assert_eq!(
            solver.drive_out_artificials(&runner, &mut tableau, &mut [], &mut stats),
            Err(LpError::NumericalBreakdown {
                phase: Phase::Feasibility
            })
        );
        assert_eq!(stats.artificials_driven_out, 0);

        assert_eq!(
            solver.solve(&lp),
            Err(LpError::NumericalBreakdown {
                phase: Phase::Feasibility
            })
        );
    }

    #[test]
    fn test_degenerate_artificial_is_driven_out() {
        // x1 <= 1 and x1 >= 1: phase 1 ends with the second row's artificial
        // basic at level zero.
        let lp = LinearProgramBuilder::new(vec![1.0])
            .constraint(vec![1.0], 1.0)
            .constraint(vec![-1.0], -1.0)
            .build()
            .expect("valid program");

        let (result, stats) = TwoPhaseSolver::default()
            .solve_with_stats(&lp)
            .expect("no iteration limit");

        assert_eq!(
            result,
            LpResult::Optimal {
                value: 1.0,
                x: vec![1.0],
                duals: vec![1.0, 0.0],
            }
        );
        assert_eq!(stats.artificials_driven_out, 1);
        assert_eq!(stats.phase1_pivots, 1);
        assert_eq!(stats.phase2_pivots, 1);
    }
}
