//! Iterate-to-optimality loop shared by both phases.

use super::pivot::{LeavingChoice, PivotSelector};
use super::tableau::Tableau;
use super::two_phase::{SimplexConfig, SimplexStats};
use crate::error::LpError;
use crate::scalar::{Scalar, round_row_noise};
use std::fmt;
use tracing::{debug, trace};

/// Which half of the two-phase method is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Phase 1: minimize the artificial mass.
    Feasibility,
    /// Phase 2: optimize the real objective.
    Optimality,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Feasibility => write!(f, "feasibility"),
            Phase::Optimality => write!(f, "optimality"),
        }
    }
}

/// Where a phase stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseOutcome<T> {
    /// No entering column remains.
    Optimal {
        /// Row-0 right-hand side.
        value: T,
        /// Decision variables of the final basis.
        x: Vec<T>,
        /// Row-0 entries of the tracking block.
        prices: Vec<T>,
    },
    /// An entering column failed the ratio test.
    Unbounded {
        /// Basic solution at the moment the ray was found.
        point: Vec<T>,
        /// Recession direction over the decision variables.
        direction: Vec<T>,
    },
}

/// Runs simplex pivots on a tableau until optimality or unboundedness.
#[derive(Debug, Clone, Copy)]
pub struct PhaseRunner<'a> {
    config: &'a SimplexConfig,
    selector: PivotSelector,
}

impl<'a> PhaseRunner<'a> {
    /// Create a runner for `config`.
    pub fn new(config: &'a SimplexConfig) -> Self {
        Self {
            config,
            selector: PivotSelector::new(config.zero_tolerance),
        }
    }

    /// Pivot `tableau` to optimality for its current row 0.
    ///
    /// The tableau must already be at a basic feasible solution. Every
    /// pivot is applied identically to `extra_rows`.
    pub fn run<T: Scalar>(
        &self,
        phase: Phase,
        tableau: &mut Tableau<T>,
        extra_rows: &mut [Vec<T>],
        stats: &mut SimplexStats,
    ) -> Result<PhaseOutcome<T>, LpError> {
        self.round(tableau, extra_rows);
        trace!(%phase, "initial tableau:\n{tableau}");

        let mut pivots = 0usize;
        while let Some(entering) = self.selector.choose_entering(tableau) {
            let row = match self.selector.choose_leaving(tableau, entering) {
                LeavingChoice::Row(row) => row,
                LeavingChoice::Unbounded => {
                    debug!(%phase, entering, pivots, "entering column has no positive entry");
                    stats.record_pivots(phase, pivots);
                    return Ok(PhaseOutcome::Unbounded {
                        point: tableau.primal_solution(),
                        direction: self.selector.unbounded_direction(tableau, entering),
                    });
                }
            };

            if let Some(limit) = self.config.max_iterations
                && pivots >= limit
            {
                stats.record_pivots(phase, pivots);
                return Err(LpError::IterationLimit { phase, limit });
            }

            if tableau.rhs(row).is_zero() {
                stats.degenerate_pivots += 1;
            }
            trace!(
                %phase,
                row,
                entering,
                leaving = tableau.basic_variable(row),
                "pivot"
            );

            tableau.pivot(row, entering, extra_rows);
            self.round(tableau, extra_rows);
            pivots += 1;

            trace!(%phase, "tableau after pivot {pivots}:\n{tableau}");
        }

        stats.record_pivots(phase, pivots);
        debug!(%phase, pivots, value = %tableau.objective_value(), "phase optimal");

        Ok(PhaseOutcome::Optimal {
            value: tableau.objective_value().clone(),
            x: tableau.primal_solution(),
            prices: tableau.dual_prices(),
        })
    }

    /// Pivot `(row, col)` outside the main loop, keeping `extra_rows` and
    /// noise rounding in step.
    pub fn forced_pivot<T: Scalar>(
        &self,
        tableau: &mut Tableau<T>,
        row: usize,
        col: usize,
        extra_rows: &mut [Vec<T>],
    ) {
        tableau.pivot(row, col, extra_rows);
        self.round(tableau, extra_rows);
    }

    fn round<T: Scalar>(&self, tableau: &mut Tableau<T>, extra_rows: &mut [Vec<T>]) {
        let (tolerance, digits) = (self.config.zero_tolerance, self.config.round_digits);
        tableau.round_noise(tolerance, digits);
        for row in extra_rows.iter_mut() {
            round_row_noise(row, tolerance, digits);
        }
    }
}
