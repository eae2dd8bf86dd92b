//! Pivot selection.
//!
//! Entering column: the first column of the pricing range whose reduced cost
//! is negative. Leaving row: minimum ratio test, ties broken in favour of the
//! row whose basic variable has the smallest column index. Together these
//! are Bland's rule, which cannot cycle on degenerate programs.

use super::tableau::Tableau;
use crate::scalar::Scalar;

/// Outcome of the ratio test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeavingChoice {
    /// Constraint row (`1..=m`) that leaves the basis.
    Row(usize),
    /// The entering column has no positive entry: the objective can grow
    /// without bound along it.
    Unbounded,
}

/// Entering and leaving rules over a tableau.
///
/// Signs are decided against `tolerance`, never by the sign bit, so `-0.0`
/// reduced costs and `0.0` column entries are both treated as zero.
#[derive(Debug, Clone, Copy)]
pub struct PivotSelector {
    /// Magnitudes up to this count as zero; ratios closer than this tie.
    tolerance: f64,
}

impl PivotSelector {
    /// Create a selector using `tolerance` for sign tests and ties.
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// First column in the pricing range with a negative reduced cost, or
    /// `None` when the current basis is optimal.
    ///
    /// The tableau is expected to be noise-rounded.
    pub fn choose_entering<T: Scalar>(&self, tableau: &Tableau<T>) -> Option<usize> {
        tableau
            .pricing_range()
            .find(|&col| tableau.get(0, col).is_negative_beyond(self.tolerance))
    }

    /// Minimum ratio test on `entering`.
    pub fn choose_leaving<T: Scalar>(&self, tableau: &Tableau<T>, entering: usize) -> LeavingChoice {
        let rhs_col = tableau.rhs_col();
        let mut best: Option<(usize, T)> = None;

        for row in 1..=tableau.num_constraints() {
            let coeff = tableau.get(row, entering);
            if !coeff.is_positive_beyond(self.tolerance) {
                continue;
            }
            let ratio = tableau.get(row, rhs_col).clone() / coeff.clone();

            best = match best {
                None => Some((row, ratio)),
                Some((best_row, best_ratio)) => {
                    if ratio.approx_eq(&best_ratio, self.tolerance) {
                        let winner = if tableau.basic_variable(row) < tableau.basic_variable(best_row)
                        {
                            row
                        } else {
                            best_row
                        };
                        let low = if ratio < best_ratio { ratio } else { best_ratio };
                        Some((winner, low))
                    } else if ratio < best_ratio {
                        Some((row, ratio))
                    } else {
                        Some((best_row, best_ratio))
                    }
                }
            };
        }

        match best {
            Some((row, _)) => LeavingChoice::Row(row),
            None => LeavingChoice::Unbounded,
        }
    }

    /// Recession direction over the decision variables when `entering`
    /// failed the ratio test.
    ///
    /// Moving the entering variable up by `t` moves every basic variable by
    /// `-t` times its entry in the entering column. Only structural
    /// components are reported; slacks absorb the rest.
    pub fn unbounded_direction<T: Scalar>(&self, tableau: &Tableau<T>, entering: usize) -> Vec<T> {
        let structural = tableau.structural_range();
        let mut direction = vec![T::zero(); tableau.num_vars()];

        for col in structural.clone() {
            let slot = &mut direction[col - structural.start];
            if col == entering {
                *slot = T::one();
            } else if let Some(row) = tableau.find_basic_column(col) {
                let entry = tableau.get(row, entering);
                if !entry.is_zero() {
                    *slot = -entry.clone();
                }
            }
        }

        direction
    }
}

impl Default for PivotSelector {
    fn default() -> Self {
        Self::new(1e-9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Constraint, LinearProgram};

    fn tableau(objective: Vec<f64>, rows: Vec<(Vec<f64>, f64)>) -> Tableau<f64> {
        let constraints = rows
            .into_iter()
            .map(|(coeffs, rhs)| Constraint::new(coeffs, rhs))
            .collect();
        Tableau::build(&LinearProgram::new(objective, constraints).expect("valid program"))
    }

    #[test]
    fn test_entering_is_first_negative() {
        let t = tableau(vec![1.0, 5.0], vec![(vec![1.0, 1.0], 4.0)]);
        assert_eq!(PivotSelector::default().choose_entering(&t), Some(1));

        let t = tableau(vec![-1.0, 0.0], vec![(vec![1.0, 1.0], 4.0)]);
        assert_eq!(PivotSelector::default().choose_entering(&t), None);
    }

    #[test]
    fn test_leaving_minimum_ratio() {
        let t = tableau(
            vec![1.0, 1.0],
            vec![(vec![2.0, 1.0], 8.0), (vec![1.0, 0.0], 3.0), (vec![-1.0, 1.0], 1.0)],
        );
        // Ratios on column 3 (x1): 4, 3, skipped.
        assert_eq!(
            PivotSelector::default().choose_leaving(&t, 3),
            LeavingChoice::Row(2)
        );
    }

    #[test]
    fn test_leaving_tie_prefers_smallest_basic_column() {
        let mut t = tableau(
            vec![1.0, 1.0],
            vec![(vec![1.0, 0.0], 2.0), (vec![1.0, 1.0], 2.0)],
        );
        // x2 (column 3) becomes basic in row 2, below row 1's slack (4).
        t.pivot(2, 3, &mut []);
        assert_eq!(t.basis(), &[4, 3]);
        // Column 2 (x1): both rows give ratio 2.
        assert_eq!(
            PivotSelector::default().choose_leaving(&t, 2),
            LeavingChoice::Row(2)
        );

        let t = tableau(
            vec![1.0, 1.0],
            vec![(vec![1.0, 0.0], 2.0), (vec![2.0, 1.0], 4.0)],
        );
        // Both rows give ratio 2; slack 4 (row 1) beats slack 5 (row 2).
        assert_eq!(
            PivotSelector::default().choose_leaving(&t, 2),
            LeavingChoice::Row(1)
        );
    }

    #[test]
    fn test_signed_zero_is_zero() {
        // max x1 s.t. x2 <= 1: x1 has a zero entry in the only row.
        let mut t = tableau(vec![1.0, 0.0], vec![(vec![0.0, 1.0], 1.0)]);
        let selector = PivotSelector::default();
        assert_eq!(selector.choose_entering(&t), Some(1));
        assert_eq!(selector.choose_leaving(&t, 1), LeavingChoice::Unbounded);

        // Negating the row turns the zero entry into -0.0.
        t.scale_row(1, &-1.0);
        assert!(t.get(1, 1).is_sign_negative());
        assert_eq!(selector.choose_leaving(&t, 1), LeavingChoice::Unbounded);

        t.set_objective_row(vec![0.0, 1.0, -0.0, 0.0, 0.0]);
        assert_eq!(selector.choose_entering(&t), None);
    }

    #[test]
    fn test_leaving_unbounded() {
        let t = tableau(vec![1.0, 0.0], vec![(vec![-1.0, 1.0], 1.0)]);
        assert_eq!(
            PivotSelector::default().choose_leaving(&t, 1),
            LeavingChoice::Unbounded
        );
    }

    #[test]
    fn test_unbounded_direction() {
        // -x1 + x2 <= 1, x2 <= 3 with x2 made basic in row 1.
        let mut t = tableau(
            vec![1.0, 0.0],
            vec![(vec![-1.0, 1.0], 1.0), (vec![0.0, 1.0], 3.0)],
        );
        t.pivot(1, 3, &mut []);
        // Column 2 (x1) now reads [-1, 1] in rows 1 and 2.
        assert_eq!(t.get(1, 2), &-1.0);
        assert_eq!(t.get(2, 2), &1.0);
        let d = PivotSelector::default().unbounded_direction(&t, 2);
        assert_eq!(d, vec![1.0, 1.0]);
    }
}
