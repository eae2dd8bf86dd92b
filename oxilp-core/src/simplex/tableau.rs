//! Dense Gauss–Jordan tableau with an explicit basis.
//!
//! Column layout, left to right:
//!
//! | block      | width | contents                                        |
//! |------------|-------|-------------------------------------------------|
//! | tracking   | `m`   | identity at build time; row 0 holds dual prices |
//! | structural | `n`   | constraint coefficients                         |
//! | slack      | `m`   | identity                                        |
//! | artificial | `m`   | identity, present only during phase 1           |
//! | rhs        | `1`   | right-hand side                                 |
//!
//! Row 0 is the reduced-cost row of a minimization, rows `1..=m` are the
//! constraint rows. The tracking block undergoes exactly the row operations
//! applied to the slack block, so after any sequence of pivots its row-0
//! entries are the multipliers that combine the original rows into the
//! current objective row.

#![allow(clippy::needless_range_loop)] // Tableau code indexes rows and columns explicitly

use crate::problem::LinearProgram;
use crate::scalar::{Real, Scalar, round_row_noise};
use std::fmt;
use std::ops::Range;

/// Simplex tableau for one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau<T = Real> {
    /// `m + 1` rows; row 0 is the objective.
    rows: Vec<Vec<T>>,
    /// `basis[i]` is the column basic in constraint row `i + 1`.
    basis: Vec<usize>,
    /// Number of constraints `m`.
    num_constraints: usize,
    /// Number of decision variables `n`.
    num_vars: usize,
    /// Whether the artificial block is present.
    has_artificials: bool,
}

impl<T: Scalar> Tableau<T> {
    /// Build the initial tableau.
    ///
    /// Row 0 is `[0ᵐ, -c, 0ᵐ, 0]` and row `i + 1` is
    /// `[eᵢ, Aᵢ, eᵢ, bᵢ]`. The slack block is the starting basis.
    pub fn build(lp: &LinearProgram<T>) -> Self {
        let m = lp.num_constraints();
        let n = lp.num_vars();
        let width = m + n + m + 1;

        let mut rows = Vec::with_capacity(m + 1);

        let mut objective = vec![T::zero(); width];
        for (j, c) in lp.objective().iter().enumerate() {
            objective[m + j] = T::zero() - c.clone();
        }
        rows.push(objective);

        for (i, constraint) in lp.constraints().iter().enumerate() {
            let mut row = vec![T::zero(); width];
            row[i] = T::one();
            for (j, a) in constraint.coeffs.iter().enumerate() {
                row[m + j] = a.clone();
            }
            row[m + n + i] = T::one();
            row[width - 1] = constraint.rhs.clone();
            rows.push(row);
        }

        Self {
            rows,
            basis: (0..m).map(|i| m + n + i).collect(),
            num_constraints: m,
            num_vars: n,
            has_artificials: false,
        }
    }

    /// Number of constraints `m`.
    pub fn num_constraints(&self) -> usize {
        self.num_constraints
    }

    /// Number of decision variables `n`.
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Total number of columns, including the right-hand side.
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    /// Index of the right-hand-side column.
    pub fn rhs_col(&self) -> usize {
        self.width() - 1
    }

    /// Columns of the dual-price tracking block.
    pub fn tracking_range(&self) -> Range<usize> {
        0..self.num_constraints
    }

    /// Columns of the decision variables.
    pub fn structural_range(&self) -> Range<usize> {
        let start = self.num_constraints;
        start..start + self.num_vars
    }

    /// Columns of the slack variables.
    pub fn slack_range(&self) -> Range<usize> {
        let start = self.num_constraints + self.num_vars;
        start..start + self.num_constraints
    }

    /// Columns of the artificial variables, if present.
    pub fn artificial_range(&self) -> Option<Range<usize>> {
        self.has_artificials.then(|| {
            let start = 2 * self.num_constraints + self.num_vars;
            start..start + self.num_constraints
        })
    }

    /// Columns eligible to enter the basis: everything except the tracking
    /// block and the right-hand side.
    pub fn pricing_range(&self) -> Range<usize> {
        self.num_constraints..self.rhs_col()
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.rows[row][col]
    }

    /// Full row `row`.
    pub fn row(&self, row: usize) -> &[T] {
        &self.rows[row]
    }

    /// Reduced-cost row.
    pub fn objective_row(&self) -> &[T] {
        &self.rows[0]
    }

    /// Right-hand side of `row`.
    pub fn rhs(&self, row: usize) -> &T {
        &self.rows[row][self.rhs_col()]
    }

    /// Current value of the row-0 objective.
    pub fn objective_value(&self) -> &T {
        self.rhs(0)
    }

    /// Basic column of every constraint row, in row order.
    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    /// Column basic in constraint row `row` (`1..=m`).
    pub fn basic_variable(&self, row: usize) -> usize {
        self.basis[row - 1]
    }

    /// Row (`1..=m`) in which `col` is basic, or `None` for a non-basic
    /// column.
    pub fn find_basic_column(&self, col: usize) -> Option<usize> {
        self.basis.iter().position(|&b| b == col).map(|i| i + 1)
    }

    /// Replace row 0.
    pub fn set_objective_row(&mut self, row: Vec<T>) {
        debug_assert_eq!(row.len(), self.width());
        self.rows[0] = row;
    }

    /// Divide row `row` by `factor`. `factor` must be non-zero.
    pub fn scale_row(&mut self, row: usize, factor: &T) {
        debug_assert!(!factor.is_zero(), "scaling by zero");
        for value in self.rows[row].iter_mut() {
            *value = value.clone() / factor.clone();
        }
    }

    /// Clear column `pivot_col` from every row except `pivot_row`.
    ///
    /// `extra_rows` are updated exactly like the tableau's own non-pivot rows.
    pub fn eliminate(&mut self, pivot_row: usize, pivot_col: usize, extra_rows: &mut [Vec<T>]) {
        let pivot = self.rows[pivot_row].clone();
        for (idx, row) in self.rows.iter_mut().enumerate() {
            if idx != pivot_row {
                subtract_multiple(row, &pivot, pivot_col);
            }
        }
        for row in extra_rows.iter_mut() {
            subtract_multiple(row, &pivot, pivot_col);
        }
    }

    /// Gauss–Jordan pivot on `(row, col)`; `col` becomes basic in `row`.
    pub fn pivot(&mut self, row: usize, col: usize, extra_rows: &mut [Vec<T>]) {
        let factor = self.rows[row][col].clone();
        self.scale_row(row, &factor);
        self.eliminate(row, col, extra_rows);
        self.basis[row - 1] = col;
    }

    /// Clamp noise to zero and round every entry.
    pub fn round_noise(&mut self, tolerance: f64, digits: u32) {
        for row in &mut self.rows {
            round_row_noise(row, tolerance, digits);
        }
    }

    /// Negate every constraint row with a negative right-hand side.
    ///
    /// Entries are negated as `0 - x`, so zeros stay positive zeros.
    ///
    /// Returns the number of rows flipped.
    pub fn normalize_rhs_signs(&mut self) -> usize {
        let rhs_col = self.rhs_col();
        let mut flipped = 0;
        for row in self.rows.iter_mut().skip(1) {
            if row[rhs_col] < T::zero() {
                for value in row.iter_mut() {
                    *value = T::zero() - value.clone();
                }
                flipped += 1;
            }
        }
        flipped
    }

    /// Insert an identity block of artificial variables in front of the
    /// right-hand side and make it the basis. Row 0 gets zeros.
    pub fn append_artificials(&mut self) {
        debug_assert!(!self.has_artificials);
        let m = self.num_constraints;
        let start = self.rhs_col();
        for (idx, row) in self.rows.iter_mut().enumerate() {
            let block = (0..m).map(|i| {
                if idx == i + 1 {
                    T::one()
                } else {
                    T::zero()
                }
            });
            row.splice(start..start, block);
        }
        self.basis = (0..m).map(|i| start + i).collect();
        self.has_artificials = true;
    }

    /// Load the auxiliary objective "minimize the sum of artificials"
    /// expressed in the artificial basis: unit cost on every artificial
    /// column minus the sum of all constraint rows.
    pub fn load_phase_one_objective(&mut self) {
        let Some(artificials) = self.artificial_range() else {
            return;
        };
        let mut objective = vec![T::zero(); self.width()];
        for col in artificials {
            objective[col] = T::one();
        }
        for row in self.rows.iter().skip(1) {
            for (target, value) in objective.iter_mut().zip(row) {
                *target = target.clone() - value.clone();
            }
        }
        self.rows[0] = objective;
    }

    /// Constraint rows whose basic variable is artificial.
    pub fn artificial_basic_rows(&self) -> Vec<usize> {
        match self.artificial_range() {
            Some(range) => self
                .basis
                .iter()
                .enumerate()
                .filter(|(_, col)| range.contains(col))
                .map(|(i, _)| i + 1)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Remove the artificial block from the tableau and from `extra_rows`.
    ///
    /// No artificial column may still be basic.
    pub fn drop_artificials(&mut self, extra_rows: &mut [Vec<T>]) {
        let Some(range) = self.artificial_range() else {
            return;
        };
        debug_assert!(self.basis.iter().all(|col| !range.contains(col)));
        for row in self.rows.iter_mut().chain(extra_rows.iter_mut()) {
            row.drain(range.clone());
        }
        self.has_artificials = false;
    }

    /// Values of the decision variables in the current basic solution.
    pub fn primal_solution(&self) -> Vec<T> {
        let structural = self.structural_range();
        let mut x = vec![T::zero(); self.num_vars];
        for (i, &col) in self.basis.iter().enumerate() {
            if structural.contains(&col) {
                x[col - structural.start] = self.rhs(i + 1).clone();
            }
        }
        x
    }

    /// Row-0 entries of the tracking block.
    pub fn dual_prices(&self) -> Vec<T> {
        self.rows[0][self.tracking_range()].to_vec()
    }
}

/// `row -= pivot * row[col]`.
fn subtract_multiple<T: Scalar>(row: &mut [T], pivot: &[T], col: usize) {
    let factor = row[col].clone();
    if factor.is_zero() {
        return;
    }
    for (value, p) in row.iter_mut().zip(pivot) {
        *value = value.clone() - p.clone() * factor.clone();
    }
}

impl<T: Scalar> fmt::Display for Tableau<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.rows.iter().enumerate() {
            if idx == 0 {
                write!(f, "  z |")?;
            } else {
                write!(f, "{:>3} |", self.basis[idx - 1])?;
            }
            for value in row {
                write!(f, " {value:>10}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Constraint, LinearProgram};

    fn sample() -> LinearProgram<f64> {
        LinearProgram::new(
            vec![3.0, 2.0],
            vec![
                Constraint::new(vec![1.0, 1.0], 4.0),
                Constraint::new(vec![1.0, 0.0], -3.0),
            ],
        )
        .expect("valid program")
    }

    #[test]
    fn test_build_layout() {
        let t = Tableau::build(&sample());
        assert_eq!(t.width(), 2 + 2 * 2 + 1);
        assert_eq!(t.objective_row(), &[0.0, 0.0, -3.0, -2.0, 0.0, 0.0, 0.0]);
        assert_eq!(t.row(1), &[1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 4.0]);
        assert_eq!(t.row(2), &[0.0, 1.0, 1.0, 0.0, 0.0, 1.0, -3.0]);
        assert_eq!(t.basis(), &[4, 5]);
        assert_eq!(t.tracking_range(), 0..2);
        assert_eq!(t.structural_range(), 2..4);
        assert_eq!(t.slack_range(), 4..6);
        assert_eq!(t.artificial_range(), None);
        assert_eq!(t.pricing_range(), 2..6);
    }

    #[test]
    fn test_pivot_updates_rows_basis_and_extra_rows() {
        let mut t = Tableau::build(&sample());
        let mut extra = vec![t.objective_row().to_vec()];

        t.pivot(1, 2, &mut extra);

        assert_eq!(t.basis(), &[2, 5]);
        assert_eq!(t.find_basic_column(2), Some(1));
        assert_eq!(t.find_basic_column(4), None);
        assert_eq!(t.row(1), &[1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 4.0]);
        assert_eq!(t.row(2), &[-1.0, 1.0, 0.0, -1.0, -1.0, 1.0, -7.0]);
        assert_eq!(t.objective_row(), &[3.0, 0.0, 0.0, 1.0, 3.0, 0.0, 12.0]);
        assert_eq!(extra[0], t.objective_row());
        assert_eq!(t.primal_solution(), vec![4.0, 0.0]);
        assert_eq!(t.dual_prices(), vec![3.0, 0.0]);
    }

    #[test]
    fn test_scale_row() {
        let mut t = Tableau::build(&sample());
        t.scale_row(1, &2.0);
        assert_eq!(t.row(1), &[0.5, 0.0, 0.5, 0.5, 0.5, 0.0, 2.0]);
    }

    #[test]
    fn test_phase_one_setup() {
        let mut t = Tableau::build(&sample());
        assert_eq!(t.normalize_rhs_signs(), 1);
        assert_eq!(t.row(2), &[0.0, -1.0, -1.0, 0.0, 0.0, -1.0, 3.0]);

        t.append_artificials();
        assert_eq!(t.width(), 2 + 2 + 2 + 2 + 1);
        assert_eq!(t.artificial_range(), Some(6..8));
        assert_eq!(t.basis(), &[6, 7]);
        assert_eq!(t.row(2), &[0.0, -1.0, -1.0, 0.0, 0.0, -1.0, 0.0, 1.0, 3.0]);
        assert_eq!(t.artificial_basic_rows(), vec![1, 2]);

        t.load_phase_one_objective();
        assert_eq!(
            t.objective_row(),
            &[-1.0, 1.0, 0.0, -1.0, -1.0, 1.0, 0.0, 0.0, -7.0]
        );
    }

    #[test]
    fn test_drop_artificials() {
        let mut t = Tableau::build(&sample());
        t.append_artificials();
        let mut extra = vec![t.objective_row().to_vec()];
        t.pivot(1, 2, &mut extra);
        t.pivot(2, 5, &mut extra);

        t.drop_artificials(&mut extra);
        assert_eq!(t.width(), 7);
        assert_eq!(extra[0].len(), 7);
        assert_eq!(t.artificial_range(), None);
        assert!(t.artificial_basic_rows().is_empty());
    }

    #[test]
    fn test_round_noise() {
        let mut t = Tableau::build(&sample());
        t.scale_row(1, &3.0);
        t.scale_row(1, &(1.0 / 3.0));
        t.round_noise(1e-9, 12);
        assert_eq!(t.row(1), &[1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 4.0]);
    }

    #[test]
    fn test_display_lists_basis() {
        let t = Tableau::build(&sample());
        let text = t.to_string();
        assert!(text.starts_with("  z |"));
        assert_eq!(text.lines().count(), 3);
    }
}
