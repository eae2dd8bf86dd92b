//! Linear programs in canonical form.
//!
//! ```text
//! maximize   cᵀx
//! subject to Ax ≤ b
//!            x ≥ 0
//! ```
//!
//! A [`LinearProgram`] is validated once at construction and never
//! mutated by the solver.

use crate::error::LpError;
use crate::scalar::{Real, Scalar, dot};
use num_traits::Zero;
use rustc_hash::FxHashMap;

/// Variable identifier (column of the constraint matrix).
pub type VarId = usize;

/// A single `coeffs · x ≤ rhs` row.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint<T = Real> {
    /// Coefficients, one per decision variable.
    pub coeffs: Vec<T>,
    /// Right-hand side.
    pub rhs: T,
}

impl<T> Constraint<T> {
    /// Create a dense constraint.
    pub fn new(coeffs: Vec<T>, rhs: T) -> Self {
        Self { coeffs, rhs }
    }
}

impl<T: Clone + Zero> Constraint<T> {
    /// Create a constraint from `(variable, coefficient)` pairs.
    ///
    /// Variables that do not appear get a zero coefficient.
    pub fn from_sparse(
        num_vars: usize,
        coeffs: &FxHashMap<VarId, T>,
        rhs: T,
    ) -> Result<Self, LpError> {
        let mut dense = vec![T::zero(); num_vars];
        for (&var, coeff) in coeffs {
            let slot = dense
                .get_mut(var)
                .ok_or(LpError::SparseIndexOutOfRange { index: var, num_vars })?;
            *slot = coeff.clone();
        }
        Ok(Self { coeffs: dense, rhs })
    }
}

impl<T: Scalar> Constraint<T> {
    /// Left-hand side value `coeffs · x`.
    pub fn activity(&self, x: &[T]) -> T {
        dot(&self.coeffs, x)
    }
}

/// `max cᵀx  s.t.  Ax ≤ b, x ≥ 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram<T = Real> {
    objective: Vec<T>,
    constraints: Vec<Constraint<T>>,
}

impl<T> LinearProgram<T> {
    /// Create a linear program, checking that every row has one
    /// coefficient per objective entry.
    pub fn new(objective: Vec<T>, constraints: Vec<Constraint<T>>) -> Result<Self, LpError> {
        if objective.is_empty() {
            return Err(LpError::EmptyObjective);
        }
        if constraints.is_empty() {
            return Err(LpError::NoConstraints);
        }
        let expected = objective.len();
        if let Some((row, constraint)) = constraints
            .iter()
            .enumerate()
            .find(|(_, c)| c.coeffs.len() != expected)
        {
            return Err(LpError::DimensionMismatch {
                row,
                expected,
                found: constraint.coeffs.len(),
            });
        }
        Ok(Self {
            objective,
            constraints,
        })
    }

    /// Number of decision variables `n`.
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Number of constraint rows `m`.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective coefficients `c`.
    pub fn objective(&self) -> &[T] {
        &self.objective
    }

    /// Constraint rows in input order.
    pub fn constraints(&self) -> &[Constraint<T>] {
        &self.constraints
    }

    /// Right-hand sides `b` in row order.
    pub fn rhs(&self) -> impl Iterator<Item = &T> + '_ {
        self.constraints.iter().map(|c| &c.rhs)
    }

    /// Convert every coefficient to another scalar type.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> LinearProgram<U> {
        LinearProgram {
            objective: self.objective.iter().map(&mut f).collect(),
            constraints: self
                .constraints
                .iter()
                .map(|c| Constraint {
                    coeffs: c.coeffs.iter().map(&mut f).collect(),
                    rhs: f(&c.rhs),
                })
                .collect(),
        }
    }
}

impl<T: Scalar> LinearProgram<T> {
    /// Objective value `cᵀx`.
    pub fn objective_value(&self, x: &[T]) -> T {
        dot(&self.objective, x)
    }

    /// Activity `Aᵢ · x` of constraint `row`.
    pub fn row_activity(&self, row: usize, x: &[T]) -> T {
        self.constraints[row].activity(x)
    }

    /// Build from an integer program, the usual input form.
    pub fn from_integers(lp: &LinearProgram<i64>) -> Self {
        lp.map(|&v| T::from_int(v))
    }
}

/// Incremental construction, one constraint at a time.
#[derive(Debug, Clone)]
pub struct LinearProgramBuilder<T = Real> {
    objective: Vec<T>,
    constraints: Vec<Constraint<T>>,
}

impl<T> LinearProgramBuilder<T> {
    /// Start from the objective coefficients.
    pub fn new(objective: Vec<T>) -> Self {
        Self {
            objective,
            constraints: Vec::new(),
        }
    }

    /// Append `coeffs · x ≤ rhs`.
    #[must_use]
    pub fn constraint(mut self, coeffs: Vec<T>, rhs: T) -> Self {
        self.constraints.push(Constraint::new(coeffs, rhs));
        self
    }

    /// Append an already built row.
    pub fn push(&mut self, constraint: Constraint<T>) -> &mut Self {
        self.constraints.push(constraint);
        self
    }

    /// Validate and finish.
    pub fn build(self) -> Result<LinearProgram<T>, LpError> {
        LinearProgram::new(self.objective, self.constraints)
    }
}
