//! Classified outcome of a solve.

use crate::scalar::Real;
use serde::Serialize;

/// Outcome of solving a linear program, with its certificate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LpResult<T = Real> {
    /// Optimal solution with dual prices.
    Optimal {
        /// Objective value `cᵀx`.
        value: T,
        /// Primal solution, one entry per decision variable.
        x: Vec<T>,
        /// Dual prices, one per constraint.
        duals: Vec<T>,
    },
    /// No feasible point exists.
    Infeasible {
        /// Vector `y` with `yᵀA ≤ 0` and `yᵀb > 0`.
        certificate: Vec<T>,
    },
    /// The objective is unbounded above.
    Unbounded {
        /// A feasible point.
        point: Vec<T>,
        /// Direction `d` with `d ≥ 0`, `Ad ≤ 0` and `cᵀd > 0`.
        direction: Vec<T>,
    },
}

impl<T> LpResult<T> {
    /// Keyword printed by the text protocol.
    pub fn status_keyword(&self) -> &'static str {
        match self {
            LpResult::Optimal { .. } => "otima",
            LpResult::Infeasible { .. } => "inviavel",
            LpResult::Unbounded { .. } => "ilimitada",
        }
    }

    /// Whether an optimum was found.
    pub fn is_optimal(&self) -> bool {
        matches!(self, LpResult::Optimal { .. })
    }

    /// Whether the program was proved infeasible.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, LpResult::Infeasible { .. })
    }

    /// Whether the program was proved unbounded.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, LpResult::Unbounded { .. })
    }

    /// Optimal objective value, if any.
    pub fn objective_value(&self) -> Option<&T> {
        match self {
            LpResult::Optimal { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Convert every number to another scalar type.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> LpResult<U> {
        let mut convert = |v: &[T]| v.iter().map(&mut f).collect::<Vec<U>>();
        match self {
            LpResult::Optimal { value, x, duals } => {
                let x = convert(x);
                let duals = convert(duals);
                LpResult::Optimal {
                    value: f(value),
                    x,
                    duals,
                }
            }
            LpResult::Infeasible { certificate } => LpResult::Infeasible {
                certificate: convert(certificate),
            },
            LpResult::Unbounded { point, direction } => LpResult::Unbounded {
                point: convert(point),
                direction: convert(direction),
            },
        }
    }
}
