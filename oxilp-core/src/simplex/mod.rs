//! Two-phase tableau simplex engine.

pub mod phase;
pub mod pivot;
pub mod tableau;
pub mod two_phase;

pub use phase::{Phase, PhaseOutcome, PhaseRunner};
pub use pivot::{LeavingChoice, PivotSelector};
pub use tableau::Tableau;
pub use two_phase::{SimplexConfig, SimplexStats, TwoPhaseSolver, solve};
