//! OxiLP Core - Two-Phase Simplex with Certificates
//!
//! This crate solves linear programs in the canonical form
//!
//! ```text
//! maximize    cᵀx
//! subject to  Ax ≤ b
//!             x ≥ 0
//! ```
//!
//! with a dense two-phase tableau simplex, and returns every outcome
//! together with a certificate that can be checked independently:
//!
//! - **Optimal**: the value, a primal solution and dual prices
//! - **Infeasible**: a Farkas vector `y` with `yᵀA ≤ 0` and `yᵀb > 0`
//! - **Unbounded**: a feasible point and an improving recession direction
//!
//! The engine is generic over [`Scalar`]: `f64` with noise rounding, or
//! exact [`num_rational::BigRational`] arithmetic.
//!
//! # Examples
//!
//! ```
//! use oxilp_core::{LinearProgramBuilder, LpResult, solve, verify};
//!
//! let lp = LinearProgramBuilder::new(vec![3.0, 2.0])
//!     .constraint(vec![1.0, 1.0], 4.0)
//!     .constraint(vec![1.0, 0.0], 3.0)
//!     .build()
//!     .expect("valid program");
//!
//! let result = solve(&lp).expect("no iteration limit configured");
//! assert_eq!(
//!     result,
//!     LpResult::Optimal {
//!         value: 11.0,
//!         x: vec![3.0, 1.0],
//!         duals: vec![2.0, 1.0],
//!     }
//! );
//! assert!(verify(&lp, &result, 1e-9).is_ok());
//! ```
//!
//! Reading the text format:
//!
//! ```
//! use oxilp_core::protocol::{parse_program_as, write_result};
//! use oxilp_core::solve;
//!
//! let input = "1 1\n1\n1 -1\n";
//! let lp = parse_program_as::<f64, _>(input.as_bytes()).expect("valid input");
//! let result = solve(&lp).expect("no iteration limit configured");
//!
//! let mut out = Vec::new();
//! write_result(&mut out, &result).expect("write to vec");
//! assert_eq!(String::from_utf8(out).unwrap(), "inviavel\n-1.0000000\n");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod certificate;
pub mod error;
pub mod problem;
pub mod protocol;
pub mod result;
pub mod scalar;
pub mod simplex;

pub use certificate::{CertificateError, verify};
pub use error::LpError;
pub use problem::{Constraint, LinearProgram, LinearProgramBuilder, VarId};
pub use protocol::{ProtocolError, parse_program, write_result};
pub use result::LpResult;
pub use scalar::{Real, Scalar};
pub use simplex::{SimplexConfig, SimplexStats, TwoPhaseSolver, solve};
