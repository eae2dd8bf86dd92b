//! Input processing and execution logic for OxiLP CLI
//!
//! Each input (a file or stdin) is parsed, solved with the floating or the
//! exact engine, optionally verified, and collected into a [`SolveReport`].
//! Reports are printed together once every input has been processed.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use num_rational::BigRational;
use oxilp_core::protocol::parse_program_as;
use oxilp_core::{
    CertificateError, LinearProgram, LpError, LpResult, ProtocolError, Scalar, SimplexStats,
    TwoPhaseSolver, verify,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::format::{eprintln_colored, eprintln_styled, output_reports, print_stats};
use crate::{Args, Verbosity};

/// Verification tolerance for floating results when none is configured
pub(crate) const DEFAULT_VERIFY_TOLERANCE: f64 = 1e-6;

/// Exit status when every input was solved (and verified, if requested)
pub(crate) const EXIT_OK: i32 = 0;
/// Exit status when an input could not be read, parsed or solved
pub(crate) const EXIT_ERROR: i32 = 1;
/// Exit status when a certificate failed verification
pub(crate) const EXIT_INVALID_CERTIFICATE: i32 = 2;

/// Errors raised while processing one input
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// The input could not be opened or read
    #[error("{source_name}: {error}")]
    Read {
        source_name: String,
        #[source]
        error: io::Error,
    },
    /// The input is not a valid program
    #[error("{source_name}: {error}")]
    Protocol {
        source_name: String,
        #[source]
        error: ProtocolError,
    },
    /// The solver stopped before classifying the program
    #[error("{source_name}: {error}")]
    Solve {
        source_name: String,
        #[source]
        error: LpError,
    },
    /// Output could not be written
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
    /// Output could not be serialized
    #[error("failed to serialize output: {0}")]
    Serialize(String),
}

/// Arithmetic used for one solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Engine {
    /// `f64` with noise rounding
    Float,
    /// `BigRational`
    Exact,
}

/// Outcome of one input
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SolveReport {
    /// File path, or `stdin`
    pub source: String,
    /// Arithmetic used
    pub engine: Engine,
    /// Classified result, converted to `f64` for printing
    #[serde(flatten)]
    pub result: LpResult<f64>,
    /// Pivot counters (with `--stats`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SimplexStats>,
    /// Whether the certificate verified (with `--verify`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_valid: Option<bool>,
    /// Reason the certificate was rejected
    #[serde(skip)]
    pub certificate_error: Option<CertificateError>,
    /// Wall-clock solve time in microseconds
    #[serde(skip)]
    pub time_us: u128,
}

/// Process stdin and print the result
pub(crate) fn run_stdin(args: &Args, verbosity: Verbosity) -> i32 {
    let stdin = io::stdin();
    let outcome = solve_input(stdin.lock(), "stdin", args);
    finish(vec![outcome], args, verbosity)
}

/// Process every input file and print the results
pub(crate) fn run_files(args: &Args, verbosity: Verbosity) -> i32 {
    if verbosity >= Verbosity::Verbose {
        eprintln_styled(
            args,
            &format!("Processing {} file(s)...", args.input.len()),
            Some(owo_colors::AnsiColors::Cyan),
        );
    }

    let outcomes = args
        .input
        .iter()
        .map(|path| solve_file(path, args))
        .collect();
    finish(outcomes, args, verbosity)
}

fn solve_file(path: &Path, args: &Args) -> Result<SolveReport, CliError> {
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|error| CliError::Read {
        source_name: source_name.clone(),
        error,
    })?;
    solve_input(BufReader::new(file), &source_name, args)
}

/// Parse, solve and optionally verify one program
pub(crate) fn solve_input<R: BufRead>(
    reader: R,
    source_name: &str,
    args: &Args,
) -> Result<SolveReport, CliError> {
    let solver = TwoPhaseSolver::new(args.simplex_config());

    if args.exact {
        let lp = parse::<BigRational, _>(reader, source_name)?;
        solve_with(&solver, &lp, 0.0, Engine::Exact, source_name, args)
    } else {
        let lp = parse::<f64, _>(reader, source_name)?;
        let tolerance = args.tolerance.unwrap_or(DEFAULT_VERIFY_TOLERANCE);
        solve_with(&solver, &lp, tolerance, Engine::Float, source_name, args)
    }
}

fn parse<T: Scalar, R: BufRead>(
    reader: R,
    source_name: &str,
) -> Result<LinearProgram<T>, CliError> {
    parse_program_as(reader).map_err(|error| match error {
        ProtocolError::Io(error) => CliError::Read {
            source_name: source_name.to_string(),
            error,
        },
        error => CliError::Protocol {
            source_name: source_name.to_string(),
            error,
        },
    })
}

fn solve_with<T: Scalar>(
    solver: &TwoPhaseSolver,
    lp: &LinearProgram<T>,
    tolerance: f64,
    engine: Engine,
    source_name: &str,
    args: &Args,
) -> Result<SolveReport, CliError> {
    debug!(
        source = source_name,
        ?engine,
        constraints = lp.num_constraints(),
        vars = lp.num_vars(),
        "solving"
    );

    let start = Instant::now();
    let (result, stats) = solver
        .solve_with_stats(lp)
        .map_err(|error| CliError::Solve {
            source_name: source_name.to_string(),
            error,
        })?;
    let time_us = start.elapsed().as_micros();

    let check = args.verify.then(|| verify(lp, &result, tolerance));
    info!(
        source = source_name,
        status = result.status_keyword(),
        pivots = stats.total_pivots(),
        "solved"
    );

    Ok(SolveReport {
        source: source_name.to_string(),
        engine,
        result: result.map(|v| v.as_f64()),
        stats: args.stats.then_some(stats),
        certificate_valid: check.as_ref().map(Result::is_ok),
        certificate_error: check.and_then(Result::err),
        time_us,
    })
}

/// Print reports and diagnostics, and compute the exit status
fn finish(
    outcomes: Vec<Result<SolveReport, CliError>>,
    args: &Args,
    verbosity: Verbosity,
) -> i32 {
    let mut reports = Vec::with_capacity(outcomes.len());
    let mut failed = false;

    for outcome in outcomes {
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln_colored(args, &format!("Error: {}", e));
                failed = true;
            }
        }
    }

    if let Err(e) = output_reports(&reports, args) {
        eprintln_colored(args, &format!("Error: {}", e));
        return EXIT_ERROR;
    }

    let mut invalid = false;
    for report in &reports {
        if let Some(ref stats) = report.stats {
            print_stats(report, stats, args);
        }

        if let Some(ref error) = report.certificate_error {
            eprintln_colored(
                args,
                &format!("{}: certificate check failed: {}", report.source, error),
            );
            invalid = true;
        } else if report.certificate_valid == Some(true) && verbosity >= Verbosity::Verbose {
            eprintln_styled(
                args,
                &format!("{}: certificate verified", report.source),
                Some(owo_colors::AnsiColors::Green),
            );
        }
    }

    if failed {
        EXIT_ERROR
    } else if invalid {
        EXIT_INVALID_CERTIFICATE
    } else {
        EXIT_OK
    }
}
