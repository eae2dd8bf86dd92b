//! Line-oriented text format for programs and results.
//!
//! Input:
//! - Header line: the first unsigned integer is the constraint count `m`
//!   (a second integer, the variable count, is accepted and ignored)
//! - Objective line: `n` signed integers
//! - `m` constraint lines: `n` coefficients followed by the right-hand side
//!
//! Integers are maximal `-?[0-9]+` runs; every other character separates
//! them, so `2 3`, `2,3` and `m=2 n=3` are all valid headers. Blank lines
//! are skipped.
//!
//! Output is a status keyword (`otima`, `inviavel` or `ilimitada`)
//! followed by one line per number or vector, every number printed with
//! seven fractional digits.

use crate::error::LpError;
use crate::problem::{Constraint, LinearProgram};
use crate::result::LpResult;
use crate::scalar::Scalar;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Fractional digits printed for every number.
pub const OUTPUT_DIGITS: usize = 7;

/// Errors raised while reading a program.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The underlying reader failed.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    /// Input ended before a required line.
    #[error("unexpected end of input: missing {what}")]
    MissingLine {
        /// Description of the missing line.
        what: String,
    },
    /// The header carries no constraint count.
    #[error("line {line}: header does not contain a constraint count")]
    InvalidHeader {
        /// One-based line number.
        line: usize,
    },
    /// A token looks like an integer but does not fit in 64 bits.
    #[error("line {line}: integer '{token}' out of range")]
    InvalidInteger {
        /// One-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// A constraint line has the wrong number of integers.
    #[error("line {line}: expected {expected} integers, found {found}")]
    RowLength {
        /// One-based line number.
        line: usize,
        /// `n + 1`.
        expected: usize,
        /// Integers actually present.
        found: usize,
    },
    /// The parsed data does not form a valid program.
    #[error(transparent)]
    Model(#[from] LpError),
}

/// Read a program with integer coefficients.
pub fn parse_program<R: BufRead>(reader: R) -> Result<LinearProgram<i64>, ProtocolError> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(index, line)| line.map(|text| (index + 1, text)))
        .filter(|line| !matches!(line, Ok((_, text)) if text.trim().is_empty()));

    let mut next_line = |what: &str| -> Result<(usize, String), ProtocolError> {
        match lines.next() {
            Some(line) => Ok(line?),
            None => Err(ProtocolError::MissingLine {
                what: what.to_string(),
            }),
        }
    };

    let (header_line, header) = next_line("header")?;
    let num_constraints = unsigned_integers(&header)
        .next()
        .and_then(|token| token.parse::<usize>().ok())
        .ok_or(ProtocolError::InvalidHeader { line: header_line })?;

    let (objective_line, objective_text) = next_line("objective")?;
    let objective = signed_integers(&objective_text, objective_line)?;
    let num_vars = objective.len();

    let mut constraints = Vec::new();
    for row in 0..num_constraints {
        let (line, text) = next_line(&format!("constraint {}", row + 1))?;
        let mut values = signed_integers(&text, line)?;
        if values.len() != num_vars + 1 {
            return Err(ProtocolError::RowLength {
                line,
                expected: num_vars + 1,
                found: values.len(),
            });
        }
        let rhs = values.pop().unwrap_or_default();
        constraints.push(Constraint::new(values, rhs));
    }

    Ok(LinearProgram::new(objective, constraints)?)
}

/// Read a program and convert its coefficients to `T`.
pub fn parse_program_as<T: Scalar, R: BufRead>(
    reader: R,
) -> Result<LinearProgram<T>, ProtocolError> {
    parse_program(reader).map(|lp| LinearProgram::from_integers(&lp))
}

/// Maximal runs of ASCII digits.
fn unsigned_integers(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|token| !token.is_empty())
}

/// Maximal `-?[0-9]+` runs, parsed.
fn signed_integers(text: &str, line: usize) -> Result<Vec<i64>, ProtocolError> {
    let bytes = text.as_bytes();
    let mut values = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let negative = bytes[pos] == b'-'
            && bytes.get(pos + 1).is_some_and(|b| b.is_ascii_digit());
        if !negative && !bytes[pos].is_ascii_digit() {
            pos += 1;
            continue;
        }

        let start = pos;
        pos += usize::from(negative);
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }

        let token = &text[start..pos];
        let value = token
            .parse::<i64>()
            .map_err(|_| ProtocolError::InvalidInteger {
                line,
                token: token.to_string(),
            })?;
        values.push(value);
    }

    Ok(values)
}

/// Format one number with [`OUTPUT_DIGITS`] fractional digits.
///
/// Values that round to zero are printed without a sign.
pub fn format_number<T: Scalar>(value: &T) -> String {
    let text = format!("{:.*}", OUTPUT_DIGITS, value.as_f64());
    match text.strip_prefix('-') {
        Some(magnitude) if magnitude.bytes().all(|b| b == b'0' || b == b'.') => {
            magnitude.to_string()
        }
        _ => text,
    }
}

/// Format a vector as space-separated numbers.
pub fn format_vector<T: Scalar>(values: &[T]) -> String {
    values
        .iter()
        .map(format_number)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write `result` in the text format.
pub fn write_result<W: Write, T: Scalar>(mut writer: W, result: &LpResult<T>) -> io::Result<()> {
    writeln!(writer, "{}", result.status_keyword())?;
    match result {
        LpResult::Optimal { value, x, duals } => {
            writeln!(writer, "{}", format_number(value))?;
            writeln!(writer, "{}", format_vector(x))?;
            writeln!(writer, "{}", format_vector(duals))?;
        }
        LpResult::Infeasible { certificate } => {
            writeln!(writer, "{}", format_vector(certificate))?;
        }
        LpResult::Unbounded { point, direction } => {
            writeln!(writer, "{}", format_vector(point))?;
            writeln!(writer, "{}", format_vector(direction))?;
        }
    }
    Ok(())
}
