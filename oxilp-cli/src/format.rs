//! Output formatting and display utilities for OxiLP CLI

use owo_colors::{OwoColorize, Stream};
use oxilp_core::SimplexStats;
use oxilp_core::protocol::write_result;
use serde::Serialize;
use std::fs;
use std::io::Write;

use crate::processor::{CliError, SolveReport};
use crate::{Args, OutputFormat};

/// Render every report in the text format.
///
/// With more than one report each block is preceded by a `==> source <==`
/// header line.
pub(crate) fn render_text(reports: &[SolveReport]) -> Result<String, CliError> {
    let mut out = Vec::new();
    let with_headers = reports.len() > 1;

    for (idx, report) in reports.iter().enumerate() {
        if with_headers {
            if idx > 0 {
                writeln!(out)?;
            }
            writeln!(out, "==> {} <==", report.source)?;
        }
        write_result(&mut out, &report.result)?;
    }

    String::from_utf8(out).map_err(|e| CliError::Serialize(e.to_string()))
}

#[derive(Serialize)]
struct StructuredOutput<'a> {
    results: &'a [SolveReport],
}

/// Render every report as pretty-printed JSON
pub(crate) fn render_json(reports: &[SolveReport]) -> Result<String, CliError> {
    serde_json::to_string_pretty(&StructuredOutput { results: reports })
        .map(|mut json| {
            json.push('\n');
            json
        })
        .map_err(|e| CliError::Serialize(e.to_string()))
}

/// Render every report as YAML
pub(crate) fn render_yaml(reports: &[SolveReport]) -> Result<String, CliError> {
    serde_yaml::to_string(&StructuredOutput { results: reports })
        .map_err(|e| CliError::Serialize(e.to_string()))
}

/// Output reports in the requested format
pub(crate) fn output_reports(reports: &[SolveReport], args: &Args) -> Result<(), CliError> {
    if reports.is_empty() {
        return Ok(());
    }

    let rendered = match args.format {
        OutputFormat::Text => render_text(reports)?,
        OutputFormat::Json => render_json(reports)?,
        OutputFormat::Yaml => render_yaml(reports)?,
    };

    if let Some(path) = args.output.as_ref() {
        fs::write(path, rendered)?;
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(rendered.as_bytes())?;
        handle.flush()?;
    }
    Ok(())
}

/// Print pivot statistics for one report to stderr
pub(crate) fn print_stats(report: &SolveReport, stats: &SimplexStats, args: &Args) {
    eprintln_styled(
        args,
        &format!("Statistics for {}:", report.source),
        Some(owo_colors::AnsiColors::Yellow),
    );
    eprintln_styled(
        args,
        &format!("  Rows normalized: {}", stats.rows_normalized),
        None,
    );
    eprintln_styled(
        args,
        &format!("  Phase 1 pivots: {}", stats.phase1_pivots),
        None,
    );
    eprintln_styled(
        args,
        &format!("  Phase 2 pivots: {}", stats.phase2_pivots),
        None,
    );
    eprintln_styled(
        args,
        &format!("  Degenerate pivots: {}", stats.degenerate_pivots),
        None,
    );
    if stats.artificials_driven_out > 0 {
        eprintln_styled(
            args,
            &format!("  Artificials driven out: {}", stats.artificials_driven_out),
            Some(owo_colors::AnsiColors::BrightBlack),
        );
    }

    let time_display = if report.time_us >= 1000 {
        format!("{:.2}ms", report.time_us as f64 / 1000.0)
    } else {
        format!("{}μs", report.time_us)
    };
    eprintln_styled(args, &format!("  Solve time: {}", time_display), None);
}

/// Print colored text to stderr
pub(crate) fn eprintln_styled(args: &Args, text: &str, color: Option<owo_colors::AnsiColors>) {
    if args.no_color {
        eprintln!("{}", text);
    } else if let Some(c) = color {
        eprintln!("{}", text.if_supports_color(Stream::Stderr, |t| t.color(c)));
    } else {
        eprintln!("{}", text);
    }
}

/// Print colored error message to stderr
pub(crate) fn eprintln_colored(args: &Args, text: &str) {
    if args.no_color {
        eprintln!("{}", text);
    } else {
        eprintln!("{}", text.if_supports_color(Stream::Stderr, |t| t.red()));
    }
}
