//! OxiLP CLI - Command-line interface for the OxiLP linear program solver

mod format;
mod processor;

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{Shell, generate};
use oxilp_core::SimplexConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use format::eprintln_colored;
use processor::{run_files, run_stdin};

/// Errors raised while loading a configuration file
#[derive(Debug, Error)]
enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid YAML for [`CliConfig`]
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
struct CliConfig {
    /// Default verbosity level
    #[serde(default)]
    verbosity: Option<String>,
    /// Default output format
    #[serde(default)]
    format: Option<String>,
    /// Use exact rational arithmetic by default
    #[serde(default)]
    exact: Option<bool>,
    /// Verify certificates by default
    #[serde(default)]
    verify: Option<bool>,
    /// Default verification tolerance
    #[serde(default)]
    tolerance: Option<f64>,
    /// Default pivot cap per phase
    #[serde(default)]
    max_iterations: Option<usize>,
    /// Enable colors by default
    #[serde(default)]
    color: Option<bool>,
}

impl CliConfig {
    /// Load configuration from `explicit`, or from the default locations.
    ///
    /// A missing or unreadable default file yields the empty configuration;
    /// an explicit file must exist and parse.
    fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::read(path);
        }

        let config_path = dirs::home_dir()
            .map(|mut p| {
                p.push(".oxilprc");
                p
            })
            .filter(|p| p.exists())
            .or_else(|| {
                dirs::config_dir().map(|mut p| {
                    p.push("oxilp");
                    p.push("config.yaml");
                    p
                })
            });

        if let Some(path) = config_path
            && path.exists()
            && let Ok(config) = Self::read(&path)
        {
            return Ok(config);
        }

        Ok(Self::default())
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Merge configuration with command-line arguments
    fn merge_with_args(&self, args: &mut Args) {
        // Only apply config if arg is not explicitly set
        if args.verbosity == Verbosity::Normal
            && let Some(ref v) = self.verbosity
        {
            match v.as_str() {
                "quiet" => args.verbosity = Verbosity::Quiet,
                "verbose" => args.verbosity = Verbosity::Verbose,
                "debug" => args.verbosity = Verbosity::Debug,
                "trace" => args.verbosity = Verbosity::Trace,
                _ => {}
            }
        }

        if args.format == OutputFormat::Text
            && let Some(ref f) = self.format
        {
            match f.as_str() {
                "json" => args.format = OutputFormat::Json,
                "yaml" => args.format = OutputFormat::Yaml,
                _ => {}
            }
        }

        if self.exact == Some(true) {
            args.exact = true;
        }

        if self.verify == Some(true) {
            args.verify = true;
        }

        if args.tolerance.is_none() {
            args.tolerance = self.tolerance;
        }

        if args.max_iterations.is_none() {
            args.max_iterations = self.max_iterations;
        }

        if let Some(color) = self.color
            && !color
        {
            args.no_color = true;
        }
    }
}

/// Output format for results
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    /// Status keyword and numbers, seven fractional digits (default)
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity {
    /// No output except results
    Quiet,
    /// Minimal output
    Normal,
    /// Detailed output
    Verbose,
    /// Debug output
    Debug,
    /// Trace output
    Trace,
}

/// OxiLP - Linear program solver with verifiable certificates
#[derive(Parser, Debug, Clone)]
#[command(name = "oxilp")]
#[command(author = "COOLJAPAN OU (Team KitaSan)")]
#[command(version)]
#[command(about = "Solve max cᵀx s.t. Ax ≤ b, x ≥ 0 and print a certificate for the outcome")]
struct Args {
    /// Input file(s). If not provided, reads from stdin.
    #[arg(value_name = "FILE")]
    input: Vec<PathBuf>,

    /// Output file. If not provided, writes to stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Solve with exact rational arithmetic
    #[arg(long)]
    exact: bool,

    /// Check the returned certificate against the program (exit code 2 if invalid)
    #[arg(long)]
    verify: bool,

    /// Absolute tolerance for verifying floating results
    #[arg(long, value_name = "TOL")]
    tolerance: Option<f64>,

    /// Magnitudes below this are treated as rounding noise by the floating engine
    #[arg(long, value_name = "TOL")]
    zero_tolerance: Option<f64>,

    /// Maximum number of pivots per phase
    #[arg(long, value_name = "N")]
    max_iterations: Option<usize>,

    /// Print pivot statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Verbosity level
    #[arg(short, long, value_enum, default_value = "normal")]
    verbosity: Verbosity,

    /// Enable quiet mode (equivalent to --verbosity quiet)
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Configuration file (defaults to ~/.oxilprc)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Generate shell completion script for the specified shell
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

impl Args {
    /// Solver configuration selected by the flags
    fn simplex_config(&self) -> SimplexConfig {
        let mut config = SimplexConfig::default();
        if let Some(tolerance) = self.zero_tolerance {
            config = config.with_zero_tolerance(tolerance);
        }
        if let Some(limit) = self.max_iterations {
            config = config.with_max_iterations(limit);
        }
        config
    }
}

fn main() {
    let mut args = Args::parse();

    // Handle completion generation
    if let Some(shell) = args.completions {
        let mut cmd = Args::command();
        let bin_name = cmd.get_name().to_string();
        generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        return;
    }

    // Load configuration file and merge with args
    let config = match CliConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln_colored(&args, &format!("Error: {}", e));
            std::process::exit(1);
        }
    };
    config.merge_with_args(&mut args);

    // Determine verbosity level
    let verbosity = if args.quiet {
        Verbosity::Quiet
    } else {
        args.verbosity
    };

    // Set up logging
    if verbosity >= Verbosity::Debug {
        let level = match verbosity {
            Verbosity::Trace => Level::TRACE,
            _ => Level::DEBUG,
        };
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish();
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln_colored(&args, &format!("Failed to set tracing subscriber: {}", e));
            std::process::exit(1);
        }
    }

    let code = if args.input.is_empty() {
        run_stdin(&args, verbosity)
    } else {
        run_files(&args, verbosity)
    };
    std::process::exit(code);
}
