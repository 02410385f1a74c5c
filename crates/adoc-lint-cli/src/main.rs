//! adoc-lint CLI tool.
//!
//! Usage:
//! ```bash
//! adoc-lint check [OPTIONS] [INPUTS]...
//! adoc-lint init
//! ```

use adoc_lint_core::Severity;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Structure and content validator for AsciiDoc document trees
#[derive(Parser)]
#[command(name = "adoc-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the rule file
    #[arg(short, long, global = true, env = "ADOC_LINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate document trees
    Check {
        /// Document tree JSON files or directories (default: current directory)
        #[arg(default_value = ".")]
        inputs: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Context lines around each finding (overrides the rule file)
        #[arg(long)]
        context: Option<usize>,

        /// Lowest severity that fails the run (overrides the rule file)
        #[arg(long)]
        fail_on: Option<SeverityArg>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// Initialize a rule file
    Init {
        /// Overwrite existing rule file
        #[arg(long)]
        force: bool,
    },
}

/// Output format for validation results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Findings with source context, then a summary.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-finding compact format.
    Compact,
    /// Graphical diagnostics.
    Fancy,
}

/// Severity threshold as accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SeverityArg {
    /// Fail on errors only.
    Error,
    /// Fail on warnings and errors.
    Warn,
    /// Fail on any finding.
    Info,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Error => Self::Error,
            SeverityArg::Warn => Self::Warn,
            SeverityArg::Info => Self::Info,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check {
            inputs,
            format,
            context,
            fail_on,
            exclude,
        } => {
            let source = config_resolver::resolve(Path::new("."), cli.config.as_deref());
            let options = commands::check::CheckOptions {
                inputs,
                format,
                context,
                fail_on: fail_on.map(Severity::from),
                exclude,
            };
            let failed = commands::check::run(&options, &source)?;
            if failed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Init { force } => commands::init::run(Path::new("."), force),
    }
}
