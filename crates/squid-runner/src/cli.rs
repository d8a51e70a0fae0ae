//! CLI argument definitions for the Squid supervisor.
//!
//! This module defines the command-line interface structure used by both the
//! runtime parser and the build script for manpage generation.

use clap::{Parser, ValueEnum};

/// Output format selection for lifecycle verdicts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Banner, progress dots and a coloured verdict.
    #[default]
    Human,
    /// A single JSON report per invocation.
    Json,
}

/// Command-line interface for the Squid supervisor.
#[derive(Parser, Debug)]
#[command(
    name = "squid-runner",
    version,
    about = "Start, stop and query one Squid proxy instance",
    after_long_help = CONFIGURATION_HELP
)]
pub(crate) struct Cli {
    /// Controls how the verdict is rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub(crate) output: OutputFormat,
    /// Instance name; only the final path component is used.
    #[arg(value_name = "INSTANCE")]
    pub(crate) instance: String,
    /// Lifecycle command: start, stop or status (case-insensitive).
    #[arg(value_name = "COMMAND")]
    pub(crate) command: String,
}

const CONFIGURATION_HELP: &str = "\
Configuration flags must precede --output and the positional arguments:
  --component <NAME>          supervised component (default: squid)
  --config-dir <DIR>          directory holding <INSTANCE>.conf (default: /etc/<component>)
  --run-dir <DIR>             directory holding <INSTANCE>.pid (default: /var/run)
  --proc-dir <DIR>            process status root (default: /proc)
  --daemon-binary <PATH>      daemon control binary (default: the component name)
  --timeout-seconds <N>       polling budget for start and stop (default: 120)
  --stat-errors <POLICY>      fail-open or fail-closed (default: fail-open)
  --log-filter <FILTER>       tracing filter for diagnostics (default: warn)
  --log-format <FORMAT>       compact or json (default: compact)

Each flag may also be set through a SQUID_RUNNER_* environment variable.";
