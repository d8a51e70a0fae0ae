//! CLI entrypoint for the Squid supervisor.
//!
//! The binary delegates to [`squid_runner::run`], which loads configuration,
//! parses the instance and command, drives the lifecycle controller and
//! renders the verdict.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    squid_runner::run(std::env::args_os(), &mut stdout, &mut stderr)
}
