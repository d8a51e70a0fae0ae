//! Command-line runtime for the Squid supervisor.
//!
//! The module owns argument parsing, configuration bootstrapping, dispatch to
//! the lifecycle controller and rendering of the verdict. The interface is
//! designed to be exercised both from the binary entrypoint and from tests
//! where configuration loading, the lifecycle handler and IO streams can be
//! substituted.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use squid_runner_config::{Config, InstanceName};

mod cli;
mod config;
mod errors;
pub mod lifecycle;
mod output;
pub mod telemetry;

use cli::{Cli, OutputFormat};
use config::{ConfigArgumentSplit, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;
use lifecycle::{
    LifecycleCommand, LifecycleContext, LifecycleError, LifecycleInvocation, LifecycleOutcome,
    LifecycleOutput, SystemLifecycle,
};
use output::{CommandReport, Verdict, write_header, write_report, write_verdict};

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: This list must be kept in sync with the fields of
/// `squid_runner_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--component",
    "--config-dir",
    "--run-dir",
    "--proc-dir",
    "--daemon-binary",
    "--timeout-seconds",
    "--stat-errors",
    "--log-filter",
    "--log-format",
];

/// Bundles the IO streams provided to the CLI runtime.
///
/// Lifecycle commands receive a short-lived [`LifecycleOutput`] wrapper that
/// borrows these streams for progress ticks and diagnostics.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut lifecycle = SystemLifecycle;
        self.run_with_handler(args, |invocation, context, output| {
            lifecycle.handle(invocation, context, output)
        })
    }

    fn run_with_handler<I, F>(&mut self, args: I, mut handler: F) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
        F: FnMut(
            LifecycleInvocation,
            LifecycleContext<'_>,
            &mut LifecycleOutput<&mut W, &mut E>,
        ) -> Result<LifecycleOutcome, LifecycleError>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli_arguments = prepare_cli_arguments(&args, &split);

        let result = Cli::try_parse_from(cli_arguments)
            .map_err(AppError::CliUsage)
            .and_then(|cli| {
                self.loader
                    .load(&split.config_arguments)
                    .map(|config| (cli, config))
            })
            .and_then(|(cli, config)| {
                telemetry::initialise(&config)?;
                let invocation = resolve_invocation(&cli)?;
                self.dispatch(invocation, &config, cli.output, &mut handler)
            });

        match result {
            Ok(exit_code) => exit_code,
            Err(AppError::CliUsage(error)) if !error.use_stderr() => {
                let _ = write!(self.io.stdout, "{error}");
                ExitCode::SUCCESS
            }
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }

    fn dispatch<F>(
        &mut self,
        invocation: LifecycleInvocation,
        config: &Config,
        format: OutputFormat,
        handler: &mut F,
    ) -> Result<ExitCode, AppError>
    where
        F: FnMut(
            LifecycleInvocation,
            LifecycleContext<'_>,
            &mut LifecycleOutput<&mut W, &mut E>,
        ) -> Result<LifecycleOutcome, LifecycleError>,
    {
        let command = invocation.command;
        let instance = invocation.instance.clone();
        if format == OutputFormat::Human {
            write_header(&mut *self.io.stdout, command, &instance).map_err(AppError::EmitOutput)?;
        }

        let result = {
            let mut output = LifecycleOutput::new(&mut *self.io.stdout, &mut *self.io.stderr);
            if format == OutputFormat::Json {
                output = output.without_progress();
            }
            handler(invocation, LifecycleContext { config }, &mut output)
        };

        match format {
            OutputFormat::Human => write_verdict(&mut *self.io.stdout, Verdict::from_result(&result))
                .map_err(AppError::EmitOutput)?,
            OutputFormat::Json => write_report(
                &mut *self.io.stdout,
                &CommandReport::new(&instance, command, &result),
            )?,
        }

        match result {
            Ok(_) => Ok(ExitCode::SUCCESS),
            Err(error) => {
                writeln!(self.io.stderr, "{error}").map_err(AppError::EmitOutput)?;
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

/// Runs the CLI with a custom configuration loader and lifecycle handler.
#[cfg(test)]
pub(crate) fn run_with_handler<'a, I, W, E, L, F>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
    handler: F,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
    F: FnMut(
        LifecycleInvocation,
        LifecycleContext<'_>,
        &mut LifecycleOutput<&mut W, &mut E>,
    ) -> Result<LifecycleOutcome, LifecycleError>,
{
    CliRunner::new(io, loader).run_with_handler(args, handler)
}

fn prepare_cli_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    let mut cli_arguments: Vec<OsString> = Vec::new();
    if let Some(first) = args.first() {
        cli_arguments.push(first.clone());
    }
    if let Some(rest) = args.get(split.command_start..) {
        cli_arguments.extend(rest.iter().cloned());
    }
    cli_arguments
}

/// Validates the command before the instance so an unknown command is
/// reported even when the instance name is unusable.
fn resolve_invocation(cli: &Cli) -> Result<LifecycleInvocation, AppError> {
    let command = cli
        .command
        .parse::<LifecycleCommand>()
        .map_err(|_| AppError::UnsupportedCommand {
            command: cli.command.clone(),
        })?;
    let instance = InstanceName::sanitise(&cli.instance)?;
    Ok(LifecycleInvocation { command, instance })
}
