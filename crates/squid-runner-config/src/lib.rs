//! Shared configuration for the `squid-runner` supervisor.
//!
//! Every path and constant the supervisor relies on lives in [`Config`], so
//! the lifecycle controller can be pointed at fake filesystem roots in tests.
//! Values are layered by `ortho_config`: built-in defaults, then any
//! discovered configuration file, then `SQUID_RUNNER_*` environment
//! variables, then command-line flags.

mod defaults;
mod instance;
mod logging;
mod paths;
mod policy;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_COMPONENT, DEFAULT_LOG_FILTER, DEFAULT_PROC_DIR, DEFAULT_RUN_DIR,
    DEFAULT_TIMEOUT_SECONDS, default_component_string, default_log_filter,
    default_log_filter_string, default_log_format, default_proc_dir, default_run_dir,
    default_stat_errors, default_timeout_seconds,
};
pub use instance::{InstanceName, InstanceNameError};
pub use logging::{LogFormat, LogFormatParseError};
pub use paths::InstancePaths;
pub use policy::{StatErrorPolicy, StatErrorPolicyParseError};

/// Runtime configuration shared by every lifecycle command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "SQUID_RUNNER")]
pub struct Config {
    /// Supervised component; names the configuration directory and the
    /// default daemon binary.
    #[serde(default = "default_component_string")]
    #[ortho_config(default = default_component_string())]
    pub component: String,
    /// Directory holding `<instance>.conf`. Defaults to `/etc/<component>`.
    #[serde(default)]
    pub config_dir: Option<Utf8PathBuf>,
    /// Directory in which the daemon writes `<instance>.pid`.
    #[serde(default = "default_run_dir")]
    #[ortho_config(default = default_run_dir())]
    pub run_dir: Utf8PathBuf,
    /// Root of the per-process status entries.
    #[serde(default = "default_proc_dir")]
    #[ortho_config(default = default_proc_dir())]
    pub proc_dir: Utf8PathBuf,
    /// Daemon control binary. Defaults to the component name.
    #[serde(default)]
    pub daemon_binary: Option<String>,
    /// Number of one-second ticks a start or stop may wait.
    #[serde(default = "default_timeout_seconds")]
    #[ortho_config(default = default_timeout_seconds())]
    pub timeout_seconds: u64,
    /// Answer given when a stat fails for reasons other than "not found".
    #[serde(default = "default_stat_errors")]
    #[ortho_config(default = default_stat_errors())]
    pub stat_errors: StatErrorPolicy,
    /// Tracing filter expression for diagnostics on stderr.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Format of diagnostics on stderr.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            component: default_component_string(),
            config_dir: None,
            run_dir: default_run_dir(),
            proc_dir: default_proc_dir(),
            daemon_binary: None,
            timeout_seconds: default_timeout_seconds(),
            stat_errors: default_stat_errors(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Name of the supervised component.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Directory holding instance configuration files.
    #[must_use]
    pub fn config_dir(&self) -> Utf8PathBuf {
        self.config_dir
            .clone()
            .unwrap_or_else(|| Utf8Path::new("/etc").join(&self.component))
    }

    /// Directory holding daemon PID files.
    #[must_use]
    pub fn run_dir(&self) -> &Utf8Path {
        self.run_dir.as_path()
    }

    /// Root of the per-process status entries.
    #[must_use]
    pub fn proc_dir(&self) -> &Utf8Path {
        self.proc_dir.as_path()
    }

    /// Binary invoked to launch or shut down the daemon.
    #[must_use]
    pub fn daemon_binary(&self) -> &str {
        self.daemon_binary.as_deref().unwrap_or(&self.component)
    }

    /// Timeout budget, in one-second ticks.
    #[must_use]
    pub const fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    /// Policy applied to indeterminate stat failures.
    #[must_use]
    pub const fn stat_errors(&self) -> StatErrorPolicy {
        self.stat_errors
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Diagnostic log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
