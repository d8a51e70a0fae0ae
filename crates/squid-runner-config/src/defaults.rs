use camino::Utf8PathBuf;

use crate::logging::LogFormat;
use crate::policy::StatErrorPolicy;

/// Component supervised when no override is supplied.
pub const DEFAULT_COMPONENT: &str = "squid";

/// Directory under which the daemon writes `<instance>.pid`.
pub const DEFAULT_RUN_DIR: &str = "/var/run";

/// Kernel-exposed per-process directory.
pub const DEFAULT_PROC_DIR: &str = "/proc";

/// Number of one-second polling ticks a wait may consume.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Owned component name used where allocation is required (e.g. serde).
pub fn default_component_string() -> String {
    DEFAULT_COMPONENT.to_owned()
}

/// Default runtime directory holding PID files.
pub fn default_run_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_RUN_DIR)
}

/// Default process status root.
pub fn default_proc_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_PROC_DIR)
}

/// Default timeout budget, in ticks.
pub const fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

/// Default treatment of indeterminate stat failures.
pub const fn default_stat_errors() -> StatErrorPolicy {
    StatErrorPolicy::FailOpen
}

/// Default log filter expression used by the binary.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
