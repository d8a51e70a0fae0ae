//! Derives the filesystem artefacts that describe one daemon instance.
//!
//! The configuration file is read-only input, the PID file belongs to the
//! daemon, and the process status entry belongs to the kernel. This crate
//! only names them; nothing here creates or removes files.

use camino::{Utf8Path, Utf8PathBuf};

use crate::{Config, InstanceName};

/// Canonical paths for one supervised instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstancePaths {
    config_path: Utf8PathBuf,
    pid_path: Utf8PathBuf,
    proc_dir: Utf8PathBuf,
}

impl InstancePaths {
    /// Derives instance paths from the shared configuration.
    #[must_use]
    pub fn derive(config: &Config, instance: &InstanceName) -> Self {
        Self {
            config_path: config.config_dir().join(format!("{instance}.conf")),
            pid_path: config.run_dir().join(format!("{instance}.pid")),
            proc_dir: config.proc_dir().to_owned(),
        }
    }

    /// Daemon configuration file for the instance.
    #[must_use]
    pub fn config_path(&self) -> &Utf8Path {
        self.config_path.as_path()
    }

    /// PID file written by the daemon while it runs.
    #[must_use]
    pub fn pid_path(&self) -> &Utf8Path {
        self.pid_path.as_path()
    }

    /// Kernel status entry that exists only while `pid` is alive.
    #[must_use]
    pub fn process_status_path(&self, pid: u32) -> Utf8PathBuf {
        self.proc_dir.join(pid.to_string()).join("status")
    }
}
