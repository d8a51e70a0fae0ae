//! Filesystem existence checks.
//!
//! Every liveness decision reduces to "does this path exist?". The probe is a
//! trait so the poller and controller can be driven by scripted timelines in
//! tests while production uses real stat calls.

use std::fs;
use std::io;
use std::path::Path;

use squid_runner_config::StatErrorPolicy;
use tracing::debug;

use super::LIFECYCLE_TARGET;

/// Answers whether a path currently exists.
pub trait FilesystemProbe {
    fn exists(&self, path: &Path) -> bool;
}

impl<P: FilesystemProbe + ?Sized> FilesystemProbe for &P {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}

/// Probe backed by `stat(2)`, following symlinks.
///
/// Only "not found" means absent. Any other stat failure is answered
/// according to the configured [`StatErrorPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe {
    policy: StatErrorPolicy,
}

impl SystemProbe {
    #[must_use]
    pub const fn new(policy: StatErrorPolicy) -> Self {
        Self { policy }
    }
}

impl FilesystemProbe for SystemProbe {
    fn exists(&self, path: &Path) -> bool {
        if path.as_os_str().is_empty() {
            return false;
        }
        match fs::metadata(path) {
            Ok(_) => true,
            Err(error) if error.kind() == io::ErrorKind::NotFound => false,
            Err(error) => {
                let assumed = self.policy.assumes_presence();
                debug!(
                    target: LIFECYCLE_TARGET,
                    path = %path.display(),
                    %error,
                    assumed,
                    policy = %self.policy,
                    "indeterminate stat failure"
                );
                assumed
            }
        }
    }
}
