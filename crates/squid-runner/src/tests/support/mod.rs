//! Shared helpers for CLI and lifecycle unit tests.

mod lifecycle;

use std::ffi::OsString;

use squid_runner_config::Config;

use crate::{AppError, ConfigLoader};

pub(crate) use lifecycle::{
    FakeClock, FakeRoots, LifecycleCall, ScriptedProbe, TestLifecycle, fake_roots, instance,
};

/// Loader that ignores the command line and returns a fixed configuration.
pub(crate) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(crate) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Builds an argument vector with the binary name prepended.
pub(crate) fn build_args(tokens: &[&str]) -> Vec<OsString> {
    std::iter::once("squid-runner")
        .chain(tokens.iter().copied())
        .map(OsString::from)
        .collect()
}

/// Decodes captured output as UTF-8.
pub(crate) fn text(buffer: &[u8]) -> String {
    String::from_utf8(buffer.to_vec()).expect("utf8 output")
}
