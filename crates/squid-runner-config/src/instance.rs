//! Instance identifiers derived from operator input.

use std::fmt;
use std::str::FromStr;

use camino::Utf8Path;
use thiserror::Error;

/// Sanitised name of one daemon configuration/runtime pairing.
///
/// Only the final path component of the operator's input survives, so
/// `/etc/squid/edge` and `edge` both address the `edge` instance and no
/// derived path can escape its directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceName(String);

impl InstanceName {
    /// Sanitises raw operator input into an instance name.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceNameError::NoFinalComponent`] when the input has no
    /// final path component (for example `""`, `/` or `..`).
    pub fn sanitise(raw: &str) -> Result<Self, InstanceNameError> {
        Utf8Path::new(raw)
            .file_name()
            .filter(|name| !name.is_empty())
            .map(|name| Self(name.to_owned()))
            .ok_or_else(|| InstanceNameError::NoFinalComponent {
                raw: raw.to_owned(),
            })
    }

    /// Borrowed view of the sanitised name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for InstanceName {
    type Err = InstanceNameError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::sanitise(raw)
    }
}

impl AsRef<str> for InstanceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Errors raised while sanitising an instance name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceNameError {
    /// The input did not end in a usable path component.
    #[error("instance name '{raw}' has no final path component")]
    NoFinalComponent {
        /// Input as supplied by the operator.
        raw: String,
    },
}
