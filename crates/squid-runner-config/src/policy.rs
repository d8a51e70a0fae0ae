//! Policy applied when a stat call fails for a reason other than "not found".

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the filesystem probe answers when it cannot tell whether a path exists.
///
/// Permission errors and I/O failures leave the question open. The
/// historical behaviour reports such paths as present, so a permission
/// problem is never mistaken for a stopped daemon.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum StatErrorPolicy {
    /// Treat indeterminate stat failures as "the path exists".
    #[default]
    FailOpen,
    /// Treat indeterminate stat failures as "the path is missing".
    FailClosed,
}

impl StatErrorPolicy {
    /// Answer reported for a path whose stat failed with an indeterminate error.
    #[must_use]
    pub const fn assumes_presence(self) -> bool {
        matches!(self, Self::FailOpen)
    }
}

/// Errors encountered while parsing a [`StatErrorPolicy`] from text.
pub type StatErrorPolicyParseError = strum::ParseError;
