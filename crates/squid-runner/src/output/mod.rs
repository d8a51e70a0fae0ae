//! Rendering of lifecycle results.
//!
//! Human output is a banner written before the command runs, progress dots
//! written while it waits, and a coloured verdict afterwards. JSON output
//! replaces all of that with one report per invocation.

mod render;
mod report;

pub(crate) use render::{Verdict, write_header, write_verdict};
pub(crate) use report::{CommandReport, write_report};
