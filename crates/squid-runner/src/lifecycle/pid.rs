//! PID file reading.

use std::fs;
use std::io;
use std::path::Path;

use super::error::LifecycleError;

/// Reads the PID recorded on the first line of `path`.
///
/// # Returns
///
/// * `Ok(Some(pid))` - the first line holds a decimal PID.
/// * `Ok(None)` - the file does not exist or its first line is blank.
/// * `Err(ReadPid)` - the file exists but could not be read.
/// * `Err(ParsePid)` - the first line is not a decimal PID.
pub(super) fn read_pid(path: &Path) -> Result<Option<u32>, LifecycleError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(LifecycleError::ReadPid {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let first_line = content.lines().next().unwrap_or_default().trim();
    if first_line.is_empty() {
        return Ok(None);
    }
    first_line
        .parse::<u32>()
        .map(Some)
        .map_err(|source| LifecycleError::ParsePid {
            path: path.to_path_buf(),
            source,
        })
}
