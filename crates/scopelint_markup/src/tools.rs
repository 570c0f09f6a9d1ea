//! External tool lookup and execution.

use std::ffi::OsStr;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, warn};

use crate::MarkupError;

/// Resolves executable names against a search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResolver {
    search_paths: Vec<PathBuf>,
}

impl ToolResolver {
    /// Creates a resolver over an explicit list of directories.
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Creates a resolver over the directories in `PATH`.
    pub fn from_env() -> Self {
        let search_paths = std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).collect())
            .unwrap_or_default();
        Self { search_paths }
    }

    /// Returns the directories searched by this resolver.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Returns the first candidate found on the search path.
    ///
    /// Candidates are tried in order; for each candidate every directory is
    /// checked before moving on to the next name.
    pub fn which(&self, candidates: &[&str]) -> Option<PathBuf> {
        candidates.iter().find_map(|name| {
            self.search_paths
                .iter()
                .map(|dir| dir.join(name))
                .find(|path| is_executable(path))
        })
    }
}

impl Default for ToolResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Runs `program` to completion and returns its standard output.
///
/// When `input` is given it is written to the child's standard input from a
/// helper thread while the output is collected, so large documents cannot
/// deadlock on a full pipe. A spawn failure or a nonzero exit status is
/// reported as [`MarkupError::ConversionFailed`] carrying the child's
/// standard error (or its exit status when standard error is empty).
pub fn run_piped<I, S>(
    tool: &str,
    program: &Path,
    args: I,
    input: Option<&str>,
) -> Result<Vec<u8>, MarkupError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    debug!("Running {} from {}", tool, program.display());

    let mut child = Command::new(program)
        .args(args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| MarkupError::conversion_failed(tool, e.to_string()))?;

    let writer = match (input, child.stdin.take()) {
        (Some(text), Some(mut stdin)) => {
            let bytes = text.as_bytes().to_vec();
            Some(thread::spawn(move || stdin.write_all(&bytes)))
        }
        _ => None,
    };

    let output = child
        .wait_with_output()
        .map_err(|e| MarkupError::conversion_failed(tool, e.to_string()))?;

    if let Some(handle) = writer
        && let Ok(Err(e)) = handle.join()
        && e.kind() != ErrorKind::BrokenPipe
    {
        warn!("Failed to write input to {}: {}", tool, e);
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            output.status.to_string()
        } else {
            stderr
        };
        return Err(MarkupError::conversion_failed(tool, message));
    }

    Ok(output.stdout)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Writes an executable shell script named `name` into `dir`.
    #[cfg(unix)]
    pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}
