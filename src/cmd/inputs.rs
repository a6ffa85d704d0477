//! Resolving the `import` argument into dump files.

use std::path::{Path, PathBuf};

/// Whether the argument should go through glob expansion.
pub fn has_glob_chars(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// Turn a literal path or a glob pattern into a sorted list of dump files.
///
/// A literal path must exist; a pattern must match at least one regular file.
pub fn resolve_inputs(arg: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = arg.to_string_lossy();

    if !has_glob_chars(&pattern) {
        if !arg.exists() {
            anyhow::bail!("input file does not exist: {}", arg.display());
        }
        return Ok(vec![arg.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)
        .map_err(|e| anyhow::anyhow!("invalid glob pattern '{}': {}", pattern, e))?
    {
        let path = entry
            .map_err(|e| anyhow::anyhow!("error reading path for pattern '{}': {}", pattern, e))?;
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        anyhow::bail!("no files match pattern: {}", pattern);
    }
    files.sort();
    Ok(files)
}

/// Outcome of importing several dumps in one invocation.
#[derive(Debug, Default)]
pub struct BatchRunTally {
    pub succeeded: usize,
    pub rows_imported: u64,
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchRunTally {
    pub fn record_success(&mut self, rows: u64) {
        self.succeeded += 1;
        self.rows_imported += rows;
    }

    pub fn record_failure(&mut self, path: PathBuf, error: String) {
        self.failures.push((path, error));
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}
