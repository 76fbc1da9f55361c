//! Input discovery across candidate roots

use super::traits::{StorageError, StorageResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Extra input root searched after the configured ones
pub const DATA_ROOT_ENV: &str = "ATTACK_GRAPH_DATA_ROOT";

/// Roots searched for relative inputs: the configured root, the working
/// directory and its parent, then `ATTACK_GRAPH_DATA_ROOT` if set
pub fn search_roots(configured: Option<&Path>) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(root) = configured {
        roots.push(root.to_path_buf());
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            let parent = parent.to_path_buf();
            roots.push(cwd);
            roots.push(parent);
        } else {
            roots.push(cwd);
        }
    }
    if let Some(root) = env_data_root() {
        roots.push(root);
    }
    roots
}

fn env_data_root() -> Option<PathBuf> {
    std::env::var(DATA_ROOT_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Candidate locations for `relative` under each root, plus the bare file
/// name under each root. Absolute paths are their own only candidate.
pub fn input_candidates(relative: &Path, roots: &[PathBuf]) -> Vec<PathBuf> {
    if relative.is_absolute() {
        return vec![relative.to_path_buf()];
    }
    let mut out: Vec<PathBuf> = roots.iter().map(|r| r.join(relative)).collect();
    if let Some(name) = relative.file_name() {
        if Path::new(name) != relative {
            out.extend(roots.iter().map(|r| r.join(name)));
        }
    }
    out
}

/// First candidate that exists; otherwise `MissingInput` listing every
/// distinct path tried, in order
pub fn resolve_first_existing<I, P>(candidates: I) -> StorageResult<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut attempted = Vec::new();
    let mut seen = HashSet::new();
    for candidate in candidates {
        let path = candidate.as_ref().to_path_buf();
        if !seen.insert(path.clone()) {
            continue;
        }
        if path.exists() {
            tracing::debug!(path = %path.display(), "resolved input");
            return Ok(path);
        }
        attempted.push(path);
    }
    Err(StorageError::MissingInput { attempted })
}

/// Resolve a configured input path against the search roots
pub fn resolve_input(path: &Path, roots: &[PathBuf]) -> StorageResult<PathBuf> {
    resolve_first_existing(input_candidates(path, roots))
}
