//! Shared path manipulation utilities: input resolution and report discovery.

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::core::errors::{CrcError, Result};

/// Expand the given inputs into the ordered list of report files to convert.
///
/// Files are kept as given, in order. A directory expands to the `*.json`
/// files directly inside it, sorted lexically so the resulting feature order
/// does not depend on directory iteration order.
pub fn expand_report_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut reports = Vec::with_capacity(inputs.len());
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            let entries = fs::read_dir(input).map_err(|source| CrcError::io(input, source))?;
            for entry in entries {
                let path = entry.map_err(|source| CrcError::io(input, source))?.path();
                if path.is_file() && is_json_file(&path) {
                    found.push(path);
                }
            }
            found.sort();
            reports.extend(found);
        } else {
            reports.push(input.clone());
        }
    }
    Ok(reports)
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Resolve a path to an absolute, normalized path.
///
/// If `fs::canonicalize` succeeds (path exists), it is used to resolve symlinks
/// and normalize components.
///
/// If it fails (e.g. path does not exist), the path is made absolute relative
/// to CWD and `..`/`.` components are resolved syntactically.
pub fn resolve_absolute_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };

    // Try filesystem resolution first (handles symlinks).
    if let Ok(canonical) = std::fs::canonicalize(&absolute) {
        return canonical;
    }

    // Fallback: syntactic normalization.
    normalize_syntactic(&absolute)
}

fn normalize_syntactic(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir | Component::Normal(_) => {
                components.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                }
            }
        }
    }
    components.into_iter().collect()
}
