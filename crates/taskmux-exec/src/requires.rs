//! Task requirement checks

use std::path::Path;

use globset::{Glob, GlobMatcher};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::ExecError;

/// Verify that every glob in `patterns` matches at least one file under `root`.
///
/// Patterns are matched against paths relative to `root`. Only regular files
/// satisfy a pattern; a directory with a matching name does not.
pub fn check_requirements(root: &Path, patterns: &[String]) -> Result<(), ExecError> {
    if patterns.is_empty() {
        return Ok(());
    }

    let matchers: Vec<GlobMatcher> = patterns
        .iter()
        .map(|pattern| {
            Glob::new(pattern)
                .map(|glob| glob.compile_matcher())
                .map_err(|source| ExecError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
        })
        .collect::<Result<_, _>>()?;

    let mut met = vec![false; matchers.len()];
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        for (i, matcher) in matchers.iter().enumerate() {
            if !met[i] && matcher.is_match(rel) {
                met[i] = true;
            }
        }
        if met.iter().all(|m| *m) {
            debug!(patterns = patterns.len(), "all requirements met");
            return Ok(());
        }
    }

    match met.iter().position(|m| !*m) {
        None => Ok(()),
        Some(i) => Err(ExecError::RequirementUnmet {
            pattern: patterns[i].clone(),
            root: root.to_path_buf(),
        }),
    }
}
