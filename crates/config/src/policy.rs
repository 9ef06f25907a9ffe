// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The cgroup-move policy file parser: `copier_path : origin_path
//! [origin_path ...]`, `#` comments, `.policy` extension required.

use std::path::Path;

use uprocd_core::{ConfigError, PolicyEntry, PolicyTable};

pub fn parse_policy_file(path: &Path) -> Result<Vec<PolicyEntry>, ConfigError> {
    let path_str = path.display().to_string();
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io { path: path_str.clone(), source: std::sync::Arc::new(e) })?;

    let mut entries = Vec::new();
    for (idx, raw) in text.split('\n').enumerate() {
        let line = raw.trim_matches(|c| c == '\t' || c == ' ');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((copier, origins)) = line.split_once(" : ") else {
            return Err(ConfigError::MissingEquals { path: path_str.clone(), line: idx + 1 });
        };

        let origin_exe_paths: Vec<String> = origins.split_whitespace().map(str::to_string).collect();
        entries.push(PolicyEntry { copier_exe_path: copier.to_string(), origin_exe_paths });
    }

    Ok(entries)
}

/// Loads every `*.policy` file in `dir` into a single table. A copier
/// path repeated across files (or within one file) keeps only the last
/// entry seen; each replacement is logged as a warning, matching the
/// original loader's behavior on a duplicate copier key.
pub fn load_policy_dir(dir: &Path) -> Result<PolicyTable, ConfigError> {
    let mut table = PolicyTable::new();

    let read_dir = std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
        path: dir.display().to_string(),
        source: std::sync::Arc::new(e),
    })?;

    let mut paths: Vec<_> = read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "policy"))
        .collect();
    paths.sort();

    for path in paths {
        for entry in parse_policy_file(&path)? {
            let copier = entry.copier_exe_path.clone();
            if table.insert(entry).is_some() {
                tracing::warn!(copier = %copier, "policy has multiple origin values for copier");
            }
        }
    }

    Ok(table)
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
