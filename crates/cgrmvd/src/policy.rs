// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loads and re-loads the policy directory, and answers `verify_policy`
//! checks against the resolved executable paths of a `MoveCgroup`
//! call's two pids.

use std::path::PathBuf;
use std::sync::Mutex;

use uprocd_core::PolicyTable;

use crate::exe::resolve_exe_path;

/// The live policy table plus the directory it was loaded from, so a
/// `SIGHUP` can reload it in place. `reload_policies` in the original
/// rebuilds its table from scratch on every call rather than merging —
/// this does the same: a bad reload still replaces the old table
/// wholesale (logged, not silently ignored), matching the original's
/// "table_free then table_init" reset.
pub struct PolicyStore {
    dir: PathBuf,
    table: Mutex<PolicyTable>,
}

impl PolicyStore {
    /// Loads `dir` once at startup. An unreadable directory starts the
    /// store with an empty table and a logged warning rather than
    /// failing outright — a daemon with no valid policies yet still
    /// answers `Status`-equivalent calls and can pick up policies
    /// dropped in later, on the next `SIGHUP`.
    pub fn load(dir: PathBuf) -> Self {
        let table = uprocd_config::load_policy_dir(&dir).unwrap_or_else(|e| {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to load policy directory, starting with no policies");
            PolicyTable::new()
        });
        Self { dir, table: Mutex::new(table) }
    }

    pub fn reload(&self) {
        match uprocd_config::load_policy_dir(&self.dir) {
            Ok(table) => {
                let count = table.len();
                #[allow(clippy::unwrap_used)]
                {
                    *self.table.lock().unwrap() = table;
                }
                tracing::info!(count, "reloaded cgroup-move policies");
            }
            Err(e) => tracing::warn!(error = %e, "policy reload failed, keeping the previous table"),
        }
    }

    /// Resolves both pids' executables and checks the policy table,
    /// returning the reason for denial on failure.
    pub fn verify(&self, copier_pid: i32, origin_pid: i32) -> Result<(), String> {
        let copier_exe = resolve_exe_path(copier_pid).map_err(|e| format!("resolving copier's exe: {e}"))?;
        let origin_exe = resolve_exe_path(origin_pid).map_err(|e| format!("resolving origin's exe: {e}"))?;

        #[allow(clippy::unwrap_used)]
        let table = self.table.lock().unwrap();
        if table.allows(&copier_exe, &origin_exe) {
            Ok(())
        } else {
            Err(format!("no policy permits {copier_exe} to copy into a cgroup from {origin_exe}"))
        }
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
