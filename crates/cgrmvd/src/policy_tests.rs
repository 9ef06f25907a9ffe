// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn missing_directory_starts_empty_instead_of_failing() {
    let store = PolicyStore::load(PathBuf::from("/nonexistent/cgrmvd/policies"));
    let err = store.verify(1, 2).unwrap_err();
    assert!(err.contains("no policy permits") || err.contains("resolving"));
}

#[test]
fn reload_picks_up_a_newly_written_policy() {
    let dir = tempfile::tempdir().unwrap();
    let store = PolicyStore::load(dir.path().to_path_buf());

    let self_exe = crate::exe::resolve_exe_path(std::process::id() as i32).unwrap();
    std::fs::write(dir.path().join("test.policy"), format!("{self_exe} : {self_exe}\n")).unwrap();
    store.reload();

    let pid = std::process::id() as i32;
    assert!(store.verify(pid, pid).is_ok());
}
