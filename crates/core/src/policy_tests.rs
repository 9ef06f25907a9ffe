// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn entry(copier: &str, origins: &[&str]) -> PolicyEntry {
    PolicyEntry {
        copier_exe_path: copier.to_string(),
        origin_exe_paths: origins.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn allows_listed_origin_only() {
    let mut table = PolicyTable::new();
    table.insert(entry("/usr/bin/tmux", &["/usr/bin/bash", "/usr/bin/zsh"]));

    assert!(table.allows("/usr/bin/tmux", "/usr/bin/bash"));
    assert!(!table.allows("/usr/bin/tmux", "/usr/bin/fish"));
    assert!(!table.allows("/usr/bin/screen", "/usr/bin/bash"));
}

#[test]
fn duplicate_copier_replaces_and_returns_previous() {
    let mut table = PolicyTable::new();
    assert!(table.insert(entry("/usr/bin/tmux", &["/usr/bin/bash"])).is_none());

    let previous = table.insert(entry("/usr/bin/tmux", &["/usr/bin/zsh"]));
    assert_eq!(previous, Some(entry("/usr/bin/tmux", &["/usr/bin/bash"])));
    assert!(table.allows("/usr/bin/tmux", "/usr/bin/zsh"));
    assert!(!table.allows("/usr/bin/tmux", "/usr/bin/bash"));
    assert_eq!(table.len(), 1);
}
