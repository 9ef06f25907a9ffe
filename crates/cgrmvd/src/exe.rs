// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves the executable a pid is running, following `/proc/<pid>/exe`
//! (and, in the unusual case that target is itself a symlink, following
//! that too) the way `readlink_bus` does in
//! `examples/original_source/src/cgrmvd/cgrmvd.c`.

use crate::error::CgrmvdError;

pub fn resolve_exe_path(pid: i32) -> Result<String, CgrmvdError> {
    let mut path = format!("/proc/{pid}/exe");
    loop {
        let target = std::fs::read_link(&path)?;
        let target = target.to_string_lossy().into_owned();

        match std::fs::symlink_metadata(&target) {
            Ok(meta) if meta.file_type().is_symlink() => {
                path = target;
            }
            _ => return Ok(target),
        }
    }
}

#[cfg(test)]
#[path = "exe_tests.rs"]
mod tests;
