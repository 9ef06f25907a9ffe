// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon: state-
//! directory resolution plus the handful of tunables a process of this
//! kind needs.

use std::path::{Path, PathBuf};

use uprocd_core::ModuleName;

use crate::error::DaemonError;

/// Resolve the directory a module daemon keeps its socket, lock file,
/// and log under: `UPROCD_STATE_DIR` > `$XDG_RUNTIME_DIR/uprocd` >
/// `~/.local/state/uprocd`.
pub fn state_dir() -> Result<PathBuf, DaemonError> {
    if let Ok(dir) = std::env::var("UPROCD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        return Ok(PathBuf::from(dir).join("uprocd"));
    }
    let home = dirs::home_dir().ok_or(DaemonError::NoStateDir)?;
    Ok(home.join(".local/state/uprocd"))
}

pub fn socket_path(dir: &Path, module: &ModuleName) -> PathBuf {
    dir.join(format!("{}.sock", module.as_str()))
}

pub fn lock_path(dir: &Path, module: &ModuleName) -> PathBuf {
    dir.join(format!("{}.pid", module.as_str()))
}

pub fn log_path(dir: &Path, module: &ModuleName) -> PathBuf {
    dir.join(format!("{}.log", module.as_str()))
}

/// Unix socket the cgroup-move helper listens on.
pub fn cgrmvd_socket_path() -> PathBuf {
    std::env::var("UPROCD_CGRMVD_SOCKET").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("/run/cgrmvd.sock"))
}
