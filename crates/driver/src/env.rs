// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves the same per-module socket path `uprocd-daemon::env` binds,
//! so the driver connects to whatever a given module's daemon actually
//! bound. Kept as its own small copy rather than a shared dependency —
//! same shape as `uprocd-cgrmvd::env` duplicating `uprocd-daemon::env`'s
//! path tunables rather than factoring out a third crate for three
//! lines of logic.

use std::path::{Path, PathBuf};

use uprocd_core::ModuleName;

use crate::error::DriverError;

pub fn state_dir() -> Result<PathBuf, DriverError> {
    if let Ok(dir) = std::env::var("UPROCD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        return Ok(PathBuf::from(dir).join("uprocd"));
    }
    let home = dirs::home_dir().ok_or(DriverError::NoStateDir)?;
    Ok(home.join(".local/state/uprocd"))
}

pub fn socket_path(dir: &Path, module: &ModuleName) -> PathBuf {
    dir.join(format!("{}.sock", module.as_str()))
}
