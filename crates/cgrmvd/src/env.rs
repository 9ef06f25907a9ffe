// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cgrmvd`'s tunables. Unlike a module daemon, there is exactly one
//! instance of this process system-wide, so its paths are fixed rather
//! than derived from a module name — each still has an env override for
//! running it unprivileged in tests.

use std::path::PathBuf;

pub fn socket_path() -> PathBuf {
    std::env::var("UPROCD_CGRMVD_SOCKET").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("/run/cgrmvd.sock"))
}

pub fn lock_path() -> PathBuf {
    std::env::var("UPROCD_CGRMVD_LOCK").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("/run/cgrmvd.pid"))
}

pub fn policy_dir() -> PathBuf {
    std::env::var("UPROCD_CGRMVD_POLICY_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/usr/share/cgrmvd/policies"))
}
