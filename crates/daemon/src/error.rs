// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors the module daemon can raise. Structural errors (this crate's
//! `Structural` variants) unwind to `main` and exit the process
//! non-zero; everything else is reported back to a caller over the
//! wire and the request loop continues (see `spec.md` §7).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("expected to be launched as 'uprocd <module>', got argv {0:?}")]
    UnexpectedArgv(Vec<String>),

    #[error("could not determine a state directory (no $XDG_RUNTIME_DIR, no $HOME)")]
    NoStateDir,

    #[error("another daemon instance for this module is already running")]
    LockFailed(#[source] std::io::Error),

    #[error("failed to bind socket at {path}: {source}")]
    BindFailed { path: PathBuf, source: std::io::Error },

    #[error("module config error: {0}")]
    Config(#[from] uprocd_core::ConfigError),

    #[error("no config file found for module '{0}' on the search path")]
    ModuleNotFound(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] uprocd_protocol::ProtocolError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("system call failed: {0}")]
    Errno(#[from] nix::Error),

    #[error("cgrmvd refused to move this worker's cgroups: {0}")]
    CgroupMoveDenied(String),

    #[error("cgrmvd sent an unexpected reply: {0}")]
    UnexpectedCgrmvdResponse(String),
}
