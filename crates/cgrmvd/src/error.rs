// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors `cgrmvd` can raise. As in `uprocd-daemon`, structural errors
//! here unwind to `main`; a [`CgrmvdError::PolicyDenied`] instead
//! becomes a `Response::Error` reply and the request loop continues.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CgrmvdError {
    #[error("another cgrmvd instance is already running")]
    LockFailed(#[source] std::io::Error),

    #[error("failed to bind socket at {path}: {source}")]
    BindFailed { path: PathBuf, source: std::io::Error },

    #[error("policy error: {0}")]
    Config(#[from] uprocd_core::ConfigError),

    #[error("protocol error: {0}")]
    Protocol(#[from] uprocd_protocol::ProtocolError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("system call failed: {0}")]
    Errno(#[from] nix::Error),

    #[error("policy denied: {0}")]
    PolicyDenied(String),
}
