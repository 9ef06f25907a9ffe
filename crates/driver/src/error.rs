// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors the client driver can raise. Every variant here ends a
//! pre-exec invocation with exit code 1 and a `uprocctl: …` message on
//! stderr (`spec.md` §6's exit-code table); once a worker exists, its
//! own exit code or terminating signal takes over and this type is no
//! longer involved.

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("don't know how to run as '{0}': expected 'uprocctl', 'u', or a 'u<module>' symlink")]
    UnknownInvocation(String),

    #[error("invalid module name: {0}")]
    InvalidModuleName(#[from] uprocd_core::module::InvalidModuleName),

    #[error("no state directory available (no $XDG_RUNTIME_DIR, no $HOME)")]
    NoStateDir,

    #[error("Failed to locate {module}'s D-Bus service. Is the uprocd@{module} unit running?")]
    ServiceUnreachable { module: String, #[source] source: std::io::Error },

    #[error("{0}")]
    Remote(String),

    #[error("daemon sent an unexpected reply: {0}")]
    UnexpectedResponse(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] uprocd_protocol::ProtocolError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("system call failed: {0}")]
    Errno(#[from] nix::Error),
}
