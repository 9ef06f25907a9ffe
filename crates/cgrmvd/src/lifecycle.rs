// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cgrmvd` startup: single-instance lock then socket bind, the same
//! ordering `uprocd-daemon::lifecycle` uses and for the same reason —
//! two racing launches must fail at the lock, never both believe they
//! bound the socket.

use std::fs::File;
use std::io::Write;
use std::os::unix::net::UnixListener;
use std::path::PathBuf;

use fs2::FileExt;

use crate::error::CgrmvdError;

pub struct Bound {
    #[allow(dead_code)]
    lock_file: File,
    pub listener: UnixListener,
}

pub fn startup(socket_path: &PathBuf, lock_path: &PathBuf) -> Result<Bound, CgrmvdError> {
    if let Some(parent) = socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let lock_file = File::options().write(true).create(true).truncate(false).open(lock_path)?;
    lock_file.try_lock_exclusive().map_err(CgrmvdError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    if socket_path.exists() {
        std::fs::remove_file(socket_path)?;
    }
    let listener = UnixListener::bind(socket_path)
        .map_err(|e| CgrmvdError::BindFailed { path: socket_path.clone(), source: e })?;

    Ok(Bound { lock_file, listener })
}

pub fn init_logging() -> Result<(), CgrmvdError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
    Ok(())
}
