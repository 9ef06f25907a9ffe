// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon's `SIGCHLD` reaper. Mirrors `main.c`'s `clear_child`
//! handler: a non-blocking `waitpid(-1, ...)` loop so forked workers
//! never linger as zombies once they exit, without the daemon blocking
//! on any particular child.

use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::error::DaemonError;

/// Installs the reaper. Must run before the daemon starts forking
/// workers; harmless to call more than once.
pub fn install_sigchld_reaper() -> Result<(), DaemonError> {
    // SAFETY: `reap_children` only calls `waitpid`, which is safe to
    // call from a signal handler.
    unsafe {
        signal::signal(Signal::SIGCHLD, SigHandler::Handler(reap_children))?;
    }
    Ok(())
}

/// Restores `SIGINT` and `SIGCHLD` to their default dispositions. Run
/// in a forked worker before its payload starts: the daemon's reaper
/// and its `SIGINT`-as-shutdown-trigger handling (if any) are daemon
/// concerns the worker shouldn't inherit.
pub fn restore_default_dispositions() {
    // SAFETY: runs once in a freshly forked, single-threaded child.
    unsafe {
        let _ = signal::signal(Signal::SIGINT, SigHandler::SigDfl);
        let _ = signal::signal(Signal::SIGCHLD, SigHandler::SigDfl);
    }
}

extern "C" fn reap_children(_: libc::c_int) {
    loop {
        match wait::waitpid(Some(Pid::from_raw(-1)), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) | Err(_) => break,
            Ok(_) => continue,
        }
    }
}
