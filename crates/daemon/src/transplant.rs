// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The resource transplant a forked worker performs before running its
//! payload (`spec.md` §4.3, `uprocd_context_enter` in
//! `examples/original_source/src/uprocd/api.c`). Every step here is
//! best-effort: a worker that can't claim a controlling tty or move
//! cgroups still runs the user's command, it just logs a warning and
//! carries on, matching the original's "never block the user's work on
//! bookkeeping" posture.

use std::ffi::CString;
use std::os::fd::RawFd;

use nix::unistd::{self, Pid};
use uprocd_core::RunContext;

use crate::cgrmvd_client;

/// Replaces the process's environment, working directory, and stdio,
/// moves it into the driver's cgroups, and claims a controlling
/// terminal. Called once in the forked child, before the worker's
/// payload runs.
pub fn context_enter(ctx: &RunContext) {
    replace_environment(ctx);
    change_directory(ctx);
    redirect_stdio(&ctx.request.stdio);

    let driver_pid = ctx.request.driver_pid as i32;
    if let Err(e) = cgrmvd_client::move_cgroup(std::process::id() as i32, driver_pid) {
        tracing::warn!(error = %e, "cgroup move failed, worker stays in the daemon's cgroup");
    }

    claim_controlling_terminal();
}

/// Clears the daemon's own environment and replaces it with the
/// request's, matching `uprocd_context_enter`'s unsetenv-all-then-setenv
/// ordering rather than layering the request on top of the daemon's.
fn replace_environment(ctx: &RunContext) {
    // SAFETY: this runs in a freshly forked, single-threaded child
    // before any other code touches the environment.
    unsafe {
        for (key, _) in std::env::vars() {
            std::env::remove_var(key);
        }
        for (key, value) in ctx.request.env() {
            std::env::set_var(key, value);
        }
    }
}

fn change_directory(ctx: &RunContext) {
    if let Err(e) = unistd::chdir(&ctx.request.cwd) {
        tracing::warn!(cwd = %ctx.request.cwd.display(), error = %e, "chdir failed, worker keeps the daemon's cwd");
    }
}

/// Points fds 0/1/2 at the three descriptors the driver passed, closing
/// whichever originals aren't already in place.
fn redirect_stdio(stdio: &[RawFd; 3]) {
    for (target, source) in stdio.iter().enumerate() {
        let target = target as RawFd;
        if *source == target {
            continue;
        }
        if let Err(e) = unistd::dup2(*source, target) {
            tracing::warn!(fd = target, error = %e, "failed to redirect stdio descriptor");
            continue;
        }
        let _ = unistd::close(*source);
    }
}

/// `setpgrp()` plus `ioctl(TIOCSCTTY)`: the worker becomes its own
/// process group leader and, if fd 0 is a tty, claims it as its
/// controlling terminal so job control (Ctrl-C, Ctrl-Z) reaches it the
/// way it would a directly-exec'd process.
fn claim_controlling_terminal() {
    if let Err(e) = unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0)) {
        tracing::warn!(error = %e, "setpgrp failed");
    }

    // SAFETY: fd 0 is a valid, owned descriptor at this point (either
    // the driver's pty or a redirected file/pipe); TIOCSCTTY is a
    // no-op error (ENOTTY) when it isn't a tty. The `1` argument
    // requests stealing the controlling terminal away from whatever
    // session already holds it (`spec.md` §4.3 step 5).
    let rc = unsafe { libc::ioctl(0, libc::TIOCSCTTY as _, 1) };
    if rc != 0 {
        let errno = std::io::Error::last_os_error();
        tracing::debug!(error = %errno, "TIOCSCTTY failed, worker has no controlling terminal");
    }
}

/// Renders a path buf suitable for `execvp`, used by the generic
/// pass-through worker binary.
pub fn to_cstring(s: &str) -> CString {
    #[allow(clippy::expect_used)]
    CString::new(s).unwrap_or_else(|_| CString::new("").expect("empty string has no interior nul"))
}
