// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The request loop and fork handoff (`spec.md` §4.2). The original C
//! daemon used `setjmp`/`longjmp` to resume `uprocd_run`'s loop from a
//! point buried inside the bus callback once a forked child wanted to
//! "become" the loop's caller instead of returning to it; Rust has no
//! non-local jump, so [`LoopOutcome`] carries the same information back
//! up the call stack as an ordinary return value instead.

use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;

use indexmap::IndexMap;
use nix::unistd::{self, ForkResult};
use uprocd_core::{RunContext, RunRequest};
use uprocd_protocol::{decode, encode, recv_with_fds, send_with_fds, Request, Response};

use crate::error::DaemonError;
use crate::signals;
use crate::state::GlobalState;

/// What the request loop decided to do about the connection it just
/// finished serving.
pub enum LoopOutcome {
    /// A structural failure (bad socket, broken pipe to a new child)
    /// that should terminate the daemon.
    FatalExit(DaemonError),
    /// A `Run` call forked a worker; this process is that worker, about
    /// to become it. The caller should run [`crate::transplant::context_enter`]
    /// on the returned context and then run the worker's payload.
    HandedOff(RunContext),
}

/// Accepts connections on `listener` until a `Run` call hands off a
/// forked worker, or a fatal error occurs. Runs entirely in the parent
/// (daemon) process; the child never returns from this function — see
/// [`handle_run`].
pub fn run_loop(listener: &UnixListener, state: &GlobalState) -> LoopOutcome {
    loop {
        let stream = match listener.accept() {
            Ok((stream, _addr)) => stream,
            Err(e) => return LoopOutcome::FatalExit(DaemonError::Io(e)),
        };

        match handle_connection(stream, state) {
            Ok(Some(ctx)) => return LoopOutcome::HandedOff(ctx),
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "request failed");
                continue;
            }
        }
    }
}

fn handle_connection(stream: UnixStream, state: &GlobalState) -> Result<Option<RunContext>, DaemonError> {
    // `expect_fds = 0` accepts any number of ancillary descriptors
    // (`Status` sends none, `Run` sends three); we validate the count
    // ourselves once we know which request this is.
    let (payload, fds) = recv_with_fds(&stream, 0)?;
    let request: Request = decode(&payload)?;

    match request {
        Request::Status => {
            let response =
                Response::Status { name: state.module_name.as_str().to_string(), description: state.description().to_string() };
            send_with_fds(&stream, &encode(&response)?, &[])?;
            Ok(None)
        }
        Request::Run { env, argv, cwd, driver_pid } => {
            if fds.len() != 3 {
                let response =
                    Response::Error { message: format!("Run requires 3 stdio descriptors, received {}", fds.len()) };
                send_with_fds(&stream, &encode(&response)?, &[])?;
                return Ok(None);
            }
            handle_run(stream, state, env, argv, cwd, driver_pid, fds)
        }
        Request::MoveCgroup { .. } => {
            let response = Response::Error { message: "MoveCgroup is cgrmvd's method, not a module daemon's".to_string() };
            send_with_fds(&stream, &encode(&response)?, &[])?;
            Ok(None)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_run(
    stream: UnixStream,
    state: &GlobalState,
    env: IndexMap<String, String>,
    argv: Vec<String>,
    cwd: PathBuf,
    driver_pid: u32,
    fds: Vec<OwnedFd>,
) -> Result<Option<RunContext>, DaemonError> {
    let mut fds = fds.into_iter();
    #[allow(clippy::expect_used)]
    let stdio = [
        fds.next().expect("checked len == 3 above").into_raw_fd(),
        fds.next().expect("checked len == 3 above").into_raw_fd(),
        fds.next().expect("checked len == 3 above").into_raw_fd(),
    ];

    let request = RunRequest::new(env, argv, cwd, stdio, driver_pid);
    let title = state.title();
    let ctx = RunContext::new(request, title.clone());

    // A one-byte pipe the child uses to tell the parent "my ptracer is
    // set, you may announce my pid": the driver's `PTRACE_SEIZE` must
    // never race the child's own startup (`spec.md` §4.2's ordering
    // guarantee).
    let (sync_read, sync_write) = unistd::pipe().map_err(DaemonError::Errno)?;

    // SAFETY: this daemon's request loop is single-threaded, satisfying
    // `fork`'s async-signal-safety requirement that the child only call
    // functions safe to run with exactly one thread.
    match unsafe { unistd::fork() }.map_err(DaemonError::Errno)? {
        ForkResult::Parent { child } => {
            drop(sync_write);
            let mut ready = [0u8; 1];
            // Blocks until the child has set PR_SET_PTRACER (or died
            // trying, in which case the read returns 0 bytes at EOF).
            let _ = unistd::read(sync_read.as_raw_fd(), &mut ready);
            drop(sync_read);

            let response = Response::Run { worker_pid: child.as_raw(), title: title.as_str().to_string() };
            send_with_fds(&stream, &encode(&response)?, &[])?;
            drop(stream);
            // `ctx.request.stdio` are bare fd numbers (`uprocd-core` does
            // no I/O of its own, see `RunRequest`'s doc comment), so
            // dropping `ctx` here closes nothing; the parent keeps its
            // own copies of the three descriptors the child inherited
            // across `fork` and must close them itself or leak three
            // fds per `Run` call (`spec.md` §5: "both sides close
            // independently").
            close_stdio(&ctx.request.stdio);
            Ok(None)
        }
        ForkResult::Child => {
            drop(sync_read);
            drop(stream);
            prepare_child(state, driver_pid, sync_write);
            Ok(Some(ctx))
        }
    }
}

/// Closes the parent's copies of the three stdio descriptors handed to
/// a worker. The child's own copies are closed independently, either by
/// `redirect_stdio`'s `dup2`-then-close or by never needing them.
fn close_stdio(stdio: &uprocd_core::request::StdioFds) {
    for fd in stdio {
        let _ = unistd::close(*fd);
    }
}

/// The child's share of the fork handoff: claims its `PR_SET_PTRACER`
/// and `PR_SET_PDEATHSIG`, renames itself, signals the parent it's
/// ready to be seized, and restores signal dispositions the daemon's
/// own loop doesn't want inherited into a worker.
fn prepare_child(state: &GlobalState, driver_pid: u32, sync_write: OwnedFd) {
    set_ptracer(driver_pid);
    set_pdeathsig();
    set_process_name(state.module_name.as_str());

    let _ = unistd::write(sync_write.as_raw_fd(), &[1u8]);
    drop(sync_write);

    signals::restore_default_dispositions();
}

/// `prctl(PR_SET_NAME, "uprocd:<module>")`: the daemon's own rename for
/// the forked-but-not-yet-handed-off child (`spec.md` §4.2 step 5),
/// distinct from the worker's own title — a preload module that never
/// `exec`s (unlike the generic `uprocd` worker, which immediately
/// overwrites this via `execvp`) would otherwise keep showing up as
/// `uprocd` in `ps` for its whole lifetime.
fn set_process_name(module_name: &str) {
    let name = format!("uprocd:{module_name}");
    let mut buf = [0u8; 16];
    let bytes = name.as_bytes();
    let n = bytes.len().min(buf.len() - 1);
    buf[..n].copy_from_slice(&bytes[..n]);

    // SAFETY: PR_SET_NAME reads at most 16 bytes from the pointer;
    // `buf` is exactly that size and nul-terminated by its zero init.
    let rc = unsafe { libc::prctl(libc::PR_SET_NAME, buf.as_ptr() as libc::c_ulong, 0, 0, 0) };
    if rc != 0 {
        let errno = std::io::Error::last_os_error();
        tracing::debug!(error = %errno, "PR_SET_NAME failed, worker's comm name stays uprocd");
    }
}

/// `PR_SET_PTRACER` isn't in `libc` as a named constant — it's a Yama
/// LSM extension (`linux/prctl.h`'s `PR_SET_PTRACER 0x59616d61`, the
/// ASCII value of `"Yama"`), not part of the portable prctl option set
/// `libc` exposes.
const PR_SET_PTRACER: libc::c_int = 0x5961_6d61;

fn set_ptracer(driver_pid: u32) {
    // SAFETY: plain prctl(2) call with no pointer arguments beyond what
    // the kernel interprets as an integer.
    let rc = unsafe { libc::prctl(PR_SET_PTRACER, driver_pid as libc::c_ulong, 0, 0, 0) };
    if rc != 0 {
        let errno = std::io::Error::last_os_error();
        tracing::warn!(error = %errno, "PR_SET_PTRACER failed, driver may not be able to seize this worker");
    }
}

fn set_pdeathsig() {
    // SAFETY: as above.
    let rc = unsafe { libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGKILL as libc::c_ulong, 0, 0, 0) };
    if rc != 0 {
        let errno = std::io::Error::last_os_error();
        tracing::warn!(error = %errno, "PR_SET_PDEATHSIG failed, worker may outlive its driver");
    }
}
