// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Seizes the forked worker and impersonates it for the rest of its
//! life (`spec.md` §4.4 steps 5-7, §5's signal-forwarding rule): forwards
//! every signal the driver receives to the worker, and mirrors the
//! worker's exact exit status via the `PTRACE_EVENT_EXIT` trap rather
//! than whatever `WEXITSTATUS` would report after the kernel has
//! already reaped it (`spec.md`'s rationale for seizing over attaching).

use std::sync::atomic::{AtomicI32, Ordering};

use nix::sys::ptrace;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

/// The worker pid, stashed in a global so the signal handler installed
/// by [`become_worker`] can forward to it — signal handlers take no
/// arguments beyond the signal number, so there is nowhere else to
/// carry this.
static WORKER_PID: AtomicI32 = AtomicI32::new(0);

/// Seizes `worker_pid`, installs signal-forwarding handlers, and blocks
/// impersonating it. Only returns by calling [`std::process::exit`] with
/// the worker's own exit status or terminating signal (`spec.md` §4.4
/// step 7).
pub fn become_worker(worker_pid: i32) -> ! {
    WORKER_PID.store(worker_pid, Ordering::Relaxed);
    let pid = Pid::from_raw(worker_pid);

    let options = ptrace::Options::PTRACE_O_EXITKILL | ptrace::Options::PTRACE_O_TRACEEXIT;
    if let Err(e) = ptrace::seize(pid, options) {
        eprintln!("uprocctl: failed to seize worker {worker_pid}: {e}");
        std::process::exit(1);
    }

    install_signal_forwarders();
    wait_loop(pid)
}

fn wait_loop(pid: Pid) -> ! {
    loop {
        match waitpid(pid, Some(WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::Exited(_, code)) => std::process::exit(code),
            Ok(WaitStatus::Signaled(_, sig, _)) => die_by_signal(sig),
            Ok(WaitStatus::PtraceEvent(_, _, event)) if event == libc::PTRACE_EVENT_EXIT => {
                let outcome = read_exit_status(pid);
                // The tracee is parked at the exit trap; let it actually
                // finish dying, then reap it before reporting.
                let _ = ptrace::cont(pid, None);
                let _ = waitpid(pid, None);
                match outcome {
                    WorkerEnd::Exited(code) => std::process::exit(code),
                    // `PTRACE_O_TRACEEXIT`'s exit-trap fires on signal
                    // death too, before `WaitStatus::Signaled` would —
                    // route it through the same re-raise path so the
                    // driver ends up `WIFSIGNALED` itself (`spec.md`
                    // §4.4 step 7, §8 scenario 3).
                    WorkerEnd::Signaled(sig) => die_by_signal(sig),
                }
            }
            // Any other ptrace-stop (signal-delivery-stop, syscall-stop)
            // must be re-injected or the worker stays parked forever;
            // `sig` here is the signal that caused the stop.
            Ok(WaitStatus::PtraceEvent(_, sig, _)) => {
                let _ = ptrace::cont(pid, Some(sig));
            }
            Ok(WaitStatus::Stopped(_, sig)) => {
                let _ = ptrace::cont(pid, Some(sig));
            }
            Ok(_) => continue,
            Err(nix::Error::EINTR) => continue,
            Err(e) => {
                eprintln!("uprocctl: waitpid on worker {} failed: {e}", pid.as_raw());
                std::process::exit(1);
            }
        }
    }
}

/// How the worker's pre-termination wait status, read via
/// `PTRACE_GETEVENTMSG`, decodes.
#[derive(Debug, PartialEq, Eq)]
enum WorkerEnd {
    /// `_exit`/`exit` with this status code.
    Exited(i32),
    /// Killed by this signal; the driver must re-raise it, not exit
    /// normally with a `128 + signal` code (`spec.md` §4.4 step 7).
    Signaled(Signal),
}

/// Reads the worker's pre-termination wait status via
/// `PTRACE_GETEVENTMSG` — the exact status the worker would have left
/// behind for a plain (non-traced) `waitpid`, obtained before the
/// kernel reaps it.
fn read_exit_status(pid: Pid) -> WorkerEnd {
    match ptrace::getevent(pid) {
        Ok(raw_status) => decode_exit_status(raw_status as i32),
        Err(e) => {
            tracing::warn!(error = %e, "PTRACE_GETEVENTMSG failed, defaulting worker exit code to 1");
            WorkerEnd::Exited(1)
        }
    }
}

/// The standard POSIX wait-status encoding (`WIFEXITED`/`WEXITSTATUS`/
/// `WIFSIGNALED`/`WTERMSIG`), reimplemented because this value comes
/// from `PTRACE_GETEVENTMSG`, not from a `waitpid` call `nix` would
/// decode into a [`WaitStatus`] for us.
fn decode_exit_status(status: i32) -> WorkerEnd {
    let low7 = status & 0x7f;
    if low7 == 0 {
        WorkerEnd::Exited((status >> 8) & 0xff)
    } else if low7 != 0x7f {
        match Signal::try_from(low7) {
            Ok(sig) => WorkerEnd::Signaled(sig),
            Err(_) => WorkerEnd::Exited(128 + low7),
        }
    } else {
        WorkerEnd::Exited(1)
    }
}

/// Restores `sig`'s default disposition and re-raises it against the
/// driver itself, so the shell sees the same terminating signal the
/// worker died from (`spec.md` §4.4 step 7, §8 scenario 3).
fn die_by_signal(sig: Signal) -> ! {
    // SAFETY: only resets this process's own disposition for `sig`
    // before re-raising it against itself.
    unsafe {
        let _ = signal::signal(sig, SigHandler::SigDfl);
    }
    let _ = signal::raise(sig);
    std::process::exit(128 + sig as i32)
}

/// Installs a forwarding handler on every signal in `[1, 30]` except
/// `SIGCHLD`, `SIGKILL`, and `SIGSTOP` — the latter two can't be caught
/// at all, and `spec.md` §5 excludes `SIGCHLD` explicitly (the driver
/// has no children of its own to reap).
fn install_signal_forwarders() {
    for raw in 1..=30 {
        let Ok(sig) = Signal::try_from(raw) else { continue };
        if matches!(sig, Signal::SIGCHLD | Signal::SIGKILL | Signal::SIGSTOP) {
            continue;
        }
        // SAFETY: `forward_signal` only calls `kill`, async-signal-safe.
        unsafe {
            let _ = signal::signal(sig, SigHandler::Handler(forward_signal));
        }
    }
}

extern "C" fn forward_signal(raw: libc::c_int) {
    let worker = WORKER_PID.load(Ordering::Relaxed);
    if worker > 0 {
        // SAFETY: kill(2) is async-signal-safe.
        unsafe {
            libc::kill(worker, raw);
        }
    }
}

#[cfg(test)]
#[path = "tracer_tests.rs"]
mod tests;
