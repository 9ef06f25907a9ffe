// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cgrmvd`'s entry point. Takes no arguments: unlike a module daemon
//! there is exactly one system-wide instance, started by the service
//! manager with no per-instance identity to parse out of `argv`.

use std::sync::atomic::{AtomicBool, Ordering};

use nix::sys::signal::{self, SigHandler, Signal};
use uprocd_cgrmvd::{env, lifecycle, run_loop, PolicyStore};

static RELOAD_REQUESTED: AtomicBool = AtomicBool::new(false);

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    if let Err(e) = lifecycle::init_logging() {
        eprintln!("cgrmvd: failed to set up logging: {e}");
        return 1;
    }

    let policies = PolicyStore::load(env::policy_dir());
    if let Err(e) = install_sighup_handler() {
        tracing::warn!(error = %e, "failed to install SIGHUP handler, policy reload is disabled");
    }

    let socket_path = env::socket_path();
    let lock_path = env::lock_path();
    let bound = match lifecycle::startup(&socket_path, &lock_path) {
        Ok(bound) => bound,
        Err(e) => {
            tracing::error!(error = %e, "failed to start cgrmvd");
            return 1;
        }
    };

    tracing::info!(socket = %socket_path.display(), "cgrmvd ready");
    let fatal = run_loop(&bound.listener, &policies, &RELOAD_REQUESTED);
    tracing::error!(error = %fatal, "cgrmvd request loop exited");
    1
}

fn install_sighup_handler() -> Result<(), nix::Error> {
    // SAFETY: the handler only performs an atomic store, which is
    // async-signal-safe.
    unsafe {
        signal::signal(Signal::SIGHUP, SigHandler::Handler(on_sighup))?;
    }
    Ok(())
}

extern "C" fn on_sighup(_: libc::c_int) {
    RELOAD_REQUESTED.store(true, Ordering::Relaxed);
}
