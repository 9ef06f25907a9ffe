// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A minimal native module, the other shape `uprocd-daemon`'s generic
//! `uprocd` binary doesn't show: one that reads its own config through
//! the embedding API (`embed::config_string`, `embed::module_directory`)
//! before handing off, rather than treating every request identically.
//! Exercises the "Identity echo" scenario end to end: with a config
//! declaring `ProcessName=echo`, `uprocctl run echomod foo bar` execs
//! `echo foo bar` and the worker's own exit status comes back unchanged.

use std::ffi::CString;

use uprocd_core::{ModuleName, RunContext};
use uprocd_daemon::{self, embed, LoopOutcome};

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let args: Vec<String> = std::env::args().collect();
    let module_name = match parse_argv(&args) {
        Some(name) => name,
        None => {
            eprintln!("usage: echomod + <module> (launched by the service manager, not run directly)");
            return 1;
        }
    };

    let mut booted = match uprocd_daemon::boot(module_name) {
        Ok(booted) => booted,
        Err(e) => {
            eprintln!("echomod: {e}");
            return 1;
        }
    };

    tracing::debug!(
        dir = %embed::module_directory(&booted.state).display(),
        greeting = embed::config_string(&booted.state, "Greeting"),
        "echomod ready"
    );

    loop {
        match uprocd_daemon::run_loop(&booted.bound.listener, &booted.state) {
            LoopOutcome::FatalExit(e) => {
                tracing::error!(error = %e, "daemon loop exited");
                booted.state.run_exit_handler();
                return 1;
            }
            LoopOutcome::HandedOff(ctx) => {
                announce_greeting(&booted.state);
                uprocd_daemon::transplant::context_enter(&ctx);
                exec_worker(&ctx);
                // exec_worker only returns on failure.
                return 1;
            }
        }
    }
}

/// Demonstrates the embedding API's config readers: if the module's
/// config declares a `Greeting` key, it's logged once per request
/// before the worker takes over. This is the only behavior that
/// distinguishes `echomod` from `uprocd`'s generic passthrough.
fn announce_greeting(state: &uprocd_daemon::GlobalState) {
    if embed::config_present(state, "Greeting") {
        tracing::info!(greeting = embed::config_string(state, "Greeting"), "echomod handing off");
    }
}

fn parse_argv(args: &[String]) -> Option<ModuleName> {
    if args.len() != 3 || args[1] != "+" {
        return None;
    }
    ModuleName::new(args[2].clone()).ok()
}

fn exec_worker(ctx: &RunContext) {
    let argv = ctx.worker_argv();
    let Some(program) = argv.first() else {
        eprintln!("echomod: empty argv, nothing to exec");
        return;
    };

    let c_program = uprocd_daemon::transplant::to_cstring(program);
    let c_argv: Vec<CString> = argv.iter().map(|arg| uprocd_daemon::transplant::to_cstring(arg)).collect();

    match nix::unistd::execvp(&c_program, &c_argv) {
        Ok(_) => unreachable!("execvp only returns on error"),
        Err(e) => eprintln!("echomod: failed to exec '{program}': {e}"),
    }
}
