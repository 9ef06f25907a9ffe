// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The generic module daemon: a worker that, once handed off, simply
//! `execvp`s the caller's own `argv` with `argv[0]` replaced by the
//! chosen title. Useful standalone (a module with no preload logic
//! gains nothing from `uprocd` but still gets the fork/ptrace/cgroup
//! machinery for free) and as the binary the integration tests drive
//! directly. Invoked the way `main.c` expects: `uprocd + <module>`.

use std::ffi::CString;

use uprocd_core::{ModuleName, RunContext};
use uprocd_daemon::{self, LoopOutcome};

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let args: Vec<String> = std::env::args().collect();
    let module_name = match parse_argv(&args) {
        Some(name) => name,
        None => {
            eprintln!("usage: uprocd + <module> (this binary is launched by the service manager, not run directly)");
            return 1;
        }
    };

    let mut booted = match uprocd_daemon::boot(module_name) {
        Ok(booted) => booted,
        Err(e) => {
            eprintln!("uprocd: {e}");
            return 1;
        }
    };

    loop {
        match uprocd_daemon::run_loop(&booted.bound.listener, &booted.state) {
            LoopOutcome::FatalExit(e) => {
                tracing::error!(error = %e, "daemon loop exited");
                booted.state.run_exit_handler();
                return 1;
            }
            LoopOutcome::HandedOff(ctx) => {
                uprocd_daemon::transplant::context_enter(&ctx);
                exec_worker(&ctx);
                // exec_worker only returns on failure.
                return 1;
            }
        }
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
        eprintln!("uprocd: empty argv, nothing to exec");
        return;
    };

    let c_program = uprocd_daemon::transplant::to_cstring(program);
    let c_argv: Vec<CString> = argv.iter().map(|arg| uprocd_daemon::transplant::to_cstring(arg)).collect();

    match nix::unistd::execvp(&c_program, &c_argv) {
        Ok(_) => unreachable!("execvp only returns on error"),
        Err(e) => eprintln!("uprocd: failed to exec '{program}': {e}"),
    }
}
