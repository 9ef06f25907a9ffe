// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The client driver's entry point. Dispatches on `argv[0]` via
//! [`uprocd_driver::invocation::parse`] so this one binary answers to
//! `uprocctl run`/`uprocctl status`, the `u` alias, and any `u<module>`
//! symlink shorthand — install the symlinks at packaging time, the
//! binary itself does the rest.

use uprocd_core::ModuleName;
use uprocd_driver::invocation::{self, Invocation};
use uprocd_driver::{proctitle, tracer, DriverError};

fn main() {
    let filter = tracing_subscriber_env_filter();
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    std::process::exit(run(std::env::args().collect()));
}

fn tracing_subscriber_env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
}

fn run(argv: Vec<String>) -> i32 {
    match invocation::parse(&argv) {
        Ok(Invocation::Help) => {
            print_help();
            0
        }
        Ok(Invocation::RunHelp) => {
            print_run_help();
            0
        }
        Ok(Invocation::Status { module }) => cmd_status(&module),
        Ok(Invocation::Run { module, args }) => cmd_run(&module, args),
        Err(e) => {
            eprintln!("uprocctl: {e}");
            1
        }
    }
}

fn cmd_status(module: &ModuleName) -> i32 {
    match uprocd_driver::status(module) {
        Ok((name, description)) => {
            println!("{name}: {description}");
            0
        }
        Err(e) => {
            eprintln!("uprocctl: {e}");
            1
        }
    }
}

/// Builds and sends the `Run` call, then hands off to the tracer, which
/// only returns by exiting the process with the worker's own status
/// (`spec.md` §4.4 steps 3-7). Pre-exec failures here are exactly the
/// ones `spec.md` §7 calls "protocol errors" and "local syscall errors":
/// reported with exit code 1, never retried.
fn cmd_run(module: &ModuleName, args: Vec<String>) -> i32 {
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("uprocctl: error retrieving current working directory: {e}");
            return 1;
        }
    };

    let reply = match uprocd_driver::run(module, args, cwd) {
        Ok(reply) => reply,
        Err(DriverError::ServiceUnreachable { module, source }) => {
            eprintln!("uprocctl: Failed to locate {module}'s D-Bus service.");
            eprintln!("uprocctl: Is the uprocd@{module} unit running? ({source})");
            return 1;
        }
        Err(e) => {
            eprintln!("uprocctl: {e}");
            return 1;
        }
    };

    proctitle::set(&reply.title);
    tracer::become_worker(reply.worker_pid)
}

fn print_help() {
    println!("usage: uprocctl -h");
    println!("       uprocctl run [-h] module [args...]");
    println!("       uprocctl status [-h] module");
    println!();
    println!("uprocctl allows you to communicate with the uprocd modules.");
    println!();
    println!("Commands:");
    println!();
    println!("  run         Run a command through a uprocd module.");
    println!("  status      Show a module daemon's name and description.");
}

fn print_run_help() {
    println!("usage: uprocctl run [-h] module [args...]");
    println!();
    println!("uprocctl run allows you to spawn commands via the uprocd modules.");
    println!();
    println!("  -h          Show this screen.");
    println!("  module      The uprocd module to run.");
    println!("  [args...]   Command line arguments to pass to the module.");
}
