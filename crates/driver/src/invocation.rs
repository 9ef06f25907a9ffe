// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Argv[0]-based dispatch (`spec.md` §4.4, §6): the same binary answers
//! to `uprocctl run <mod> [args...]`, `uprocctl status <mod>`, the `u
//! <mod> [args...]` alias, and any `u<mod>` symlink shorthand. Which
//! mode applies is decided entirely by the basename the binary was
//! invoked under, mirroring `examples/original_source/src/uprocctl/main.c`'s
//! own `argv[0]`-driven `prog` global, generalized to the extra
//! invocation shapes this rewrite's `spec.md` adds.

use std::path::Path;

use uprocd_core::ModuleName;

use crate::error::DriverError;

/// What a parsed command line asked the driver to do.
pub enum Invocation {
    /// `uprocctl -h`
    Help,
    /// `uprocctl run -h`
    RunHelp,
    /// `uprocctl status <module>`
    Status { module: ModuleName },
    /// `uprocctl run <module> [args...]`, `u <module> [args...]`, or
    /// `u<module> [args...]`.
    Run { module: ModuleName, args: Vec<String> },
}

/// Parses a full `argv` (including `argv[0]`) into an [`Invocation`].
pub fn parse(argv: &[String]) -> Result<Invocation, DriverError> {
    let prog = argv.first().map(String::as_str).unwrap_or("uprocctl");
    let basename = Path::new(prog).file_name().and_then(|n| n.to_str()).unwrap_or(prog);
    let rest = argv.get(1..).unwrap_or(&[]);

    match basename {
        "uprocctl" => parse_uprocctl(rest),
        "u" => parse_u_alias(rest),
        other => parse_symlink(other, rest),
    }
}

fn parse_uprocctl(args: &[String]) -> Result<Invocation, DriverError> {
    match args {
        [] => Err(DriverError::UnknownInvocation("(no command given)".to_string())),
        [flag] if flag == "-h" => Ok(Invocation::Help),
        [cmd, rest @ ..] if cmd == "status" => {
            let module = rest.first().ok_or_else(|| {
                DriverError::UnknownInvocation("status requires a module argument".to_string())
            })?;
            Ok(Invocation::Status { module: ModuleName::new(module.as_str())? })
        }
        [cmd, rest @ ..] if cmd == "run" => parse_run_args(rest),
        [other, ..] => Err(DriverError::UnknownInvocation(other.clone())),
    }
}

/// `u <module> [args...]`, the alias `spec.md` §6 lists for `uprocctl
/// run`.
fn parse_u_alias(args: &[String]) -> Result<Invocation, DriverError> {
    parse_run_args(args)
}

fn parse_run_args(args: &[String]) -> Result<Invocation, DriverError> {
    match args {
        [] => Err(DriverError::UnknownInvocation("run requires a module argument".to_string())),
        [flag] if flag == "-h" => Ok(Invocation::RunHelp),
        [module, rest @ ..] => Ok(Invocation::Run { module: ModuleName::new(module.as_str())?, args: rest.to_vec() }),
    }
}

/// `u<module> [args...]`: a symlink named after the module it implies,
/// with every other argument passed straight through to the module.
fn parse_symlink(basename: &str, args: &[String]) -> Result<Invocation, DriverError> {
    let Some(module_str) = basename.strip_prefix('u').filter(|s| !s.is_empty()) else {
        return Err(DriverError::UnknownInvocation(basename.to_string()));
    };

    if matches!(args.first().map(String::as_str), Some("-h")) {
        return Ok(Invocation::RunHelp);
    }

    Ok(Invocation::Run { module: ModuleName::new(module_str)?, args: args.to_vec() })
}

#[cfg(test)]
#[path = "invocation_tests.rs"]
mod tests;
