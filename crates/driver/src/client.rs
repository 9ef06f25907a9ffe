// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The driver's half of the `Status`/`Run` calls (`spec.md` §4.4 steps
//! 1-3): connects to the target module's socket, marshals the request,
//! and decodes the reply. Grounded on `uprocd-daemon::cgrmvd_client`'s
//! connect-send-read shape, the daemon's own client role against
//! `cgrmvd`.

use std::os::fd::RawFd;
use std::path::PathBuf;

use uprocd_core::ModuleName;
use uprocd_protocol::{decode, encode, recv_with_fds, send_with_fds, Request, Response};

use crate::env;
use crate::error::DriverError;
use crate::request;

/// Connects to `module`'s request socket, translating a connection
/// failure into [`DriverError::ServiceUnreachable`] so the CLI can print
/// the "is the unit running?" hint (`spec.md` §6 scenario 6) instead of
/// a bare I/O error.
fn connect(module: &ModuleName) -> Result<std::os::unix::net::UnixStream, DriverError> {
    let dir = env::state_dir()?;
    let path = env::socket_path(&dir, module);
    std::os::unix::net::UnixStream::connect(&path)
        .map_err(|source| DriverError::ServiceUnreachable { module: module.as_str().to_string(), source })
}

/// `Status() -> (name, description)`.
pub fn status(module: &ModuleName) -> Result<(String, String), DriverError> {
    let stream = connect(module)?;
    send_with_fds(&stream, &encode(&Request::Status)?, &[])?;
    let (payload, _fds) = recv_with_fds(&stream, 0)?;

    match decode(&payload)? {
        Response::Status { name, description } => Ok((name, description)),
        Response::Error { message } => Err(DriverError::Remote(message)),
        other => Err(DriverError::UnexpectedResponse(format!("{other:?}"))),
    }
}

/// `Run()`'s reply: the forked worker's pid and its chosen title.
pub struct RunReply {
    pub worker_pid: i32,
    pub title: String,
}

/// Builds and sends a `Run` call for `module`, carrying the driver's own
/// environment, stdio, cwd, and pid (`spec.md` §4.4 step 2).
pub fn run(module: &ModuleName, argv: Vec<String>, cwd: PathBuf) -> Result<RunReply, DriverError> {
    let stream = connect(module)?;

    let env = request::current_env();
    let stdio = request::dup_stdio()?;
    let driver_pid = std::process::id();

    let req = Request::Run { env, argv, cwd, driver_pid };
    let fds: [RawFd; 3] = stdio;
    send_with_fds(&stream, &encode(&req)?, &fds)?;

    // The kernel has its own copies now (duplicated into the daemon's
    // table on receipt, `spec.md` §5); these were only needed to
    // survive the send.
    for fd in fds {
        let _ = nix::unistd::close(fd);
    }

    let (payload, _fds) = recv_with_fds(&stream, 0)?;
    match decode(&payload)? {
        Response::Run { worker_pid, title } => Ok(RunReply { worker_pid, title }),
        Response::Error { message } => Err(DriverError::Remote(message)),
        other => Err(DriverError::UnexpectedResponse(format!("{other:?}"))),
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
