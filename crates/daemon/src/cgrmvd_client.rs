// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon's half of the `MoveCgroup` call: connects to `cgrmvd`'s
//! socket and asks it to move the current (about-to-become-a-worker)
//! process into the driver's cgroups. Grounded on
//! `examples/original_source/src/cgrmvd/cgrmvd.c`'s `move_cgroups`
//! caller in `api.c`, reworked onto `uprocd-protocol`'s wire codec
//! instead of a D-Bus system-bus call.

use std::os::unix::net::UnixStream;

use uprocd_protocol::{read_frame, write_frame, Request, Response};

use crate::env;
use crate::error::DaemonError;

/// Asks `cgrmvd` to move `copier_pid` (normally the caller's own pid)
/// into each cgroup hierarchy `origin_pid` belongs to. Returns an error
/// if `cgrmvd` is unreachable, refuses per policy, or the connection
/// breaks mid-call — callers treat all three as "couldn't move
/// cgroups" and proceed anyway (see [`crate::transplant::context_enter`]).
pub fn move_cgroup(copier_pid: i32, origin_pid: i32) -> Result<(), DaemonError> {
    let socket_path = env::cgrmvd_socket_path();
    let mut stream = UnixStream::connect(&socket_path)?;

    write_frame(&mut stream, &Request::MoveCgroup { copier_pid, origin_pid })?;
    let response: Response = read_frame(&mut stream)?;

    match response {
        Response::Ok => Ok(()),
        Response::Error { message } => Err(DaemonError::CgroupMoveDenied(message)),
        other => Err(DaemonError::UnexpectedCgrmvdResponse(format!("{other:?}"))),
    }
}
