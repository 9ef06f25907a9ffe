// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cgrmvd`'s request loop. Unlike a module daemon it never forks: each
//! `MoveCgroup` call is answered in place, so there is no handoff type
//! to propagate, just a fatal [`CgrmvdError`] if the listener itself
//! fails.

use std::os::unix::net::{UnixListener, UnixStream};
use std::sync::atomic::{AtomicBool, Ordering};

use uprocd_protocol::{read_frame, write_frame, Request, Response};

use crate::cgroup;
use crate::error::CgrmvdError;
use crate::policy::PolicyStore;

/// Serves `listener` until it errors. Checks `reload_requested` once per
/// loop iteration rather than inside the `SIGHUP` handler itself, since
/// the handler can only safely flip a flag, not call into the policy
/// loader's file I/O.
pub fn run_loop(listener: &UnixListener, policies: &PolicyStore, reload_requested: &AtomicBool) -> CgrmvdError {
    loop {
        if reload_requested.swap(false, Ordering::Relaxed) {
            policies.reload();
        }

        let stream = match listener.accept() {
            Ok((stream, _addr)) => stream,
            Err(e) => return CgrmvdError::Io(e),
        };

        if let Err(e) = handle_connection(stream, policies) {
            tracing::warn!(error = %e, "request failed");
        }
    }
}

fn handle_connection(mut stream: UnixStream, policies: &PolicyStore) -> Result<(), CgrmvdError> {
    let request: Request = read_frame(&mut stream)?;

    let response = match request {
        Request::MoveCgroup { copier_pid, origin_pid } => match policies.verify(copier_pid, origin_pid) {
            Ok(()) => match cgroup::move_into_cgroups(copier_pid, origin_pid) {
                Ok(()) => Response::Ok,
                Err(e) => Response::Error { message: e.to_string() },
            },
            Err(reason) => Response::Error { message: reason },
        },
        other => Response::Error { message: format!("cgrmvd only serves MoveCgroup, got {other:?}") },
    };

    write_frame(&mut stream, &response)?;
    Ok(())
}
