// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// A reply from a module daemon or from `cgrmvd`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Response {
    /// Generic success, e.g. `MoveCgroup`'s `()` reply.
    Ok,

    /// `Status()`'s `(name, description)` reply. `description` defaults
    /// to `"<none>"` when the module declares none.
    Status { name: String, description: String },

    /// `Run()`'s `(worker_pid, title)` reply.
    Run { worker_pid: i32, title: String },

    /// A bus error: protocol errors (malformed payload, wrong
    /// signature) and policy-check failures both surface this way, the
    /// peer never sees a bare connection drop.
    Error { message: String },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
