// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A call against a module's session-bus surface, or against `cgrmvd`'s
/// system-bus surface. `Run`'s three stdio descriptors travel out of
/// band as `SCM_RIGHTS` ancillary data alongside the frame carrying
/// this value, never inside the JSON body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Request {
    /// `Status() -> (ss)`
    Status,

    /// `Run(a{ss} env, as argv, s cwd, (hhh) ttys, x driver_pid) -> (xs)`
    Run { env: IndexMap<String, String>, argv: Vec<String>, cwd: PathBuf, driver_pid: u32 },

    /// `MoveCgroup(x copier_pid, x origin_pid) -> ()`, `cgrmvd`'s only
    /// method.
    MoveCgroup { copier_pid: i32, origin_pid: i32 },
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
