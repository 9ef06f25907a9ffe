// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds a `Run` call's payload from the driver's own process
//! (`spec.md` §4.4 step 2): the current environment, the stdio
//! descriptors, and the driver's own pid.

use std::os::fd::RawFd;

use indexmap::IndexMap;
use nix::unistd::dup;

use crate::error::DriverError;

/// The current process environment as an ordered `(key, value)` map.
/// Equivalent to the original's "split the environment on the first
/// `=`": `std::env::vars()` already does that splitting for us.
pub fn current_env() -> IndexMap<String, String> {
    std::env::vars().collect()
}

/// Duplicates fds 0/1/2. Duplication is required, not cosmetic: the
/// wire layer's `SCM_RIGHTS` send may have the kernel consume the
/// passed descriptors asynchronously, so the driver must keep its own
/// stdio open under independent descriptor numbers regardless of what
/// the send does to the copies it hands over.
pub fn dup_stdio() -> Result<[RawFd; 3], DriverError> {
    Ok([dup(0)?, dup(1)?, dup(2)?])
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
