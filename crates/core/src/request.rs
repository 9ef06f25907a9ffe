// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Run` request and the run context derived from it.

use std::os::fd::RawFd;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::title::Title;

/// The three standard streams handed to a worker, in fd-number order.
pub type StdioFds = [RawFd; 3];

/// An immutable `Run` request, decoded from the wire.
///
/// Environment pairs are stored in an order-preserving map: if the wire
/// payload repeats a key, the later pair wins but the pair's original
/// insertion slot is kept. The three stdio descriptors are raw fd
/// numbers — this crate does no I/O, so it does not own them; whichever
/// layer decodes a request off the wire is responsible for `dup`ing
/// them into descriptors this struct can safely carry (see
/// `uprocd-protocol`'s fd-passing helpers).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunRequest {
    env: IndexMap<String, String>,
    pub argv: Vec<String>,
    pub cwd: PathBuf,
    pub stdio: StdioFds,
    pub driver_pid: u32,
}

impl RunRequest {
    pub fn new(
        env_pairs: impl IntoIterator<Item = (String, String)>,
        argv: Vec<String>,
        cwd: PathBuf,
        stdio: StdioFds,
        driver_pid: u32,
    ) -> Self {
        let mut env = IndexMap::new();
        for (k, v) in env_pairs {
            env.insert(k, v);
        }
        Self { env, argv, cwd, stdio, driver_pid }
    }

    /// The environment pairs in insertion order (duplicates already
    /// resolved to last-wins by [`RunRequest::new`]).
    pub fn env(&self) -> impl Iterator<Item = (&str, &str)> {
        self.env.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn env_len(&self) -> usize {
        self.env.len()
    }
}

/// The request plus the worker's chosen process title.
///
/// Created in the daemon when a `Run` is accepted; transferred by
/// identity across `fork` (both parent and child observe it — the
/// parent discards it before accepting the next request, the child
/// consumes it via [`RunContext::worker_argv`] and friends).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub request: RunRequest,
    pub title: Title,
}

impl RunContext {
    pub fn new(request: RunRequest, title: Title) -> Self {
        Self { request, title }
    }

    /// The worker's `argv`, with `argv[0]` set to the chosen title so
    /// that the worker's presented identity already matches what the
    /// driver renames itself to.
    pub fn worker_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.request.argv.len() + 1);
        argv.push(self.title.as_str().to_string());
        argv.extend(self.request.argv.iter().cloned());
        argv
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
