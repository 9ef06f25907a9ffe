// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon's ambient handle: everything the embedding API (`embed.rs`)
//! needs to answer a module author's calls, acquired once at startup and
//! threaded through explicitly rather than kept in a process-wide
//! mutable singleton (`spec.md` §3's `global_daemon_state`, reworked per
//! the Design Notes' "no process-wide mutable singleton" resolution).

use std::path::PathBuf;

use uprocd_config::ResolvedModuleConfig;
use uprocd_core::{ModuleName, Title};

/// One daemon instance's static configuration plus its single mutable
/// field, the exit handler. There is deliberately no `upcoming_context`
/// field here: in the original C daemon that pointer had to be
/// process-wide because the bus dispatch callback had no way to return
/// a value to `run()` except through a global; in this rewrite the run
/// context is a plain local value passed up through
/// [`crate::request_loop::LoopOutcome::HandedOff`], so there is nothing
/// to stash between the start of a `Run` handler and its resolution.
pub struct GlobalState {
    pub module_name: ModuleName,
    pub module_dir: PathBuf,
    pub config: ResolvedModuleConfig,
    exit_handler: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl GlobalState {
    pub fn new(module_name: ModuleName, module_dir: PathBuf, config: ResolvedModuleConfig) -> Self {
        Self { module_name, module_dir, config, exit_handler: None }
    }

    /// The title a worker forked from this daemon presents: the
    /// `ProcessName` override if configured, else the bare module name.
    pub fn title(&self) -> Title {
        Title::for_module(self.module_name.as_str(), self.config.process_name.as_deref())
    }

    /// `Status()`'s description field; `"<none>"` when unconfigured.
    pub fn description(&self) -> &str {
        self.config.description.as_deref().unwrap_or("<none>")
    }

    /// Registers the callback invoked once when the request loop exits
    /// for any reason. Latest call wins, matching `uprocd_on_exit`.
    pub fn on_exit(&mut self, handler: impl FnOnce() + Send + 'static) {
        self.exit_handler = Some(Box::new(handler));
    }

    /// Runs and clears the registered exit handler, if any. Idempotent:
    /// calling it twice only runs the handler once.
    pub fn run_exit_handler(&mut self) {
        if let Some(handler) = self.exit_handler.take() {
            handler();
        }
    }
}
