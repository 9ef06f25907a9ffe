// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared startup sequence for anything that links this crate to become
//! a module daemon: load config, set up logging, bind the socket,
//! install the reaper. Both the generic `uprocd` binary and a
//! hand-written module binary (see `demos/echomod`) call [`boot`]
//! instead of repeating `main.c`'s startup ordering themselves.

use uprocd_core::ModuleName;

use crate::error::DaemonError;
use crate::lifecycle::{self, Bound};
use crate::signals;
use crate::state::GlobalState;

/// Everything a booted daemon needs to run its request loop.
pub struct Booted {
    pub state: GlobalState,
    pub bound: Bound,
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Resolves `module_name`'s config, sets up logging, binds the request
/// socket, and installs the `SIGCHLD` reaper, in that order (logging
/// before bind, so a bind failure is itself logged).
pub fn boot(module_name: ModuleName) -> Result<Booted, DaemonError> {
    let config = lifecycle::Config::load(module_name)?;
    let log_guard = lifecycle::init_logging(&config.log_path)?;
    let bound = lifecycle::startup(&config)?;
    signals::install_sigchld_reaper()?;

    let socket_path = config.socket_path.clone();
    let state = GlobalState::new(config.module_name, config.module_config_dir, config.resolved);
    tracing::info!(module = state.module_name.as_str(), socket = %socket_path.display(), "daemon ready");

    Ok(Booted { state, bound, _log_guard: log_guard })
}
