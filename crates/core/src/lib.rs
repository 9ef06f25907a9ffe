// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! uprocd-core: shared domain types for the module daemon, the client
//! driver, and the cgroup-move helper.
//!
//! This crate has no I/O of its own. It owns the shapes that cross
//! process boundaries (the run request/context, module identity,
//! config values, cgroup policy) so that `uprocd-protocol`,
//! `uprocd-config`, `uprocd-daemon`, `uprocd-driver`, and
//! `uprocd-cgrmvd` all agree on them without depending on each other.

pub mod config;
pub mod module;
pub mod policy;
pub mod request;
pub mod title;

pub use config::{ConfigError, ConfigScalar, ConfigValue, ModuleConfig, ModuleKind};
pub use module::ModuleName;
pub use policy::{PolicyEntry, PolicyTable};
pub use request::{RunContext, RunRequest};
pub use title::Title;
