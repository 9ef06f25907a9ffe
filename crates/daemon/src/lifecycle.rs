// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup: single-instance lock, socket bind, log setup.
//! The exclusive lock is acquired before the socket path is touched, so
//! two racing launches of the same module never both believe they
//! bound.

use std::fs::File;
use std::io::Write;
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use uprocd_config::ResolvedModuleConfig;
use uprocd_core::ModuleName;

use crate::env;
use crate::error::DaemonError;

/// Static configuration for one daemon instance, resolved once at
/// startup from the module name and its on-disk config file.
pub struct Config {
    pub module_name: ModuleName,
    pub module_config_path: PathBuf,
    pub module_config_dir: PathBuf,
    pub resolved: ResolvedModuleConfig,
    pub state_dir: PathBuf,
    pub socket_path: PathBuf,
    pub lock_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    pub fn load(module_name: ModuleName) -> Result<Self, DaemonError> {
        let module_config_path = uprocd_config::find_module_config(&module_name)
            .ok_or_else(|| DaemonError::ModuleNotFound(module_name.as_str().to_string()))?;
        let module_config_dir = module_config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let config = uprocd_config::parse_module_config(&module_config_path)?;
        let resolved = resolve_with_base(&module_config_path, &config)?;

        let state_dir = env::state_dir()?;
        Ok(Self {
            socket_path: env::socket_path(&state_dir, &module_name),
            lock_path: env::lock_path(&state_dir, &module_name),
            log_path: env::log_path(&state_dir, &module_name),
            module_name,
            module_config_path,
            module_config_dir,
            resolved,
            state_dir,
        })
    }
}

use std::path::Path;

/// Resolves `config`, loading its `Base` module's config from the same
/// directory when `config` is a `DerivedModule` (one-hop derivation,
/// see `spec.md` §9).
fn resolve_with_base(
    path: &Path,
    config: &uprocd_core::ModuleConfig,
) -> Result<ResolvedModuleConfig, DaemonError> {
    let path_str = path.display().to_string();
    match config.as_derived() {
        None => Ok(uprocd_config::resolve_module_config(&path_str, config, None)?),
        Some(derived) => {
            let base_name = ModuleName::new(&derived.base)
                .map_err(|_| uprocd_core::ConfigError::BaseModuleNotFound {
                    path: path_str.clone(),
                    base: derived.base.clone(),
                })?;
            let base_path = uprocd_config::find_module_config(&base_name).ok_or_else(|| {
                uprocd_core::ConfigError::BaseModuleNotFound { path: path_str.clone(), base: derived.base.clone() }
            })?;
            let base_config = uprocd_config::parse_module_config(&base_path)?;
            Ok(uprocd_config::resolve_module_config(&path_str, config, Some((&derived.base, &base_config)))?)
        }
    }
}

/// The held state of a running daemon: the advisory lock file (dropped,
/// hence unlocked, on process exit) and the bound listener socket.
pub struct Bound {
    #[allow(dead_code)]
    lock_file: File,
    pub listener: UnixListener,
}

/// Acquires the per-module lock, then binds the request socket. Order
/// matters: a second launch of the same module must fail at the lock,
/// never race to bind (`spec.md` "one per module instance").
pub fn startup(config: &Config) -> Result<Bound, DaemonError> {
    std::fs::create_dir_all(&config.state_dir)?;

    let lock_file =
        File::options().write(true).create(true).truncate(false).open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(DaemonError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| DaemonError::BindFailed { path: config.socket_path.clone(), source: e })?;

    Ok(Bound { lock_file, listener })
}

/// Sets up `tracing` with a rotating file appender under the state
/// directory, filtered by `RUST_LOG` (or `info` by default).
pub fn init_logging(log_path: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard, DaemonError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let dir = log_path.parent().ok_or(DaemonError::NoStateDir)?;
    let file_name = log_path.file_name().ok_or(DaemonError::NoStateDir)?;
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Ok(guard)
}
