// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module identity and its deterministic derivations.

use std::fmt;

const SERVICE_PREFIX: &str = "com.refi64.uprocd.modules.";
const OBJECT_PREFIX: &str = "/com/refi64/uprocd/modules/";
const UNIT_PREFIX: &str = "uprocd@";

/// A module's short textual name, e.g. `python`.
///
/// The session-bus service name, the object path, and the system-unit
/// instance identifier are all injective functions of this name and are
/// recoverable from it (see [`ModuleName::service_name`],
/// [`ModuleName::object_path`], [`ModuleName::unit_name`] and their
/// `parse_*` inverses).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleName(String);

/// A name failed the module-name grammar: non-empty, ASCII alphanumeric
/// plus `-`/`_`, no `.` or `/` (those would make the derived bus names
/// and paths ambiguous to invert).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid module name {0:?}: must be non-empty ASCII alphanumeric, '-', or '_'")]
pub struct InvalidModuleName(String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidModuleName> {
        let name = name.into();
        let valid = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(InvalidModuleName(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `com.refi64.uprocd.modules.<name>`
    pub fn service_name(&self) -> String {
        format!("{SERVICE_PREFIX}{}", self.0)
    }

    /// `/com/refi64/uprocd/modules/<name>`
    pub fn object_path(&self) -> String {
        format!("{OBJECT_PREFIX}{}", self.0)
    }

    /// The systemd template-unit instance identifier, `uprocd@<name>`.
    pub fn unit_name(&self) -> String {
        format!("{UNIT_PREFIX}{}", self.0)
    }

    /// Inverse of [`ModuleName::service_name`].
    pub fn parse_service_name(service: &str) -> Option<Self> {
        service.strip_prefix(SERVICE_PREFIX).and_then(|n| Self::new(n).ok())
    }

    /// Inverse of [`ModuleName::object_path`].
    pub fn parse_object_path(path: &str) -> Option<Self> {
        path.strip_prefix(OBJECT_PREFIX).and_then(|n| Self::new(n).ok())
    }

    /// Inverse of [`ModuleName::unit_name`].
    pub fn parse_unit_name(unit: &str) -> Option<Self> {
        unit.strip_prefix(UNIT_PREFIX).and_then(|n| Self::new(n).ok())
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ModuleName {
    type Err = InvalidModuleName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;
