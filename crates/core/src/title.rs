// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker/driver presented identity.

use serde::{Deserialize, Serialize};

/// The command name a worker and its driver advertise via `argv[0]` /
/// `PR_SET_NAME`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The chosen title for a `Run`: the configured `ProcessName`
    /// override if set, else the bare module name.
    pub fn for_module(module_name: &str, process_name_override: Option<&str>) -> Self {
        Self(process_name_override.unwrap_or(module_name).to_string())
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_override_when_present() {
        assert_eq!(Title::for_module("python", Some("echo")).as_str(), "echo");
    }

    #[test]
    fn falls_back_to_module_name() {
        assert_eq!(Title::for_module("python", None).as_str(), "python");
    }
}
