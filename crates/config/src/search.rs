// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module search path resolution: `/usr/share/uprocd/modules`,
//! `$XDG_CONFIG_HOME/uprocd/modules` (falling back to
//! `$HOME/.config/uprocd/modules`), `build/modules`.

use std::path::PathBuf;

use uprocd_core::ModuleName;

/// The ordered list of roots probed for a module config file.
pub fn search_roots() -> Vec<PathBuf> {
    let mut roots = vec![PathBuf::from("/usr/share/uprocd/modules")];

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        roots.push(PathBuf::from(xdg).join("uprocd/modules"));
    } else if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".config/uprocd/modules"));
    }

    roots.push(PathBuf::from("build/modules"));
    roots
}

/// Probes each search root for `<root>/<mod>.updmod` and
/// `<root>/<mod>/<mod>.updmod`, in that order, returning the first hit.
pub fn find_module_config(module: &ModuleName) -> Option<PathBuf> {
    let name = module.as_str();
    for root in search_roots() {
        let flat = root.join(format!("{name}.updmod"));
        if flat.is_file() {
            return Some(flat);
        }
        let nested = root.join(name).join(format!("{name}.updmod"));
        if nested.is_file() {
            return Some(nested);
        }
    }
    None
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
