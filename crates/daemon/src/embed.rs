// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The module embedding API (`spec.md` §4.1), expressed as free
//! functions over [`GlobalState`] rather than an `extern "C"`/`dlopen`
//! ABI — the bundled language modules that would call such an ABI are
//! themselves out of scope (`spec.md` §1); what remains in scope is the
//! Rust-shaped contract a module author links against directly. Names
//! mirror the C API 1:1 (`module_directory`, `module_path`,
//! `config_present`, `config_list_size`, `config_string[_at]`,
//! `config_number[_at]`) so the grounding in
//! `examples/original_source/api/uprocd.h` stays traceable
//! function-by-function.

use std::path::{Path, PathBuf};

use uprocd_core::config::{ConfigScalar, ConfigValue};

use crate::state::GlobalState;

pub fn module_directory(state: &GlobalState) -> &Path {
    &state.module_dir
}

pub fn module_path(state: &GlobalState, rel: &str) -> PathBuf {
    state.module_dir.join(rel)
}

pub fn config_present(state: &GlobalState, key: &str) -> bool {
    state.config.values.contains_key(key)
}

/// Length if `key` names a list value; `-1` if absent; `1` if present
/// but scalar (callers are expected to treat a present scalar as a
/// one-element list, per `spec.md`'s "unspecified if present-but-scalar
/// (treated as 1 by callers)").
pub fn config_list_size(state: &GlobalState, key: &str) -> i64 {
    match state.config.values.get(key) {
        None => -1,
        Some(ConfigValue::List(items)) => items.len() as i64,
        Some(ConfigValue::Scalar(_)) => 1,
    }
}

/// Absent or wrong-type reads return `""`, matching the C API's
/// `NULL`-as-empty-string convention for a scripting-friendly ABI.
pub fn config_string<'a>(state: &'a GlobalState, key: &str) -> &'a str {
    match state.config.values.get(key) {
        Some(ConfigValue::Scalar(ConfigScalar::String(s))) => s.as_str(),
        _ => "",
    }
}

pub fn config_string_at<'a>(state: &'a GlobalState, key: &str, index: usize) -> &'a str {
    match state.config.values.get(key) {
        Some(ConfigValue::List(items)) => match items.get(index) {
            Some(ConfigScalar::String(s)) => s.as_str(),
            _ => "",
        },
        _ => "",
    }
}

pub fn config_number(state: &GlobalState, key: &str) -> f64 {
    match state.config.values.get(key) {
        Some(ConfigValue::Scalar(ConfigScalar::Number(n))) => *n,
        _ => 0.0,
    }
}

pub fn config_number_at(state: &GlobalState, key: &str, index: usize) -> f64 {
    match state.config.values.get(key) {
        Some(ConfigValue::List(items)) => match items.get(index) {
            Some(ConfigScalar::Number(n)) => *n,
            _ => 0.0,
        },
        _ => 0.0,
    }
}

#[cfg(test)]
#[path = "embed_tests.rs"]
mod tests;
