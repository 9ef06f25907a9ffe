// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsed module configuration: the shapes produced by reading a
//! `NativeModule` or `DerivedModule` config file. Parsing itself lives
//! in `uprocd-config`; this module only holds the result and the
//! vocabulary of things that can go wrong while producing it.

use indexmap::IndexMap;

/// A single typed argument value: either a string or a number.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigScalar {
    String(String),
    Number(f64),
}

/// The declared type of an `[Arguments]` entry: a scalar, or a list of
/// scalars. Lists nest exactly one level deep (`list string`, `list
/// number`); a further `list list ...` is rejected by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType {
    Scalar(ScalarKind),
    List(ScalarKind),
}

/// A resolved `[Defaults]` value, matching the shape of its declared
/// [`ArgumentType`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Scalar(ConfigScalar),
    List(Vec<ConfigScalar>),
}

/// A `NativeModule` section: the embedding library to load plus the
/// argument schema and default values it declares for itself.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeModuleConfig {
    pub native_lib: String,
    pub arguments: IndexMap<String, ArgumentType>,
    pub values: IndexMap<String, ConfigValue>,
}

/// A `DerivedModule` section: the name of the native module it extends,
/// and raw value overlays keyed by argument name. Overlay strings are
/// typed and validated against the base module's argument schema during
/// resolution, not while this struct is built.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedModuleConfig {
    pub base: String,
    pub value_overlay: IndexMap<String, String>,
}

/// The section-specific payload of a module config file.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleKind {
    Native(NativeModuleConfig),
    Derived(DerivedModuleConfig),
}

/// A fully parsed module config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleConfig {
    pub process_name: Option<String>,
    pub description: Option<String>,
    pub kind: ModuleKind,
}

impl ModuleConfig {
    pub fn is_native(&self) -> bool {
        matches!(self.kind, ModuleKind::Native(_))
    }

    pub fn as_native(&self) -> Option<&NativeModuleConfig> {
        match &self.kind {
            ModuleKind::Native(native) => Some(native),
            ModuleKind::Derived(_) => None,
        }
    }

    pub fn as_derived(&self) -> Option<&DerivedModuleConfig> {
        match &self.kind {
            ModuleKind::Derived(derived) => Some(derived),
            ModuleKind::Native(_) => None,
        }
    }
}

/// Everything that can go wrong while parsing or resolving a module
/// config file. Variants carry the source line number where the parser
/// has one; resolution errors (derived-module chaining, type mismatches)
/// don't have a line to point at.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{path}:{line}: expected ']' to end section line")]
    UnterminatedSection { path: String, line: usize },

    #[error("{path}:{line}: duplicate module declaration")]
    DuplicateModuleDeclaration { path: String, line: usize },

    #[error("{path}:{line}: section '{section}' requires a NativeModule")]
    SectionRequiresNative { path: String, line: usize, section: String },

    #[error("{path}:{line}: invalid section '{section}'")]
    InvalidSection { path: String, line: usize, section: String },

    #[error("{path}:{line}: invalid line, expected 'key = value'")]
    MissingEquals { path: String, line: usize },

    #[error("{path}:{line}: key '{key}' outside any section")]
    KeyOutsideSection { path: String, line: usize, key: String },

    #[error("{path}:{line}: invalid key '{key}' for section '{section}'")]
    InvalidKey { path: String, line: usize, key: String, section: String },

    #[error("{path}:{line}: invalid type '{type_name}'")]
    InvalidArgumentType { path: String, line: usize, type_name: String },

    #[error("{path}:{line}: nested lists are not allowed")]
    NestedList { path: String, line: usize },

    #[error("{path}:{line}: unknown argument '{key}'")]
    UnknownArgument { path: String, line: usize, key: String },

    #[error("{path}:{line}: value for '{key}' does not match its declared type")]
    TypeMismatch { path: String, line: usize, key: String },

    #[error("{path}: DerivedModule needs a Base")]
    DerivedModuleMissingBase { path: String },

    #[error("{path}: base module '{base}' is itself a DerivedModule; only one level of derivation is allowed")]
    ChainedDerivation { path: String, base: String },

    #[error("{path}: base module '{base}' not found")]
    BaseModuleNotFound { path: String, base: String },

    #[error("{path}: {source}")]
    Io { path: String, source: std::sync::Arc<std::io::Error> },
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
