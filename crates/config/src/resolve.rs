// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves a `DerivedModule` against its base `NativeModule`: one hop,
//! inheriting the native library and the argument schema, overlaying
//! the derived module's own values on top of the base's defaults.

use indexmap::IndexMap;
use uprocd_core::config::{ArgumentType, ConfigValue, ModuleKind, NativeModuleConfig};
use uprocd_core::{ConfigError, ModuleConfig};

/// A module config with any `DerivedModule` indirection already resolved
/// away: always backed by a native library and a concrete value map.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModuleConfig {
    pub process_name: Option<String>,
    pub description: Option<String>,
    pub native_lib: String,
    pub arguments: IndexMap<String, ArgumentType>,
    pub values: IndexMap<String, ConfigValue>,
}

/// Resolves `config`, looking up its base module in `base` by name when
/// `config` is a `DerivedModule`. `base`, if given, must itself already
/// be a `NativeModule` — a base that is another `DerivedModule` is a
/// chained-derivation error.
pub fn resolve_module_config(
    path: &str,
    config: &ModuleConfig,
    base: Option<(&str, &ModuleConfig)>,
) -> Result<ResolvedModuleConfig, ConfigError> {
    match &config.kind {
        ModuleKind::Native(native) => Ok(ResolvedModuleConfig {
            process_name: config.process_name.clone(),
            description: config.description.clone(),
            native_lib: native.native_lib.clone(),
            arguments: native.arguments.clone(),
            values: native.values.clone(),
        }),
        ModuleKind::Derived(derived) => {
            let Some((base_name, base_config)) = base else {
                return Err(ConfigError::BaseModuleNotFound {
                    path: path.to_string(),
                    base: derived.base.clone(),
                });
            };

            let ModuleKind::Native(base_native) = &base_config.kind else {
                return Err(ConfigError::ChainedDerivation {
                    path: path.to_string(),
                    base: base_name.to_string(),
                });
            };

            let mut values = base_native.values.clone();
            for (key, raw) in &derived.value_overlay {
                let ty = *base_native.arguments.get(key).ok_or_else(|| ConfigError::UnknownArgument {
                    path: path.to_string(),
                    line: 0,
                    key: key.clone(),
                })?;
                let parsed = parse_overlay_value(raw, ty)
                    .ok_or_else(|| ConfigError::TypeMismatch { path: path.to_string(), line: 0, key: key.clone() })?;
                values.insert(key.clone(), parsed);
            }

            Ok(ResolvedModuleConfig {
                process_name: config.process_name.clone().or_else(|| base_config.process_name.clone()),
                description: config.description.clone().or_else(|| base_config.description.clone()),
                native_lib: base_native.native_lib.clone(),
                arguments: base_native.arguments.clone(),
                values,
            })
        }
    }
}

fn parse_overlay_value(raw: &str, ty: ArgumentType) -> Option<ConfigValue> {
    use uprocd_core::config::{ConfigScalar, ScalarKind};

    fn scalar(raw: &str, kind: ScalarKind) -> Option<ConfigScalar> {
        match kind {
            ScalarKind::String => Some(ConfigScalar::String(raw.to_string())),
            ScalarKind::Number => raw.parse::<f64>().ok().map(ConfigScalar::Number),
        }
    }

    match ty {
        ArgumentType::Scalar(kind) => scalar(raw, kind).map(ConfigValue::Scalar),
        ArgumentType::List(kind) => {
            raw.split_whitespace().map(|tok| scalar(tok, kind)).collect::<Option<Vec<_>>>().map(ConfigValue::List)
        }
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
