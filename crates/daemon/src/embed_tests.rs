// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use indexmap::IndexMap;
use uprocd_config::ResolvedModuleConfig;
use uprocd_core::ModuleName;

use super::*;

fn state_with(values: IndexMap<String, ConfigValue>) -> GlobalState {
    let resolved = ResolvedModuleConfig {
        process_name: None,
        description: None,
        native_lib: "libecho.so".to_string(),
        arguments: IndexMap::new(),
        values,
    };
    GlobalState::new(ModuleName::new("echo").unwrap(), PathBuf::from("/modules/echo"), resolved)
}

#[test]
fn absent_key_reports_minus_one_and_empty_scalars() {
    let state = state_with(IndexMap::new());
    assert!(!config_present(&state, "Missing"));
    assert_eq!(config_list_size(&state, "Missing"), -1);
    assert_eq!(config_string(&state, "Missing"), "");
    assert_eq!(config_number(&state, "Missing"), 0.0);
}

#[test]
fn scalar_values_read_back_and_report_list_size_one() {
    let mut values = IndexMap::new();
    values.insert("Greeting".to_string(), ConfigValue::Scalar(ConfigScalar::String("hi".to_string())));
    values.insert("Workers".to_string(), ConfigValue::Scalar(ConfigScalar::Number(4.0)));
    let state = state_with(values);

    assert!(config_present(&state, "Greeting"));
    assert_eq!(config_list_size(&state, "Greeting"), 1);
    assert_eq!(config_string(&state, "Greeting"), "hi");
    assert_eq!(config_number(&state, "Workers"), 4.0);
    // wrong-type reads return the zero value, not a panic.
    assert_eq!(config_number(&state, "Greeting"), 0.0);
    assert_eq!(config_string(&state, "Workers"), "");
}

#[test]
fn list_values_read_back_by_index() {
    let mut values = IndexMap::new();
    values.insert(
        "Paths".to_string(),
        ConfigValue::List(vec![ConfigScalar::String("/a".to_string()), ConfigScalar::String("/b".to_string())]),
    );
    let state = state_with(values);

    assert_eq!(config_list_size(&state, "Paths"), 2);
    assert_eq!(config_string_at(&state, "Paths", 0), "/a");
    assert_eq!(config_string_at(&state, "Paths", 1), "/b");
    assert_eq!(config_string_at(&state, "Paths", 2), "");
}

#[test]
fn module_path_joins_onto_module_directory() {
    let state = state_with(IndexMap::new());
    assert_eq!(module_directory(&state), Path::new("/modules/echo"));
    assert_eq!(module_path(&state, "libecho.so"), PathBuf::from("/modules/echo/libecho.so"));
}
