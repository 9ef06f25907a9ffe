// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_minimal_native_module() {
    let text = "[NativeModule]\nProcessName = echo\nNativeLib = libecho.so\n";
    let cfg = parse_module_config_str(text, "echo.updmod").unwrap();
    assert_eq!(cfg.process_name.as_deref(), Some("echo"));
    assert_eq!(cfg.as_native().unwrap().native_lib, "libecho.so");
}

#[test]
fn parses_arguments_and_defaults() {
    let text = "\
[NativeModule]
NativeLib = libpython.so

[Arguments]
Workers = number
Paths = list string

[Defaults]
Workers = 4
Paths = /usr/bin /usr/local/bin
";
    let cfg = parse_module_config_str(text, "python.updmod").unwrap();
    let native = cfg.as_native().unwrap();
    assert_eq!(native.arguments.get("Workers"), Some(&ArgumentType::Scalar(ScalarKind::Number)));
    assert_eq!(native.arguments.get("Paths"), Some(&ArgumentType::List(ScalarKind::String)));
    assert_eq!(native.values.get("Workers"), Some(&ConfigValue::Scalar(ConfigScalar::Number(4.0))));
    assert_eq!(
        native.values.get("Paths"),
        Some(&ConfigValue::List(vec![
            ConfigScalar::String("/usr/bin".to_string()),
            ConfigScalar::String("/usr/local/bin".to_string()),
        ]))
    );
}

#[test]
fn parses_derived_module_overlay() {
    let text = "[DerivedModule]\nBase = python\nWorkers = 8\n";
    let cfg = parse_module_config_str(text, "python-big.updmod").unwrap();
    let derived = cfg.as_derived().unwrap();
    assert_eq!(derived.base, "python");
    assert_eq!(derived.value_overlay.get("Workers"), Some(&"8".to_string()));
}

#[test]
fn rejects_derived_without_base() {
    let text = "[DerivedModule]\nWorkers = 8\n";
    let err = parse_module_config_str(text, "bad.updmod").unwrap_err();
    assert!(matches!(err, ConfigError::DerivedModuleMissingBase { .. }));
}

#[test]
fn rejects_duplicate_module_declaration() {
    let text = "[NativeModule]\nNativeLib = a.so\n[DerivedModule]\nBase = a\n";
    let err = parse_module_config_str(text, "bad.updmod").unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateModuleDeclaration { .. }));
}

#[test]
fn rejects_arguments_section_on_derived_module() {
    let text = "[DerivedModule]\nBase = python\n[Arguments]\nWorkers = number\n";
    let err = parse_module_config_str(text, "bad.updmod").unwrap_err();
    assert!(matches!(err, ConfigError::SectionRequiresNative { .. }));
}

#[test]
fn rejects_nested_list_type() {
    let text = "[NativeModule]\nNativeLib = a.so\n[Arguments]\nPaths = list list string\n";
    let err = parse_module_config_str(text, "bad.updmod").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidArgumentType { .. }));
}

#[test]
fn rejects_key_before_any_section() {
    let text = "ProcessName = echo\n";
    let err = parse_module_config_str(text, "bad.updmod").unwrap_err();
    assert!(matches!(err, ConfigError::KeyOutsideSection { .. }));
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let text = "# a comment\n\n[NativeModule]\n# another comment\nNativeLib = a.so\n";
    let cfg = parse_module_config_str(text, "ok.updmod").unwrap();
    assert_eq!(cfg.as_native().unwrap().native_lib, "a.so");
}

#[test]
fn continuation_lines_clamp_to_first_indent() {
    // first continuation line has 2-space indent (the baseline); the
    // second has 4, so only 2 are stripped and it keeps 2 of its own.
    let text = "[NativeModule]\nNativeLib = a.so\nDescription = first\n  second\n    third\n";
    let cfg = parse_module_config_str(text, "ok.updmod").unwrap();
    assert_eq!(cfg.description.as_deref(), Some("first\nsecond\n  third"));
}
