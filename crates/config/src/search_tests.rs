// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn finds_flat_and_nested_layout() {
    let dir = tempfile::tempdir().unwrap();
    // SAFETY: `#[serial]` keeps every test in this file single-threaded.
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", dir.path());
    }
    let root = dir.path().join("uprocd/modules");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("echo.updmod"), "[NativeModule]\n").unwrap();

    let module = ModuleName::new("echo").unwrap();
    let found = find_module_config(&module);
    assert_eq!(found, Some(root.join("echo.updmod")));

    unsafe {
        std::env::remove_var("XDG_CONFIG_HOME");
    }
}

#[test]
#[serial]
fn prefers_flat_over_nested() {
    let dir = tempfile::tempdir().unwrap();
    // SAFETY: `#[serial]` keeps every test in this file single-threaded.
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", dir.path());
    }
    let root = dir.path().join("uprocd/modules");
    std::fs::create_dir_all(root.join("python")).unwrap();
    std::fs::write(root.join("python.updmod"), "[NativeModule]\n").unwrap();
    std::fs::write(root.join("python/python.updmod"), "[NativeModule]\n").unwrap();

    let module = ModuleName::new("python").unwrap();
    assert_eq!(find_module_config(&module), Some(root.join("python.updmod")));

    unsafe {
        std::env::remove_var("XDG_CONFIG_HOME");
    }
}

#[test]
#[serial]
fn returns_none_when_not_found() {
    let dir = tempfile::tempdir().unwrap();
    // SAFETY: `#[serial]` keeps every test in this file single-threaded.
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", dir.path());
    }
    let module = ModuleName::new("nonexistent").unwrap();
    assert_eq!(find_module_config(&module), None);
    unsafe {
        std::env::remove_var("XDG_CONFIG_HOME");
    }
}
