// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn argv(words: &[&str]) -> Vec<String> {
    words.iter().map(|s| s.to_string()).collect()
}

#[test]
fn uprocctl_run_parses_module_and_args() {
    match parse(&argv(&["uprocctl", "run", "echomod", "foo", "bar"])).unwrap() {
        Invocation::Run { module, args } => {
            assert_eq!(module.as_str(), "echomod");
            assert_eq!(args, vec!["foo".to_string(), "bar".to_string()]);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn uprocctl_status_parses_module() {
    match parse(&argv(&["uprocctl", "status", "echomod"])).unwrap() {
        Invocation::Status { module } => assert_eq!(module.as_str(), "echomod"),
        _ => panic!("expected Status"),
    }
}

#[test]
fn uprocctl_bare_help() {
    assert!(matches!(parse(&argv(&["uprocctl", "-h"])).unwrap(), Invocation::Help));
}

#[test]
fn uprocctl_run_help() {
    assert!(matches!(parse(&argv(&["uprocctl", "run", "-h"])).unwrap(), Invocation::RunHelp));
}

#[test]
fn u_alias_parses_module_and_args() {
    match parse(&argv(&["u", "echomod", "foo"])).unwrap() {
        Invocation::Run { module, args } => {
            assert_eq!(module.as_str(), "echomod");
            assert_eq!(args, vec!["foo".to_string()]);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn u_alias_with_no_module_errors() {
    assert!(parse(&argv(&["u"])).is_err());
}

#[test]
fn symlink_shorthand_parses_module_from_basename() {
    match parse(&argv(&["/usr/bin/uechomod", "foo", "bar"])).unwrap() {
        Invocation::Run { module, args } => {
            assert_eq!(module.as_str(), "echomod");
            assert_eq!(args, vec!["foo".to_string(), "bar".to_string()]);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn symlink_shorthand_help() {
    assert!(matches!(parse(&argv(&["uechomod", "-h"])).unwrap(), Invocation::RunHelp));
}

#[test]
fn unknown_invocation_rejected() {
    assert!(parse(&argv(&["python3"])).is_err());
}

#[test]
fn uprocctl_unknown_subcommand_rejected() {
    assert!(parse(&argv(&["uprocctl", "frobnicate"])).is_err());
}
