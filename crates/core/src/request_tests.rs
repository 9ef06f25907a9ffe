// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn req(env: Vec<(&str, &str)>, argv: Vec<&str>) -> RunRequest {
    RunRequest::new(
        env.into_iter().map(|(k, v)| (k.to_string(), v.to_string())),
        argv.into_iter().map(String::from).collect(),
        PathBuf::from("/home/user"),
        [0, 1, 2],
        4242,
    )
}

#[test]
fn duplicate_env_keys_last_wins() {
    let r = req(vec![("A", "1"), ("B", "2"), ("A", "3")], vec![]);
    assert_eq!(r.env_len(), 2);
    let pairs: Vec<_> = r.env().collect();
    assert_eq!(pairs, vec![("A", "3"), ("B", "2")]);
}

#[test]
fn empty_env_and_argv_allowed() {
    let r = req(vec![], vec![]);
    assert_eq!(r.env_len(), 0);
    assert!(r.argv.is_empty());
}

#[test]
fn worker_argv_prepends_title() {
    let r = req(vec![], vec!["foo", "bar"]);
    let ctx = RunContext::new(r, Title::new("echo"));
    assert_eq!(ctx.worker_argv(), vec!["echo", "foo", "bar"]);
}

#[test]
fn worker_argv_with_zero_args_is_just_title() {
    let r = req(vec![], vec![]);
    let ctx = RunContext::new(r, Title::new("echo"));
    assert_eq!(ctx.worker_argv(), vec!["echo"]);
}
