// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives the real `echomod` binary over its actual socket, grounding
//! the "Identity echo" scenario: a `Run` call with `argv = ["foo",
//! "bar"]` against a module configured `ProcessName = echo` should
//! produce a worker whose title is `"echo"` and whose stdout is exactly
//! what `/bin/echo foo bar` would print.

use std::fs::File;
use std::os::fd::AsRawFd;
use std::os::unix::net::UnixStream;
use std::process::{Child, Command};
use std::time::Duration;

use indexmap::IndexMap;
use serial_test::serial;
use uprocd_protocol::{decode, encode, recv_with_fds, send_with_fds, Request, Response};

struct Daemon {
    child: Child,
    socket_path: std::path::PathBuf,
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn spawn_echomod(state_dir: &std::path::Path, config_home: &std::path::Path) -> Daemon {
    let modules_dir = config_home.join("uprocd/modules");
    std::fs::create_dir_all(&modules_dir).unwrap();
    let updmod = include_str!("../echomod.updmod");
    std::fs::write(modules_dir.join("echomod.updmod"), updmod).unwrap();

    let socket_path = state_dir.join("echomod.sock");

    let child = Command::new(env!("CARGO_BIN_EXE_echomod"))
        .arg("+")
        .arg("echomod")
        .env("UPROCD_STATE_DIR", state_dir)
        .env("XDG_CONFIG_HOME", config_home)
        .env("RUST_LOG", "warn")
        .spawn()
        .unwrap();

    for _ in 0..50 {
        if socket_path.exists() {
            break;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    Daemon { child, socket_path }
}

/// Waits for `pid` to stop existing, i.e. the worker `echo` process
/// running to completion. Polling `/proc` is the only option available
/// to a process that isn't the worker's parent (the daemon is).
fn wait_for_exit(pid: i32) {
    let path = format!("/proc/{pid}");
    for _ in 0..100 {
        if !std::path::Path::new(&path).exists() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("worker {pid} did not exit within 2s");
}

#[test]
#[serial]
fn identity_echo_execs_echo_with_the_callers_argv() {
    let state_dir = tempfile::tempdir().unwrap();
    let config_home = tempfile::tempdir().unwrap();
    let daemon = spawn_echomod(state_dir.path(), config_home.path());

    let stdout_path = state_dir.path().join("worker.out");
    let stdout_file = File::create(&stdout_path).unwrap();
    let devnull_in = File::open("/dev/null").unwrap();
    let devnull_err = File::open("/dev/null").unwrap();

    let stream = UnixStream::connect(&daemon.socket_path).expect("connect to echomod");
    let request = Request::Run {
        env: IndexMap::new(),
        argv: vec!["foo".to_string(), "bar".to_string()],
        cwd: std::env::current_dir().unwrap(),
        driver_pid: std::process::id(),
    };
    let fds = [devnull_in.as_raw_fd(), stdout_file.as_raw_fd(), devnull_err.as_raw_fd()];
    send_with_fds(&stream, &encode(&request).unwrap(), &fds).unwrap();

    let (payload, _fds) = recv_with_fds(&stream, 0).unwrap();
    let response: Response = decode(&payload).unwrap();
    let (worker_pid, title) = match response {
        Response::Run { worker_pid, title } => (worker_pid, title),
        other => panic!("expected Run, got {other:?}"),
    };
    assert_eq!(title, "echo");

    wait_for_exit(worker_pid);

    let output = std::fs::read_to_string(&stdout_path).unwrap();
    assert_eq!(output, "foo bar\n");
}
