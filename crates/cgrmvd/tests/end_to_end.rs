// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives the real `cgrmvd` binary over its actual socket. Uses the
//! caller's own pid as both copier and origin: their cgroup lines are
//! identical, so `move_into_cgroups` takes its "already in the same
//! cgroup" skip path for every hierarchy and never needs to write
//! anything, letting this run unprivileged and off real cgroupfs
//! contents.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::process::{Child, Command};
use std::time::Duration;

use serial_test::serial;

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

fn spawn_cgrmvd(tmp: &std::path::Path) -> Daemon {
    let socket_path = tmp.join("cgrmvd.sock");
    let lock_path = tmp.join("cgrmvd.pid");
    let policy_dir = tmp.join("policies");
    std::fs::create_dir_all(&policy_dir).unwrap();

    let self_exe = std::env::current_exe().unwrap();
    let self_exe = std::fs::canonicalize(&self_exe).unwrap();
    std::fs::write(policy_dir.join("test.policy"), format!("{} : {}\n", self_exe.display(), self_exe.display()))
        .unwrap();

    let child = Command::new(env!("CARGO_BIN_EXE_cgrmvd"))
        .env("UPROCD_CGRMVD_SOCKET", &socket_path)
        .env("UPROCD_CGRMVD_LOCK", &lock_path)
        .env("UPROCD_CGRMVD_POLICY_DIR", &policy_dir)
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

#[test]
#[serial]
fn move_cgroup_for_a_self_pair_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    let daemon = spawn_cgrmvd(tmp.path());

    let pid = std::process::id() as i32;
    let mut stream = UnixStream::connect(&daemon.socket_path).expect("connect to cgrmvd");

    let payload = serde_json::to_vec(&serde_json::json!({"type": "MoveCgroup", "copier_pid": pid, "origin_pid": pid}))
        .unwrap();
    let len = (payload.len() as u32).to_be_bytes();
    stream.write_all(&len).unwrap();
    stream.write_all(&payload).unwrap();

    let mut len_buf = [0u8; 4];
    stream.read_exact(&mut len_buf).unwrap();
    let len = u32::from_be_bytes(len_buf) as usize;
    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).unwrap();

    let response: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(response["type"], "Ok");
}
