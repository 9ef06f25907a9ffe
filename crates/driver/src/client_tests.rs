// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Read;
use std::os::unix::net::UnixListener;
use std::path::PathBuf;

use serial_test::serial;
use uprocd_protocol::{decode, encode, recv_with_fds, send_with_fds, Request, Response};

use super::*;

/// Points `UPROCD_STATE_DIR` at a fresh temp dir and binds a module
/// socket there, standing in for a real daemon for exactly one request.
fn fake_daemon(tmp: &std::path::Path, module: &ModuleName) -> UnixListener {
    // SAFETY: `#[serial]` on every test in this file keeps this single-threaded.
    unsafe {
        std::env::set_var("UPROCD_STATE_DIR", tmp);
    }
    let path = env::socket_path(tmp, module);
    UnixListener::bind(&path).unwrap()
}

#[test]
#[serial]
fn status_round_trips_through_the_socket() {
    let tmp = tempfile::tempdir().unwrap();
    let module = ModuleName::new("echomod").unwrap();
    let listener = fake_daemon(tmp.path(), &module);

    let server = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let (payload, _fds) = recv_with_fds(&stream, 0).unwrap();
        let request: Request = decode(&payload).unwrap();
        assert!(matches!(request, Request::Status));
        let response = Response::Status { name: "echomod".to_string(), description: "<none>".to_string() };
        send_with_fds(&stream, &encode(&response).unwrap(), &[]).unwrap();
    });

    let (name, description) = status(&module).unwrap();
    assert_eq!(name, "echomod");
    assert_eq!(description, "<none>");
    server.join().unwrap();
}

#[test]
#[serial]
fn run_sends_env_argv_cwd_and_receives_worker_pid() {
    let tmp = tempfile::tempdir().unwrap();
    let module = ModuleName::new("echomod").unwrap();
    let listener = fake_daemon(tmp.path(), &module);

    let server = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let (payload, fds) = recv_with_fds(&stream, 3).unwrap();
        assert_eq!(fds.len(), 3);
        let request: Request = decode(&payload).unwrap();
        match request {
            Request::Run { argv, cwd, .. } => {
                assert_eq!(argv, vec!["foo".to_string(), "bar".to_string()]);
                assert_eq!(cwd, PathBuf::from("/tmp"));
            }
            _ => panic!("expected Run"),
        }
        let response = Response::Run { worker_pid: 4242, title: "echo".to_string() };
        send_with_fds(&stream, &encode(&response).unwrap(), &[]).unwrap();
    });

    let reply = run(&module, vec!["foo".to_string(), "bar".to_string()], PathBuf::from("/tmp")).unwrap();
    assert_eq!(reply.worker_pid, 4242);
    assert_eq!(reply.title, "echo");
    server.join().unwrap();
}

#[test]
#[serial]
fn service_unreachable_when_no_daemon_is_listening() {
    let tmp = tempfile::tempdir().unwrap();
    // SAFETY: `#[serial]` on every test in this file keeps this single-threaded.
    unsafe {
        std::env::set_var("UPROCD_STATE_DIR", tmp.path());
    }
    let module = ModuleName::new("nonexistent").unwrap();

    let err = status(&module).unwrap_err();
    assert!(matches!(err, DriverError::ServiceUnreachable { .. }));
}

#[test]
#[serial]
fn remote_error_surfaces_as_remote_variant() {
    let tmp = tempfile::tempdir().unwrap();
    let module = ModuleName::new("echomod").unwrap();
    let listener = fake_daemon(tmp.path(), &module);

    let server = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut discard = [0u8; 0];
        let _ = stream.peek(&mut discard);
        let response = Response::Error { message: "denied".to_string() };
        send_with_fds(&stream, &encode(&response).unwrap(), &[]).unwrap();
    });

    let err = status(&module).unwrap_err();
    assert!(matches!(err, DriverError::Remote(msg) if msg == "denied"));
    server.join().unwrap();
}
