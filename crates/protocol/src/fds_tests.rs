// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::os::fd::AsRawFd;
use std::os::unix::net::UnixStream;

#[test]
fn sends_and_receives_payload_with_fds() {
    let (a, b) = UnixStream::pair().unwrap();
    let devnull = std::fs::File::open("/dev/null").unwrap();

    send_with_fds(&a, b"hello", &[devnull.as_raw_fd()]).unwrap();
    let (payload, fds) = recv_with_fds(&b, 1).unwrap();

    assert_eq!(payload, b"hello");
    assert_eq!(fds.len(), 1);
}

#[test]
fn sends_and_receives_payload_without_fds() {
    let (a, b) = UnixStream::pair().unwrap();
    send_with_fds(&a, b"no fds here", &[]).unwrap();
    let (payload, fds) = recv_with_fds(&b, 0).unwrap();

    assert_eq!(payload, b"no fds here");
    assert!(fds.is_empty());
}

#[test]
fn fd_count_mismatch_is_an_error() {
    let (a, b) = UnixStream::pair().unwrap();
    send_with_fds(&a, b"hello", &[]).unwrap();
    let err = recv_with_fds(&b, 3).unwrap_err();
    assert!(matches!(err, ProtocolError::FdCountMismatch { expected: 3, got: 0 }));
}
