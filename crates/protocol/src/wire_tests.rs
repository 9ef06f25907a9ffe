// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Cursor;

#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
struct Sample {
    name: String,
    count: u32,
}

#[test]
fn frame_round_trips() {
    let sample = Sample { name: "echo".to_string(), count: 3 };
    let mut buf = Vec::new();
    write_frame(&mut buf, &sample).unwrap();

    let mut cursor = Cursor::new(buf);
    let decoded: Sample = read_frame(&mut cursor).unwrap();
    assert_eq!(decoded, sample);
}

#[test]
fn rejects_oversized_length_prefix() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&(MAX_FRAME_LEN + 1).to_be_bytes());
    let mut cursor = Cursor::new(buf);
    let err = read_message(&mut cursor).unwrap_err();
    assert!(matches!(err, ProtocolError::FrameTooLarge { .. }));
}

#[test]
fn truncated_stream_is_an_error() {
    let mut cursor = Cursor::new(vec![0u8, 0, 0, 5, b'h', b'i']);
    let err = read_message(&mut cursor).unwrap_err();
    assert!(matches!(err, ProtocolError::Io(_)));
}
