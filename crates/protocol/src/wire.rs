// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire format: 4-byte length prefix (big-endian) + JSON payload.

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Frames larger than this are rejected before any allocation happens,
/// so a corrupt or hostile peer can't make a reader allocate unbounded
/// memory from a forged length prefix.
pub const MAX_FRAME_LEN: u32 = 1 << 20;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("frame of {len} bytes exceeds the {MAX_FRAME_LEN} byte limit")]
    FrameTooLarge { len: u32 },

    #[error("expected {expected} file descriptor(s), received {got}")]
    FdCountMismatch { expected: usize, got: usize },

    #[error("peer sent a message with no ancillary file descriptors")]
    MissingFds,
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(value)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn write_message(stream: &mut impl Write, payload: &[u8]) -> Result<(), ProtocolError> {
    let len = u32::try_from(payload.len()).map_err(|_| ProtocolError::FrameTooLarge { len: u32::MAX })?;
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge { len });
    }
    stream.write_all(&len.to_be_bytes())?;
    stream.write_all(payload)?;
    Ok(())
}

pub fn read_message(stream: &mut impl Read) -> Result<Vec<u8>, ProtocolError> {
    let mut len_buf = [0u8; 4];
    stream.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge { len });
    }
    let mut buf = vec![0u8; len as usize];
    stream.read_exact(&mut buf)?;
    Ok(buf)
}

/// Encodes `value` and writes it as a single framed message.
pub fn write_frame<T: Serialize>(stream: &mut impl Write, value: &T) -> Result<(), ProtocolError> {
    write_message(stream, &encode(value)?)
}

/// Reads a single framed message and decodes it.
pub fn read_frame<T: DeserializeOwned>(stream: &mut impl Read) -> Result<T, ProtocolError> {
    decode(&read_message(stream)?)
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
