// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Passes file descriptors alongside a framed message over a Unix
//! domain socket, the literal equivalent of a D-Bus `(hhh)` signature.
//! A received descriptor is always a fresh duplicate owned by the
//! receiver; the sender's copy is unaffected and closed independently.

use std::io::{IoSlice, IoSliceMut};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::os::unix::net::UnixStream;

use nix::sys::socket::{self, ControlMessage, ControlMessageOwned, MsgFlags};

use crate::wire::{ProtocolError, MAX_FRAME_LEN};

/// The most file descriptors any message in this protocol ever carries
/// (`Run`'s three stdio streams).
const MAX_FDS: usize = 3;

pub fn send_with_fds(stream: &UnixStream, payload: &[u8], fds: &[RawFd]) -> Result<(), ProtocolError> {
    let len = u32::try_from(payload.len()).map_err(|_| ProtocolError::FrameTooLarge { len: u32::MAX })?;
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge { len });
    }

    let mut framed = Vec::with_capacity(4 + payload.len());
    framed.extend_from_slice(&len.to_be_bytes());
    framed.extend_from_slice(payload);

    let iov = [IoSlice::new(&framed)];
    let cmsgs = if fds.is_empty() { Vec::new() } else { vec![ControlMessage::ScmRights(fds)] };

    socket::sendmsg::<()>(stream.as_raw_fd(), &iov, &cmsgs, MsgFlags::empty(), None)
        .map_err(std::io::Error::from)?;
    Ok(())
}

/// Receives one framed message plus up to [`MAX_FDS`] ancillary
/// descriptors. Returns an error if the message carries more
/// descriptors than expected, or if `expect_fds` is non-zero and none
/// arrived.
pub fn recv_with_fds(stream: &UnixStream, expect_fds: usize) -> Result<(Vec<u8>, Vec<OwnedFd>), ProtocolError> {
    debug_assert!(expect_fds <= MAX_FDS);

    let mut buf = vec![0u8; MAX_FRAME_LEN as usize + 4];
    let mut iov = [IoSliceMut::new(&mut buf)];
    let mut cmsg_space = nix::cmsg_space!([RawFd; MAX_FDS]);

    let msg = socket::recvmsg::<()>(stream.as_raw_fd(), &mut iov, Some(&mut cmsg_space), MsgFlags::empty())
        .map_err(std::io::Error::from)?;

    let mut received_fds = Vec::new();
    for cmsg in msg.cmsgs() {
        if let ControlMessageOwned::ScmRights(raw_fds) = cmsg {
            for fd in raw_fds {
                // SAFETY: the kernel just handed us ownership of this
                // descriptor via SCM_RIGHTS; nothing else in this
                // process holds it yet.
                received_fds.push(unsafe { OwnedFd::from_raw_fd(fd) });
            }
        }
    }

    if expect_fds > 0 && received_fds.len() != expect_fds {
        return Err(ProtocolError::FdCountMismatch { expected: expect_fds, got: received_fds.len() });
    }

    let total_len = msg.bytes;
    if total_len < 4 {
        return Err(ProtocolError::Io(std::io::Error::from(std::io::ErrorKind::UnexpectedEof)));
    }
    #[allow(clippy::expect_used)]
    let declared_len = u32::from_be_bytes(buf[0..4].try_into().expect("checked length above")) as usize;
    let body = &buf[4..total_len];
    if declared_len != body.len() {
        return Err(ProtocolError::Io(std::io::Error::from(std::io::ErrorKind::InvalidData)));
    }

    Ok((body.to_vec(), received_fds))
}

#[cfg(test)]
#[path = "fds_tests.rs"]
mod tests;
