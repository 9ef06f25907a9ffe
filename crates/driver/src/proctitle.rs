// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort process-title rename: `prctl(PR_SET_NAME)` for the short
//! `/proc/<pid>/comm` name plus an in-place rewrite of the live argv
//! buffer, so both `ps -o comm` and `ps -o args`/`/proc/<pid>/cmdline`
//! show the worker's title the way `spec.md` §4.4 step 4 requires
//! (`prctl(PR_SET_NAME)` / `argv[0]` overwrite). This is the Rust
//! equivalent of `setproctitle()`, declared in
//! `examples/original_source/src/common/common.h` and used by
//! `uprocctl`'s original `main.c`; hand-rolled here the way
//! `examples/other_examples/.../daemon-src-lib.rs.rs`'s own `proctitle`
//! module is, rather than adding a dependency for one call site.
//!
//! The argv/envp buffer is captured by a constructor that runs before
//! `main` via `.init_array` — the same hook libc itself uses for static
//! initializers — because by the time Rust's runtime calls `main`, the
//! only argv `std::env::args()` hands back are copies, not the live
//! buffer `ps` actually reads out of the process's memory.

use std::os::raw::{c_char, c_int};
use std::sync::atomic::{AtomicUsize, Ordering};

static ARGV_START: AtomicUsize = AtomicUsize::new(0);
static ARGV_LEN: AtomicUsize = AtomicUsize::new(0);

#[used]
#[link_section = ".init_array"]
static CAPTURE_ARGV: extern "C" fn(c_int, *const *const c_char, *const *const c_char) = capture_argv;

extern "C" fn capture_argv(argc: c_int, argv: *const *const c_char, envp: *const *const c_char) {
    if argv.is_null() || argc <= 0 {
        return;
    }

    // SAFETY: argv/envp point at the kernel-provided, NUL-terminated
    // string vectors handed to the process at exec; the strings they
    // point to are contiguous in memory through envp's last entry,
    // which is the assumption every `setproctitle(3)` implementation on
    // Linux makes. This constructor runs once, before any other code
    // (including Rust's own runtime init) has touched that memory.
    unsafe {
        let first = *argv as usize;
        if first == 0 {
            return;
        }

        let mut end = first;
        let mut i: isize = 0;
        loop {
            let p = *argv.offset(i);
            if p.is_null() {
                break;
            }
            end = end.max(p as usize + libc::strlen(p) + 1);
            i += 1;
        }

        if !envp.is_null() {
            i = 0;
            loop {
                let p = *envp.offset(i);
                if p.is_null() {
                    break;
                }
                end = end.max(p as usize + libc::strlen(p) + 1);
                i += 1;
            }
        }

        ARGV_START.store(first, Ordering::Relaxed);
        ARGV_LEN.store(end.saturating_sub(first), Ordering::Relaxed);
    }
}

/// Renames the current process to `title`, both its short comm name and
/// (best-effort) its full command line.
pub fn set(title: &str) {
    set_comm(title);
    set_argv(title);
}

fn set_comm(title: &str) {
    let mut buf = [0u8; 16];
    let bytes = title.as_bytes();
    let n = bytes.len().min(buf.len() - 1);
    buf[..n].copy_from_slice(&bytes[..n]);

    // SAFETY: PR_SET_NAME reads at most 16 bytes from the pointer; `buf`
    // is exactly that size and nul-terminated by its zero init.
    let rc = unsafe { libc::prctl(libc::PR_SET_NAME, buf.as_ptr() as libc::c_ulong, 0, 0, 0) };
    if rc != 0 {
        tracing::debug!(error = %std::io::Error::last_os_error(), "PR_SET_NAME failed");
    }
}

fn set_argv(title: &str) {
    let start = ARGV_START.load(Ordering::Relaxed);
    let len = ARGV_LEN.load(Ordering::Relaxed);
    if start == 0 || len == 0 {
        return;
    }

    let bytes = title.as_bytes();
    let n = bytes.len().min(len.saturating_sub(1));

    // SAFETY: `start..start+len` was computed from the live argv/envp
    // strings at process startup by `capture_argv` and stays mapped for
    // the life of the process; writing within that span and
    // nul-terminating before its end never touches memory outside it.
    unsafe {
        let ptr = start as *mut u8;
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, n);
        std::ptr::write_bytes(ptr.add(n), 0, len - n);
    }
}
