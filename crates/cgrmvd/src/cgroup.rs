// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Moves a process between cgroup hierarchies by writing its pid into
//! another process's cgroup files, mirroring `move_cgroups` and
//! `parse_cgroup_path` in
//! `examples/original_source/src/cgrmvd/cgrmvd.c`.

use std::path::Path;

use nix::unistd::{access, AccessFlags};

use crate::error::CgrmvdError;

/// Parses one `/proc/<pid>/cgroup` line (`hierarchy-id:controller-list:path`)
/// into the absolute cgroupfs path it names. `name=` prefixes (named,
/// non-controller hierarchies) are stripped; an empty controller list
/// names the unified (cgroup v2) hierarchy.
fn parse_cgroup_line(line: &str) -> Option<String> {
    let mut parts = line.splitn(3, ':');
    let _hierarchy_id = parts.next()?;
    let mut controllers = parts.next()?;
    let path = parts.next()?;

    if let Some(stripped) = controllers.strip_prefix("name=") {
        controllers = stripped;
    }
    let controllers = if controllers.is_empty() { "unified" } else { controllers };

    let mut full = format!("/sys/fs/cgroup/{controllers}{path}");
    if full.ends_with('/') {
        full.pop();
    }
    Some(full)
}

/// Moves `copier_pid` into every cgroup hierarchy `origin_pid` belongs
/// to, skipping any hierarchy the two already share. Stops at the
/// shorter of the two `/proc/.../cgroup` files, matching the original's
/// lockstep read of both.
pub fn move_into_cgroups(copier_pid: i32, origin_pid: i32) -> Result<(), CgrmvdError> {
    let copier_cgroup = std::fs::read_to_string(format!("/proc/{copier_pid}/cgroup"))?;
    let origin_cgroup = std::fs::read_to_string(format!("/proc/{origin_pid}/cgroup"))?;

    for (copier_line, origin_line) in copier_cgroup.lines().zip(origin_cgroup.lines()) {
        let (Some(copier_path), Some(origin_path)) =
            (parse_cgroup_line(copier_line), parse_cgroup_line(origin_line))
        else {
            continue;
        };

        if copier_path == origin_path {
            continue;
        }

        write_pid_into(&origin_path, copier_pid)?;
    }

    Ok(())
}

/// Writes `pid` to whichever of `<cgroup>/tasks` or
/// `<cgroup>/cgroup.procs` is writable; cgroup v1 hierarchies only have
/// the former for some controllers, v2 only has the latter.
fn write_pid_into(cgroup_path: &str, pid: i32) -> Result<(), CgrmvdError> {
    for file_name in ["tasks", "cgroup.procs"] {
        let target = format!("{cgroup_path}/{file_name}");
        if access(Path::new(&target), AccessFlags::W_OK).is_ok() {
            std::fs::write(&target, format!("{pid}\n"))?;
            return Ok(());
        }
    }

    Err(CgrmvdError::PolicyDenied(format!(
        "neither {cgroup_path}/tasks nor {cgroup_path}/cgroup.procs is writable"
    )))
}

#[cfg(test)]
#[path = "cgroup_tests.rs"]
mod tests;
