// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

/// The type of a thread id
pub type ThreadId = u32;

/// Get the current thread id
#[cfg(target_os = "linux")]
pub fn id() -> ThreadId {
    // Safety: gettid(2) says this never fails
    unsafe { libc::gettid() as u32 }
}

/// Get the current thread id. Falls back to the process id where `gettid` is unavailable.
#[cfg(not(target_os = "linux"))]
pub fn id() -> ThreadId {
    std::process::id()
}
