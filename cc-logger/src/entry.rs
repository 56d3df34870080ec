// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

use crate::{fmt, thread};
use cc_log::Level;
use std::io;
use std::process;
use std::time::SystemTime;

/// Process and thread a message was logged from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub pid: u32,
    pub tid: u32,
}

impl Origin {
    /// Origin of the calling thread
    pub fn current() -> Self {
        Self {
            pid: process::id(),
            tid: thread::id(),
        }
    }
}

/// One formatted message, borrowing from the `log` record it was captured from.
#[derive(Debug)]
pub struct Entry<'a> {
    pub at: SystemTime,
    pub level: Level,
    pub target: &'a str,
    /// File and line, if the macro call site is known
    pub location: Option<(&'a str, u32)>,
    pub origin: Origin,
    pub message: &'a str,
}

impl<'a> Entry<'a> {
    /// Capture `record` now, on the calling thread, with its arguments already rendered into `message`.
    pub fn capture(record: &cc_log::Record<'a>, message: &'a str) -> Self {
        Self {
            at: SystemTime::now(),
            level: record.level(),
            target: record.target(),
            location: record.file().zip(record.line()),
            origin: Origin::current(),
            message,
        }
    }
}

/// Where entries go. Errors and warnings use stderr, everything else stdout.
#[derive(Debug, Default)]
pub struct Console;

impl Console {
    pub fn write(&self, entry: &Entry) -> io::Result<()> {
        match entry.level {
            Level::Error | Level::Warn => fmt::format(entry, io::stderr().lock()),
            _ => fmt::format(entry, io::stdout().lock()),
        }
    }

    pub fn flush(&self) {
        use std::io::Write;
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
    }
}
