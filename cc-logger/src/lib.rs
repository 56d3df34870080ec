// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Console logger for the crazycar controller.
//!
//! The controller runs inside a simulator process, so the only sink is the
//! console of that process.

use cc_log::{LevelFilter, Log, Metadata, Record};
use entry::{Console, Entry};
use std::io::{self, Write};
use std::str::FromStr;

pub mod entry;
pub mod ffi;
pub mod fmt;
mod thread;

const ENV_RUST_LOG: &str = "RUST_LOG";
const MAX_ARGS_SIZE: usize = 8 * 1024;

/// Initialize the logger.
///
/// A valid level passed as `RUST_LOG` environment variable overrides `level`.
/// `console` enables output. Errors and warnings go to `stderr`, the rest to `stdout`.
///
/// Calling `init` more than once keeps the first logger. Only the level is updated.
pub fn init(level: LevelFilter, console: bool) {
    let logger = Logger::new(console);

    // Set the maximum log level the log subsystem will forward to this logger impl.
    cc_log::set_max_level(level_from_env().unwrap_or(level));
    // Set the logger in the global subsystem.
    if cc_log::set_boxed_logger(Box::new(logger)).is_err() {
        eprintln!("Logger already initialized, keeping the existing one");
    }
}

/// The crazycar logger.
#[derive(Debug)]
pub struct Logger {
    console: Option<Console>,
}

impl Logger {
    /// Create a new logger.
    pub fn new(console: bool) -> Self {
        let console = console.then(Console::default);
        Self { console }
    }
}

impl Log for Logger {
    /// Check if a log message with the specified metadata would be logged.
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= cc_log::max_level()
    }

    fn log(&self, record: &Record) {
        let Some(console) = &self.console else {
            return;
        };

        // Serialize args into a stack buffer. Messages longer than the buffer are truncated.
        let args_buffer = &mut [0u8; MAX_ARGS_SIZE];
        let args = {
            let mut writer = io::Cursor::new(&mut args_buffer[..]);
            let _ = write!(&mut writer, "{}", record.args());
            let len = writer.position() as usize;
            truncate_utf8(&args_buffer[0..len])
        };

        // A closed stdout must not take the simulator down.
        let _ = console.write(&Entry::capture(record, args));
    }

    fn flush(&self) {
        if let Some(console) = &self.console {
            console.flush();
        }
    }
}

/// Try to parse the log level from the environment variable `RUST_LOG`.
fn level_from_env() -> Option<LevelFilter> {
    std::env::var(ENV_RUST_LOG).ok().and_then(|s| {
        LevelFilter::from_str(&s)
            .inspect_err(|_| eprintln!("Failed to parse log level from `RUST_LOG={s}`"))
            .ok()
    })
}

/// Cut `bytes` back to the longest valid UTF-8 prefix.
fn truncate_utf8(bytes: &[u8]) -> &str {
    match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            // Safety: `valid_up_to` marks the end of a valid UTF-8 prefix.
            unsafe { std::str::from_utf8_unchecked(&bytes[..e.valid_up_to()]) }
        }
    }
}

#[cfg(test)]
mod test {
    use super::truncate_utf8;

    #[test]
    fn truncate_keeps_valid_prefix() {
        assert_eq!(truncate_utf8(b"abstand"), "abstand");
        let bytes = "vorne \u{00e4}".as_bytes();
        assert_eq!(truncate_utf8(&bytes[..bytes.len() - 1]), "vorne ");
        assert_eq!(truncate_utf8(b""), "");
    }
}
