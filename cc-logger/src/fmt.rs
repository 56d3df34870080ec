// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Console line layout: `HH:MM:SS.mmm target (pid tid): LEVEL: message`

use crate::entry::Entry;
use cc_log::Level;
use console::{style, Color, StyledObject};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::SystemTime;
use time::format_description::FormatItem;
use time::macros::format_description;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour]:[minute]:[second].[subsecond digits:3]");

/// Column widths grow to the widest value seen so far so lines stay aligned.
struct Columns {
    target: AtomicUsize,
    pid: AtomicUsize,
    tid: AtomicUsize,
}

static COLUMNS: Columns = Columns {
    target: AtomicUsize::new(16),
    pid: AtomicUsize::new(4),
    tid: AtomicUsize::new(4),
};

fn widen(column: &AtomicUsize, len: usize) -> usize {
    column.fetch_max(len, Ordering::Relaxed).max(len)
}

/// Write `entry` as one line.
pub fn format<W: io::Write>(entry: &Entry, mut writer: W) -> io::Result<()> {
    let timestamp = format_timestamp(entry.at);
    let level = style(entry.level).bold().fg(level_color(entry.level));

    let width = widen(&COLUMNS.target, entry.target.len());
    let target = style(format!("{:<width$}", entry.target)).fg(text_color(entry.target));

    let pid = format_id(entry.origin.pid, &COLUMNS.pid, Alignment::Left);
    let tid = format_id(entry.origin.tid, &COLUMNS.tid, Alignment::Right);

    write!(writer, "{timestamp} {target} ({pid} {tid}): {level:<5}: ")?;
    if entry.level == Level::Trace {
        let (file, line) = entry.location.unwrap_or(("<unknown>", 0));
        write!(writer, "{}:{line}: ", style(file).fg(text_color(file)))?;
    }
    writeln!(writer, "{}", entry.message)
}

/// Format `timestamp` as UTC wall clock time. Times before the epoch print as `--:--:--.---`.
fn format_timestamp(timestamp: SystemTime) -> String {
    timestamp
        .duration_since(SystemTime::UNIX_EPOCH)
        .ok()
        .and_then(|since_epoch| {
            time::OffsetDateTime::from_unix_timestamp_nanos(since_epoch.as_nanos() as i128).ok()
        })
        .and_then(|t| t.format(TIMESTAMP_FORMAT).ok())
        .unwrap_or_else(|| "--:--:--.---".to_string())
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Color256(243),
        Level::Trace => Color::White,
    }
}

/// Stable color for a target or file name.
fn text_color(text: &str) -> Color {
    Color::Color256(text.bytes().fold(42u8, |c, x| c ^ x))
}

/// Stable color for a process or thread id. Skips the darkest palette entries.
fn id_color(id: u32) -> Color {
    let color = match id as u8 {
        c @ 0..=1 => c + 2,
        c @ 16..=21 => c + 6,
        c @ 232..=240 => c + 9,
        c => c,
    };
    Color::Color256(color)
}

enum Alignment {
    Left,
    Right,
}

/// Hex `id` padded to the widest id seen in `column`.
fn format_id(id: u32, column: &AtomicUsize, alignment: Alignment) -> StyledObject<String> {
    let width = widen(column, num_hex_digits(id));
    let text = match alignment {
        Alignment::Left => format!("{id:<width$x}"),
        Alignment::Right => format!("{id:>width$x}"),
    };
    style(text).fg(id_color(id))
}

/// Number of hex digits needed to print `n`.
fn num_hex_digits(n: u32) -> usize {
    (1 + n.checked_ilog2().unwrap_or_default() / 4) as usize
}
