// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

use log::{Level, LevelFilter, Record};
use std::ffi::{c_char, c_int, CStr};

#[allow(non_camel_case_types)]
type cc_log_Level = c_int;

const LEVEL_ERROR: cc_log_Level = 1;
const LEVEL_WARN: cc_log_Level = 2;
const LEVEL_INFO: cc_log_Level = 3;
const LEVEL_DEBUG: cc_log_Level = 4;

#[allow(non_camel_case_types)]
type cc_log_Level_Filter = c_int;

const LEVEL_FILTER_OFF: cc_log_Level_Filter = 0;
const LEVEL_FILTER_ERROR: cc_log_Level_Filter = 1;
const LEVEL_FILTER_WARN: cc_log_Level_Filter = 2;
const LEVEL_FILTER_INFO: cc_log_Level_Filter = 3;
const LEVEL_FILTER_DEBUG: cc_log_Level_Filter = 4;
const LEVEL_FILTER_TRACE: cc_log_Level_Filter = 5;

/// Target used when the caller passes no target.
const DEFAULT_TARGET: &str = "simulator";

/// Map a C level to a [`Level`]. Values outside the known range are clamped.
pub fn level_from_c(level: c_int) -> Level {
    match level {
        i32::MIN..=LEVEL_ERROR => Level::Error,
        LEVEL_WARN => Level::Warn,
        LEVEL_INFO => Level::Info,
        LEVEL_DEBUG => Level::Debug,
        _ => Level::Trace,
    }
}

/// Map a C level filter to a [`LevelFilter`]. Values outside the known range are clamped.
pub fn level_filter_from_c(level_filter: c_int) -> LevelFilter {
    match level_filter {
        i32::MIN..=LEVEL_FILTER_OFF => LevelFilter::Off,
        LEVEL_FILTER_ERROR => LevelFilter::Error,
        LEVEL_FILTER_WARN => LevelFilter::Warn,
        LEVEL_FILTER_INFO => LevelFilter::Info,
        LEVEL_FILTER_DEBUG => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Map a [`LevelFilter`] to its C representation.
pub fn level_filter_to_c(level_filter: LevelFilter) -> c_int {
    match level_filter {
        LevelFilter::Off => LEVEL_FILTER_OFF,
        LevelFilter::Error => LEVEL_FILTER_ERROR,
        LevelFilter::Warn => LEVEL_FILTER_WARN,
        LevelFilter::Info => LEVEL_FILTER_INFO,
        LevelFilter::Debug => LEVEL_FILTER_DEBUG,
        LevelFilter::Trace => LEVEL_FILTER_TRACE,
    }
}

/// Forward a message from the simulator into the installed logger.
///
/// A null or non-UTF-8 `message` is dropped. A null or non-UTF-8 `target`
/// falls back to `"simulator"`.
///
/// # Safety
///
/// `target` and `message` must each be null or point to a nul-terminated string.
#[no_mangle]
pub unsafe extern "C" fn cc_log(level: cc_log_Level, target: *const c_char, message: *const c_char) {
    let level = level_from_c(level);

    let target = if target.is_null() {
        DEFAULT_TARGET
    } else {
        unsafe { CStr::from_ptr(target) }
            .to_str()
            .unwrap_or(DEFAULT_TARGET)
    };

    // Check if the log would have a chance to be logged before we do any more work.
    let metadata = log::Metadata::builder().level(level).target(target).build();
    if !log::logger().enabled(&metadata) {
        return;
    }

    if message.is_null() {
        return;
    }
    let Ok(message) = unsafe { CStr::from_ptr(message) }.to_str() else {
        return;
    };

    log::logger().log(
        &Record::builder()
            .level(level)
            .target(target)
            .args(format_args!("{}", message))
            .build(),
    );
}

/// Set the maximum log level
#[no_mangle]
pub extern "C" fn cc_set_max_level(level_filter: cc_log_Level_Filter) {
    log::set_max_level(level_filter_from_c(level_filter));
}

/// Get the maximum log level
#[no_mangle]
pub extern "C" fn cc_max_level() -> cc_log_Level_Filter {
    level_filter_to_c(log::max_level())
}
