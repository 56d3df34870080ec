// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

use std::ffi::c_int;

/// Install the console logger. Level integers follow `cc_set_max_level`.
#[no_mangle]
pub extern "C" fn cc_logger_init(level_filter: c_int, console: bool) {
    let level_filter = cc_log::ffi::level_filter_from_c(level_filter);
    crate::init(level_filter, console);
}
