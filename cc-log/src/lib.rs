// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Logging facade of the crazycar controller.
//!
//! Re-exports the [`log`] crate so that all crates of the workspace log through
//! the same facade, and exposes a small C API which lets the simulator adjust
//! the level and forward its own messages into the installed logger.

pub mod ffi;

pub use log::*;
