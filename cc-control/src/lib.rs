// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Controller core of the crazycar driving exercise.
//!
//! The simulator calls the controller once per tick. Within a tick it first pushes
//! the raw readings of the three distance sensors, then runs the driving policy and
//! finally reads back the throttle and steering commands.
//!
//! # Linearization
//!
//! [Linearization](crate::linearization::Linearization) turns a raw ADC sample of an
//! infrared distance sensor into centimeters, corrected for sensors mounted at an angle.
//!
//! # Context
//!
//! All state shared between the simulator and the policy lives in a
//! [Context](crate::context::Context) owned by the caller.
//!
//! # Policies
//!
//! A [Driver](crate::policy::Driver) runs an optional warmup phase and then delegates
//! every tick to one [Policy](crate::policy::Policy), selected through the
//! [configuration](crate::config::Config).

pub mod config;
pub mod context;
pub mod error;
pub mod linearization;
pub mod policy;
pub mod regulator;

/// Re-export the public API
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::context::{Context, Distances};
    pub use crate::error::Error;
    pub use crate::linearization::{linearize, Linearization};
    pub use crate::policy::{Command, Driver, Phase, Policy, PolicyKind};
    pub use crate::regulator::Gain;
}
