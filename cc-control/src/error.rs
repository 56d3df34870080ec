// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Controller error implementation

/// Controller error type
///
/// Only configuration can be rejected. Ticks never fail.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A divisor that would be zero at runtime
    ZeroDivisor(&'static str),
    /// A range whose bounds are inverted or out of domain
    InvalidRange(&'static str),
    /// Warmup is enabled with a zero half period
    InvalidWarmup,
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::ZeroDivisor(description) => write!(f, "Zero divisor, {}", description),
            Error::InvalidRange(description) => write!(f, "Invalid range, {}", description),
            Error::InvalidWarmup => write!(f, "Invalid warmup, half period must not be zero"),
        }
    }
}
