// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! ADC to distance conversion
//!
//! The infrared sensors report a value that falls hyperbolically with the distance.
//! The fit used here is `cm = A / (adc + B)`, evaluated in integers.

use cc_log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Numerator of the hyperbola fit
pub const LINEAR_A: u32 = 23962;
/// Offset added to the ADC value before dividing
pub const LINEAR_B: u32 = 20;
/// Smallest accepted ADC value. Smaller samples are pinned to it.
pub const MIN_ADC: u16 = 163;
/// Largest accepted ADC value. Larger samples are pinned to it.
pub const MAX_ADC: u16 = 770;
/// `cos(0°) * 100`, the angle factor of a sensor looking straight ahead
pub const COS_0_DEG: u8 = 100;

/// Calibration of one sensor type.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Linearization {
    pub a: u32,
    pub b: u32,
    pub min_adc: u16,
    pub max_adc: u16,
}

impl Default for Linearization {
    fn default() -> Self {
        Self {
            a: LINEAR_A,
            b: LINEAR_B,
            min_adc: MIN_ADC,
            max_adc: MAX_ADC,
        }
    }
}

impl Linearization {
    /// Convert `raw_adc` into centimeters.
    ///
    /// `cos_alpha` is the cosine of the incidence angle scaled by 100, so `100` means
    /// no correction. A zero factor is treated as `1`. Nothing is ever rejected: out of
    /// range samples are pinned to the accepted ADC range first.
    pub fn apply(&self, raw_adc: u16, cos_alpha: u8) -> u16 {
        // Not `clamp`, which panics on an inverted range.
        let adc = raw_adc.max(self.min_adc).min(self.max_adc);
        if adc != raw_adc {
            trace!("ADC value {raw_adc} pinned to {adc}");
        }

        let divisor = (u32::from(adc) + self.b).max(1);
        let base = u64::from(self.a / divisor);

        let cos_alpha = if cos_alpha == 0 {
            trace!("Angle factor 0 replaced by 1");
            1
        } else {
            cos_alpha
        };

        let cm = base * 100 / u64::from(cos_alpha);
        u16::try_from(cm).unwrap_or(u16::MAX)
    }

    /// ADC value the simulated sensor reports for an obstacle `cm` away.
    ///
    /// This is the inverse fit used on the simulator side. `0` maps to `0`.
    pub fn adc_from_distance(&self, cm: u16) -> u16 {
        if cm == 0 {
            return 0;
        }
        let adc = (self.a / u32::from(cm)).saturating_sub(self.b);
        u16::try_from(adc).unwrap_or(u16::MAX)
    }
}

/// Convert `raw_adc` with the default calibration.
pub fn linearize(raw_adc: u16, cos_alpha: u8) -> u16 {
    Linearization::default().apply(raw_adc, cos_alpha)
}

/// Angle factor for a sensor looking `angle_deg` degrees off axis.
///
/// Rounds `cos * 100` and keeps the result in `1..=255` so it never hits the
/// zero substitution. A non-finite angle maps to `1`.
pub fn cos_alpha_scaled(angle_deg: f64) -> u8 {
    let scaled = (angle_deg.to_radians().cos() * 100.0).round();
    if scaled.is_nan() {
        return 1;
    }
    scaled.clamp(1.0, 255.0) as u8
}
