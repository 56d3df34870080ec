// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Controller configuration
//!
//! Every parameter defaults to the calibrated constant of its module. With the
//! `serde` feature a configuration can be loaded from any subset of fields.

use crate::error::Error;
use crate::linearization::Linearization;
use crate::policy::avoidance::AvoidanceConfig;
use crate::policy::zones::ZoneConfig;
use crate::policy::{PolicyKind, WarmupConfig};
use crate::regulator::Gain;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete controller configuration
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub linearization: Linearization,
    pub warmup: WarmupConfig,
    pub policy: PolicyKind,
    pub avoidance: AvoidanceConfig,
    pub zones: ZoneConfig,
}

impl Config {
    /// Check the configuration for values that would make a tick meaningless.
    ///
    /// Ticks never fail, so a rejected configuration must not be installed.
    pub fn validate(&self) -> Result<(), Error> {
        let lin = &self.linearization;
        if lin.min_adc > lin.max_adc {
            return Err(Error::InvalidRange("min_adc above max_adc"));
        }
        if u32::from(lin.min_adc) + lin.b == 0 {
            return Err(Error::ZeroDivisor("adc offset"));
        }

        if self.warmup.ticks > 0 && self.warmup.half_period == 0 {
            return Err(Error::InvalidWarmup);
        }

        check_gain(&self.avoidance.gain, "avoidance steering gain")?;

        let zones = &self.zones;
        check_gain(&zones.setpoint, "zone setpoint")?;
        check_gain(&zones.throttle_gain, "zone throttle gain")?;
        check_gain(&zones.steer_gain, "zone steering gain")?;
        if zones.deadzone <= 0 {
            return Err(Error::InvalidRange("deadzone must be positive"));
        }
        if zones.max_throttle < zones.deadzone {
            return Err(Error::InvalidRange("max_throttle below deadzone"));
        }
        if zones.near_cm > zones.far_cm {
            return Err(Error::InvalidRange("near_cm above far_cm"));
        }

        Ok(())
    }
}

fn check_gain(gain: &Gain, name: &'static str) -> Result<(), Error> {
    if gain.divisor == 0 {
        Err(Error::ZeroDivisor(name))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_divisors() {
        let mut config = Config::default();
        config.avoidance.gain = Gain::new(3, 0);
        assert_eq!(
            config.validate(),
            Err(Error::ZeroDivisor("avoidance steering gain"))
        );

        let mut config = Config::default();
        config.linearization.min_adc = 0;
        config.linearization.b = 0;
        assert!(matches!(config.validate(), Err(Error::ZeroDivisor(_))));
    }

    #[test]
    fn rejects_inverted_ranges() {
        let mut config = Config::default();
        config.linearization.min_adc = 900;
        assert!(matches!(config.validate(), Err(Error::InvalidRange(_))));

        let mut config = Config::default();
        config.zones.max_throttle = 10;
        assert!(matches!(config.validate(), Err(Error::InvalidRange(_))));
    }

    #[test]
    fn rejects_zero_half_period_only_with_warmup() {
        let mut config = Config::default();
        config.warmup.half_period = 0;
        assert_eq!(config.validate(), Ok(()));
        config.warmup.ticks = 5;
        assert_eq!(config.validate(), Err(Error::InvalidWarmup));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_overrides_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "policy": "ZoneThrottle",
                "warmup": { "ticks": 5 },
                "avoidance": { "steering": { "FollowLeft": { "target_cm": 60 } } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.policy, PolicyKind::ZoneThrottle);
        assert_eq!(config.warmup.ticks, 5);
        assert_eq!(config.warmup.half_period, 5);
        assert_eq!(config.zones, ZoneConfig::default());
        assert_eq!(config.linearization, Linearization::default());
        assert_eq!(config.validate(), Ok(()));
    }
}
