// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Throttle modulation by front distance zones
//!
//! The front distance falls into one of three zones. Far away the throttle ramps up,
//! in the middle it ramps down toward the deadzone and close up the car reverses.
//! The ramp term is `kp * (setpoint - front)` with a setpoint slightly beyond the
//! measured front distance. Steering is independent of the zones.

use crate::context::Context;
use crate::policy::{Command, Policy};
use crate::regulator::Gain;
use cc_log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Front distance from which the far zone starts
pub const FAR_CM: u16 = 100;
/// Front distance below which the car reverses
pub const NEAR_CM: u16 = 50;
/// Front distance below which the car keeps reversing if already reversing hard
pub const REVERSE_NEAR_CM: u16 = 80;
/// Side distance below which steering is active
pub const SIDE_CM: u16 = 130;
/// Smallest throttle magnitude the simulator reacts to
pub const DEADZONE: i32 = 18;
/// Throttle cap in the far zone
pub const MAX_THROTTLE: i32 = 80;
/// Throttle used to stop reversing once the front is clear
pub const RECOVER_THROTTLE: i32 = 20;
/// Setpoint as a fraction of the front distance, 1.09
pub const SETPOINT: Gain = Gain::percent(109);
/// Throttle ramp gain, 0.99
pub const THROTTLE_GAIN: Gain = Gain::percent(99);
/// Steering gain, 0.99
pub const STEER_GAIN: Gain = Gain::percent(99);

/// Parameters of [ZoneThrottle].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneConfig {
    pub far_cm: u16,
    pub near_cm: u16,
    pub reverse_near_cm: u16,
    pub side_cm: u16,
    pub deadzone: i32,
    pub max_throttle: i32,
    pub recover_throttle: i32,
    pub setpoint: Gain,
    pub throttle_gain: Gain,
    pub steer_gain: Gain,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            far_cm: FAR_CM,
            near_cm: NEAR_CM,
            reverse_near_cm: REVERSE_NEAR_CM,
            side_cm: SIDE_CM,
            deadzone: DEADZONE,
            max_throttle: MAX_THROTTLE,
            recover_throttle: RECOVER_THROTTLE,
            setpoint: SETPOINT,
            throttle_gain: THROTTLE_GAIN,
            steer_gain: STEER_GAIN,
        }
    }
}

/// Zone based throttle policy
#[derive(Debug, Clone)]
pub struct ZoneThrottle {
    config: ZoneConfig,
}

impl ZoneThrottle {
    pub fn new(config: ZoneConfig) -> Self {
        Self { config }
    }

    /// `kp * (setpoint - front)`
    fn ramp(&self, front: u16) -> i32 {
        let front = i32::from(front);
        let setpoint = self.config.setpoint.apply(front);
        self.config.throttle_gain.apply(setpoint.saturating_sub(front))
    }

    fn steer(&self, ctx: &Context) -> Option<i32> {
        let distances = ctx.distances();
        let side = self.config.side_cm;
        (distances.left < side || distances.right < side)
            .then(|| self.config.steer_gain.apply(-distances.lateral_offset()))
    }

    fn throttle(&self, ctx: &Context) -> Option<i32> {
        let ZoneConfig {
            far_cm,
            near_cm,
            reverse_near_cm,
            deadzone,
            max_throttle,
            recover_throttle,
            ..
        } = self.config;
        let front = ctx.distances().front;
        let power = i32::from(ctx.current_power());
        let ramp = self.ramp(front);

        let near = front < near_cm || (front < reverse_near_cm && power < -deadzone);
        if near {
            return Some(ramp.saturating_neg().saturating_sub(deadzone));
        }

        if front >= far_cm {
            if (0..max_throttle).contains(&power) {
                Some(power.saturating_add(ramp).saturating_add(deadzone).min(max_throttle))
            } else if power < 0 {
                Some(recover_throttle)
            } else {
                None
            }
        } else if front > near_cm {
            if power >= deadzone {
                Some(power.saturating_sub(ramp).max(deadzone))
            } else if power < 0 {
                Some(recover_throttle)
            } else {
                None
            }
        } else {
            None
        }
    }
}

impl Policy for ZoneThrottle {
    fn name(&self) -> &'static str {
        "zone-throttle"
    }

    fn decide(&mut self, ctx: &Context) -> Command {
        let command = Command {
            throttle: self.throttle(ctx),
            steer: self.steer(ctx),
        };
        if command.throttle.is_none() {
            debug!(
                "No throttle change at front {} cm, power {}",
                ctx.distances().front,
                ctx.current_power()
            );
        }
        command
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::context::Distances;

    fn decide(distances: Distances, power: i8) -> Command {
        let mut ctx = Context::default();
        ctx.set_distances(distances);
        ctx.acknowledge_power(power);
        ZoneThrottle::new(ZoneConfig::default()).decide(&ctx)
    }

    #[test]
    fn far_zone_ramps_up_and_caps() {
        // setpoint 218, ramp 18 * 0.99 = 17
        assert_eq!(decide(Distances::new(200, 150, 150), 30).throttle, Some(65));
        // standstill leaves the deadzone
        assert_eq!(decide(Distances::new(200, 150, 150), 0).throttle, Some(35));
        assert_eq!(decide(Distances::new(200, 150, 150), 70).throttle, Some(80));
        assert_eq!(decide(Distances::new(200, 150, 150), 80).throttle, None);
        assert_eq!(decide(Distances::new(200, 150, 150), -5).throttle, Some(20));
    }

    #[test]
    fn mid_zone_ramps_down_to_deadzone() {
        // setpoint 81, ramp 6 * 0.99 = 5
        assert_eq!(decide(Distances::new(75, 150, 150), 40).throttle, Some(35));
        assert_eq!(decide(Distances::new(75, 150, 150), 20).throttle, Some(18));
        assert_eq!(decide(Distances::new(75, 150, 150), 10).throttle, None);
        assert_eq!(decide(Distances::new(75, 150, 150), -10).throttle, Some(20));
    }

    #[test]
    fn near_zone_reverses() {
        // setpoint 43, ramp 3 * 0.99 = 2
        assert_eq!(decide(Distances::new(40, 150, 150), 30).throttle, Some(-20));
        // exactly at the near bound nothing changes
        assert_eq!(decide(Distances::new(50, 150, 150), 30).throttle, None);
    }

    #[test]
    fn hard_reverse_extends_near_zone() {
        // setpoint 76, ramp 6 * 0.99 = 5
        assert_eq!(decide(Distances::new(70, 150, 150), -19).throttle, Some(-23));
        assert_eq!(decide(Distances::new(70, 150, 150), -18).throttle, Some(20));
    }

    #[test]
    fn steering_only_near_side_walls() {
        assert_eq!(decide(Distances::new(200, 150, 150), 30).steer, None);
        // right - left = 40 -> 39
        assert_eq!(decide(Distances::new(200, 80, 120), 30).steer, Some(39));
        assert_eq!(decide(Distances::new(200, 120, 80), 30).steer, Some(-39));
        assert_eq!(decide(Distances::new(200, 100, 100), 30).steer, Some(0));
    }

    #[test]
    fn extreme_gain_saturates() {
        let config = ZoneConfig {
            throttle_gain: Gain::new(i32::MAX, 1),
            ..Default::default()
        };
        let full = crate::config::Config {
            zones: config,
            ..Default::default()
        };
        assert_eq!(full.validate(), Ok(()));

        let decide = |distances: Distances, power: i8| {
            let mut ctx = Context::default();
            ctx.set_distances(distances);
            ctx.acknowledge_power(power);
            ZoneThrottle::new(config).decide(&ctx).throttle
        };
        assert_eq!(decide(Distances::new(200, 150, 150), 10), Some(80));
        assert_eq!(decide(Distances::new(75, 150, 150), 40), Some(18));
        assert_eq!(decide(Distances::new(40, 150, 150), 30), Some(i32::MIN));
    }
}
