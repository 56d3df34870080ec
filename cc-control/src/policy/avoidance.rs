// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Obstacle avoidance with centered cruising
//!
//! If any sensor sees an obstacle closer than the threshold, the car backs off and
//! turns toward the side with more room. Otherwise it cruises just above the motor
//! deadzone and steers proportionally to stay centered between the side walls.

use crate::context::Context;
use crate::policy::{Command, Policy};
use crate::regulator::Gain;
use cc_log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distance below which the car backs off
pub const AVOID_THRESHOLD_CM: u16 = 50;
/// Distance below which the car keeps backing off while already reversing
pub const REVERSE_AVOID_THRESHOLD_CM: u16 = 50;
/// Throttle while backing off
pub const REVERSE_THROTTLE: i32 = -20;
/// Steering magnitude while backing off
pub const EVADE_STEER: i32 = 10;
/// Cruise throttle. The simulator ignores magnitudes below 18.
pub const CRUISE_THROTTLE: i32 = 25;
/// Steering gain, 3/8
pub const STEER_GAIN: Gain = Gain::new(3, 8);

/// How the cruise steering is derived from the side distances.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SteeringMode {
    /// Drive centered: setpoint zero for `left - right`
    #[default]
    Center,
    /// Keep `target_cm` to the left wall
    FollowLeft { target_cm: u16 },
}

/// Parameters of [Avoidance].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvoidanceConfig {
    pub threshold_cm: u16,
    pub reverse_threshold_cm: u16,
    pub reverse_throttle: i32,
    pub evade_steer: i32,
    pub cruise_throttle: i32,
    pub steering: SteeringMode,
    pub gain: Gain,
}

impl Default for AvoidanceConfig {
    fn default() -> Self {
        Self {
            threshold_cm: AVOID_THRESHOLD_CM,
            reverse_threshold_cm: REVERSE_AVOID_THRESHOLD_CM,
            reverse_throttle: REVERSE_THROTTLE,
            evade_steer: EVADE_STEER,
            cruise_throttle: CRUISE_THROTTLE,
            steering: SteeringMode::Center,
            gain: STEER_GAIN,
        }
    }
}

/// Obstacle avoidance policy
#[derive(Debug, Clone)]
pub struct Avoidance {
    config: AvoidanceConfig,
}

impl Avoidance {
    pub fn new(config: AvoidanceConfig) -> Self {
        Self { config }
    }

    fn cruise_steer(&self, ctx: &Context) -> i32 {
        let distances = ctx.distances();
        let error = match self.config.steering {
            SteeringMode::Center => -distances.lateral_offset(),
            SteeringMode::FollowLeft { target_cm } => {
                i32::from(target_cm) - i32::from(distances.left)
            }
        };
        self.config.gain.apply(error)
    }
}

impl Policy for Avoidance {
    fn name(&self) -> &'static str {
        "avoidance"
    }

    fn decide(&mut self, ctx: &Context) -> Command {
        let distances = ctx.distances();
        let reversing = ctx.current_power() < 0;

        let too_close = distances.any_below(self.config.threshold_cm)
            || (reversing && distances.any_below(self.config.reverse_threshold_cm));

        if too_close {
            // Ties go to the right.
            let steer = if distances.left > distances.right {
                self.config.evade_steer
            } else {
                self.config.evade_steer.saturating_neg()
            };
            debug!("Obstacle within {} cm: {distances:?}", self.config.threshold_cm);
            Command::new(self.config.reverse_throttle, steer)
        } else {
            Command::new(self.config.cruise_throttle, self.cruise_steer(ctx))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::context::Distances;

    fn decide(config: AvoidanceConfig, distances: Distances, power: i8) -> Command {
        let mut ctx = Context::default();
        ctx.set_distances(distances);
        ctx.acknowledge_power(power);
        Avoidance::new(config).decide(&ctx)
    }

    #[test]
    fn backs_off_toward_more_room() {
        let command = decide(AvoidanceConfig::default(), Distances::new(20, 60, 40), 10);
        assert_eq!(command, Command::new(-20, 10));

        let command = decide(AvoidanceConfig::default(), Distances::new(120, 40, 60), 30);
        assert_eq!(command, Command::new(-20, -10));
    }

    #[test]
    fn tie_steers_right() {
        let command = decide(AvoidanceConfig::default(), Distances::new(30, 45, 45), 0);
        assert_eq!(command, Command::new(-20, -10));
    }

    #[test]
    fn balanced_cruise() {
        let command = decide(AvoidanceConfig::default(), Distances::new(120, 50, 50), 30);
        assert_eq!(command, Command::new(25, 0));
        assert!(command.throttle.unwrap() >= 18);
    }

    #[test]
    fn cruise_steering_is_proportional() {
        // left - right = 40, error -40, 3/8 -> -15
        let command = decide(AvoidanceConfig::default(), Distances::new(120, 100, 60), 25);
        assert_eq!(command, Command::new(25, -15));
        // left - right = -21, error 21 -> 7
        let command = decide(AvoidanceConfig::default(), Distances::new(120, 60, 81), 25);
        assert_eq!(command, Command::new(25, 7));
    }

    #[test]
    fn reverse_threshold_applies_only_while_reversing() {
        let config = AvoidanceConfig {
            threshold_cm: 30,
            reverse_threshold_cm: 40,
            ..Default::default()
        };
        let distances = Distances::new(35, 80, 80);
        assert_eq!(decide(config, distances, 20).throttle, Some(25));
        assert_eq!(decide(config, distances, -20).throttle, Some(-20));
    }

    #[test]
    fn follow_left_wall() {
        let config = AvoidanceConfig {
            steering: SteeringMode::FollowLeft { target_cm: 60 },
            ..Default::default()
        };
        let command = decide(config, Distances::new(120, 100, 55), 25);
        assert_eq!(command, Command::new(25, -15));
    }

    #[test]
    fn extreme_evade_steer_saturates() {
        let config = AvoidanceConfig {
            evade_steer: i32::MIN,
            ..Default::default()
        };
        let command = decide(config, Distances::new(30, 45, 45), 0);
        assert_eq!(command, Command::new(-20, i32::MAX));
    }
}
