// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! State shared between the simulator and the driving policy

use crate::linearization::{Linearization, COS_0_DEG};
use crate::policy::Command;

/// Most recent linearized distances in centimeters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Distances {
    pub front: u16,
    pub left: u16,
    pub right: u16,
}

impl Distances {
    pub fn new(front: u16, left: u16, right: u16) -> Self {
        Self { front, left, right }
    }

    /// Check whether any of the three distances is below `threshold_cm`.
    pub fn any_below(&self, threshold_cm: u16) -> bool {
        self.front < threshold_cm || self.left < threshold_cm || self.right < threshold_cm
    }

    /// `left - right` in centimeters. Positive when there is more room on the left.
    pub fn lateral_offset(&self) -> i32 {
        i32::from(self.left) - i32::from(self.right)
    }
}

/// Controller state for one car.
///
/// Sensor updates write the distances, the policy writes the commands and the
/// simulator acknowledges what it actually applied. All cells start at zero.
#[derive(Debug, Default, Clone)]
pub struct Context {
    linearization: Linearization,
    distances: Distances,
    throttle_command: i32,
    steer_command: i32,
    current_power: i8,
    current_steer: i8,
}

impl Context {
    /// Create a zeroed context converting readings with `linearization`.
    pub fn new(linearization: Linearization) -> Self {
        Self {
            linearization,
            ..Default::default()
        }
    }

    /// Restore the zero state. The calibration is kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.linearization);
    }

    pub fn linearization(&self) -> &Linearization {
        &self.linearization
    }

    /// Linearize a front sensor sample and store it. The front sensor looks straight ahead.
    pub fn update_front(&mut self, raw_adc: u16) -> u16 {
        self.distances.front = self.linearization.apply(raw_adc, COS_0_DEG);
        self.distances.front
    }

    /// Linearize a left sensor sample with angle factor `cos_alpha` and store it.
    pub fn update_left(&mut self, raw_adc: u16, cos_alpha: u8) -> u16 {
        self.distances.left = self.linearization.apply(raw_adc, cos_alpha);
        self.distances.left
    }

    /// Linearize a right sensor sample with angle factor `cos_alpha` and store it.
    pub fn update_right(&mut self, raw_adc: u16, cos_alpha: u8) -> u16 {
        self.distances.right = self.linearization.apply(raw_adc, cos_alpha);
        self.distances.right
    }

    /// Store already linearized distances.
    pub fn set_distances(&mut self, distances: Distances) {
        self.distances = distances;
    }

    pub fn distances(&self) -> Distances {
        self.distances
    }

    pub fn set_throttle_command(&mut self, throttle: i32) {
        self.throttle_command = throttle;
    }

    pub fn throttle_command(&self) -> i32 {
        self.throttle_command
    }

    pub fn set_steer_command(&mut self, steer: i32) {
        self.steer_command = steer;
    }

    pub fn steer_command(&self) -> i32 {
        self.steer_command
    }

    /// Record the throttle the simulator applied.
    pub fn acknowledge_power(&mut self, power: i8) {
        self.current_power = power;
    }

    pub fn current_power(&self) -> i8 {
        self.current_power
    }

    /// Record the steering angle the simulator applied.
    pub fn acknowledge_steer(&mut self, angle: i8) {
        self.current_steer = angle;
    }

    pub fn current_steer(&self) -> i8 {
        self.current_steer
    }

    /// Write the parts of `command` that are set. Missing parts keep the previous command.
    pub fn apply(&mut self, command: Command) {
        if let Some(throttle) = command.throttle {
            self.throttle_command = throttle;
        }
        if let Some(steer) = command.steer {
            self.steer_command = steer;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn updates_store_and_return() {
        let mut ctx = Context::default();
        assert_eq!(ctx.update_front(163), 130);
        assert_eq!(ctx.update_left(770, 50), 60);
        assert_eq!(ctx.update_right(2000, 0), 3000);
        assert_eq!(ctx.distances(), Distances::new(130, 60, 3000));
    }

    #[test]
    fn partial_command_keeps_previous() {
        let mut ctx = Context::default();
        ctx.apply(Command::new(25, -4));
        ctx.apply(Command {
            throttle: None,
            steer: Some(7),
        });
        assert_eq!(ctx.throttle_command(), 25);
        assert_eq!(ctx.steer_command(), 7);
        ctx.apply(Command::NONE);
        assert_eq!((ctx.throttle_command(), ctx.steer_command()), (25, 7));
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut ctx = Context::default();
        ctx.update_front(300);
        ctx.set_throttle_command(-20);
        ctx.acknowledge_power(-20);
        ctx.acknowledge_steer(10);
        ctx.reset();
        assert_eq!(ctx.distances(), Distances::default());
        assert_eq!(ctx.throttle_command(), 0);
        assert_eq!(ctx.current_power(), 0);
        assert_eq!(ctx.current_steer(), 0);
    }

    #[test]
    fn lateral_offset_sign() {
        assert_eq!(Distances::new(0, 60, 40).lateral_offset(), 20);
        assert_eq!(Distances::new(0, 40, 60).lateral_offset(), -20);
        assert!(Distances::new(120, 50, 49).any_below(50));
        assert!(!Distances::new(120, 50, 50).any_below(50));
    }
}
