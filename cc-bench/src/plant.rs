// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Minimal car model closing the loop around the controller
//!
//! Applies the simulator's actuation rules to the controller commands and moves the
//! car toward a wall in front of it. Side distances stay constant.

/// Smallest throttle magnitude the motor reacts to
pub const DEADZONE: i32 = 18;
/// Largest accepted throttle magnitude
pub const MAX_POWER: i32 = 100;
/// Steering limit in either direction
pub const MAX_STEER: i32 = 10;

#[derive(Debug, Clone)]
pub struct Plant {
    front_cm: f64,
    left_cm: u16,
    right_cm: u16,
    /// Centimeters travelled per tick at full power
    step_cm: f64,
    power: i8,
    steer: i8,
}

impl Plant {
    pub fn new(front_cm: f64, left_cm: u16, right_cm: u16, step_cm: f64) -> Self {
        Self {
            front_cm,
            left_cm,
            right_cm,
            step_cm,
            power: 0,
            steer: 0,
        }
    }

    /// Distance to the wall ahead, rounded to whole centimeters.
    pub fn front_cm(&self) -> u16 {
        self.front_cm.round().clamp(0.0, f64::from(u16::MAX)) as u16
    }

    pub fn left_cm(&self) -> u16 {
        self.left_cm
    }

    pub fn right_cm(&self) -> u16 {
        self.right_cm
    }

    /// Throttle currently applied by the motor
    pub fn power(&self) -> i8 {
        self.power
    }

    /// Steering angle currently applied by the servo
    pub fn steer(&self) -> i8 {
        self.steer
    }

    /// Apply controller commands the way the simulator does.
    pub fn actuate(&mut self, throttle: i32, steer: i32) {
        self.power = apply_power(throttle, self.power);
        self.steer = steer.clamp(-MAX_STEER, MAX_STEER) as i8;
    }

    /// Move for one tick with the applied power.
    pub fn advance(&mut self) {
        let travelled = self.step_cm * f64::from(self.power) / f64::from(MAX_POWER);
        self.front_cm = (self.front_cm - travelled).max(0.0);
    }
}

/// New motor power for the throttle command `throttle`.
///
/// Commands inside the deadzone stop the motor. Commands beyond the maximum are
/// ignored and keep the current power.
pub fn apply_power(throttle: i32, current: i8) -> i8 {
    match throttle.unsigned_abs() {
        m if m < DEADZONE.unsigned_abs() => 0,
        m if m <= MAX_POWER.unsigned_abs() => throttle as i8,
        _ => current,
    }
}
