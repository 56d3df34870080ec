// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Fixed-point regulator building blocks
//!
//! Gains are integers in percent. The term functions work on 8-bit errors and return
//! 8-bit outputs. Intermediates are widened and the outputs saturate instead of wrapping.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer gain `numerator / divisor`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gain {
    pub numerator: i32,
    pub divisor: i32,
}

impl Gain {
    pub const fn new(numerator: i32, divisor: i32) -> Self {
        Self { numerator, divisor }
    }

    /// Gain in percent, `numerator / 100`.
    pub const fn percent(numerator: i32) -> Self {
        Self::new(numerator, 100)
    }

    /// `value * numerator / divisor`, truncating toward zero. A zero divisor yields zero.
    pub fn apply(&self, value: i32) -> i32 {
        if self.divisor == 0 {
            return 0;
        }
        let scaled = i64::from(value) * i64::from(self.numerator) / i64::from(self.divisor);
        scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

/// Proportional term, `e * k / 100`.
pub fn p_term(e: i8, k: i8) -> i8 {
    saturate(i32::from(e) * i32::from(k) / 100)
}

/// Integral term over the error sum `e + accumulated`, limited to `±e_max` before scaling.
pub fn i_term(e: i8, k: i8, accumulated: i8, e_max: i8) -> i8 {
    let sum = limit(i32::from(e) + i32::from(accumulated), e_max);
    saturate(sum * i32::from(k) / 100)
}

/// Derivative term over the backward difference, halved: `(e - e_old) / 2 * k / 100`.
pub fn d_term(e_old: i8, e: i8, k: i8) -> i8 {
    let difference = (i32::from(e) - i32::from(e_old)) / 2;
    saturate(difference * i32::from(k) / 100)
}

/// State of a PID loop assembled from the three terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PidState {
    kp: i8,
    ki: i8,
    kd: i8,
    e_max: i8,
    accumulated: i8,
    previous: i8,
}

impl PidState {
    /// Create a loop with gains in percent and an error sum limited to `±e_max`.
    pub fn new(kp: i8, ki: i8, kd: i8, e_max: i8) -> Self {
        Self {
            kp,
            ki,
            kd,
            e_max,
            accumulated: 0,
            previous: 0,
        }
    }

    /// Feed the current error and get the saturated sum of all three terms.
    pub fn step(&mut self, e: i8) -> i8 {
        let p = p_term(e, self.kp);
        let i = i_term(e, self.ki, self.accumulated, self.e_max);
        let d = d_term(self.previous, e, self.kd);

        let sum = limit(i32::from(e) + i32::from(self.accumulated), self.e_max);
        self.accumulated = saturate(sum);
        self.previous = e;

        saturate(i32::from(p) + i32::from(i) + i32::from(d))
    }

    /// Current error sum.
    pub fn accumulated(&self) -> i8 {
        self.accumulated
    }

    /// Forget the error history.
    pub fn reset(&mut self) {
        self.accumulated = 0;
        self.previous = 0;
    }
}

fn limit(value: i32, e_max: i8) -> i32 {
    let bound = i32::from(e_max).abs();
    value.clamp(-bound, bound)
}

fn saturate(value: i32) -> i8 {
    value.clamp(i32::from(i8::MIN), i32::from(i8::MAX)) as i8
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gain() {
        let gain = Gain::new(3, 8);
        assert_eq!(gain.apply(0), 0);
        assert_eq!(gain.apply(20), 7);
        assert_eq!(gain.apply(-20), -7);
        assert_eq!(Gain::percent(99).apply(18), 17);
        assert_eq!(Gain::new(1, 0).apply(50), 0);
        assert_eq!(Gain::new(i32::MAX, 1).apply(2), i32::MAX);
    }

    #[test]
    fn proportional() {
        assert_eq!(p_term(50, 50), 25);
        assert_eq!(p_term(-50, 50), -25);
        assert_eq!(p_term(3, 10), 0);
        // 127 * 127 / 100 = 161 does not fit
        assert_eq!(p_term(127, 127), 127);
        assert_eq!(p_term(-128, 127), -128);
    }

    #[test]
    fn integral_limits_both_signs() {
        assert_eq!(i_term(10, 100, 20, 100), 30);
        assert_eq!(i_term(50, 100, 80, 100), 100);
        assert_eq!(i_term(-50, 100, -80, 100), -100);
        assert_eq!(i_term(-50, 50, -80, -100), -50);
    }

    #[test]
    fn derivative_halves_difference() {
        assert_eq!(d_term(0, 40, 100), 20);
        assert_eq!(d_term(40, 0, 100), -20);
        assert_eq!(d_term(10, 11, 100), 0);
        assert_eq!(d_term(-128, 127, 127), 127);
    }

    #[test]
    fn pid_accumulates_and_limits() {
        let mut pid = PidState::new(0, 100, 0, 25);
        assert_eq!(pid.step(10), 10);
        assert_eq!(pid.step(10), 20);
        assert_eq!(pid.step(10), 25);
        assert_eq!(pid.accumulated(), 25);
        assert_eq!(pid.step(-10), 15);
        pid.reset();
        assert_eq!(pid.accumulated(), 0);
    }

    #[test]
    fn pid_sum_of_terms() {
        let mut pid = PidState::new(100, 0, 100, 100);
        // p = 20, d = (20 - 0) / 2 = 10
        assert_eq!(pid.step(20), 30);
        // p = 20, d = 0
        assert_eq!(pid.step(20), 20);
    }

    #[test]
    fn pid_error_sum_keeps_sign_at_widest_limit() {
        let mut pid = PidState::new(0, 100, 0, i8::MIN);
        assert_eq!(pid.step(127), 127);
        assert_eq!(pid.step(127), 127);
        assert_eq!(pid.accumulated(), 127);
        let mut pid = PidState::new(0, 100, 0, i8::MIN);
        pid.step(-128);
        pid.step(-128);
        assert_eq!(pid.accumulated(), -128);
    }
}
