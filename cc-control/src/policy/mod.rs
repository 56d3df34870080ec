// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Driving policies and the per-tick state machine running them

use crate::config::Config;
use crate::context::Context;
use cc_log::{debug, info};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod avoidance;
pub mod zones;

pub use avoidance::Avoidance;
pub use zones::ZoneThrottle;

/// Default number of warmup ticks. Zero starts driving right away.
pub const WARMUP_TICKS: u16 = 0;
/// Steering amplitude while wiggling during warmup
pub const WARMUP_AMPLITUDE: i32 = 10;
/// Ticks per steering side while wiggling during warmup
pub const WARMUP_HALF_PERIOD: u16 = 5;

/// Actuator command produced by a policy for one tick.
///
/// A `None` part leaves the previous command in place.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub throttle: Option<i32>,
    pub steer: Option<i32>,
}

impl Command {
    /// Command that changes nothing
    pub const NONE: Command = Command {
        throttle: None,
        steer: None,
    };

    /// Command setting both throttle and steering
    pub fn new(throttle: i32, steer: i32) -> Self {
        Self {
            throttle: Some(throttle),
            steer: Some(steer),
        }
    }
}

/// A driving policy, evaluated once per tick in the drive phase.
pub trait Policy {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Compute this tick's command from the current sensor and feedback state.
    fn decide(&mut self, ctx: &Context) -> Command;
}

/// Selects the policy a [Driver] runs.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Reverse away from close obstacles, otherwise cruise centered between the walls
    #[default]
    Avoidance,
    /// Modulate throttle by front distance zones and steer proportionally
    ZoneThrottle,
}

impl TryFrom<u8> for PolicyKind {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PolicyKind::Avoidance),
            1 => Ok(PolicyKind::ZoneThrottle),
            other => Err(other),
        }
    }
}

/// Warmup phase parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupConfig {
    /// Number of warmup ticks before the policy takes over
    pub ticks: u16,
    /// Steering command magnitude while wiggling
    pub amplitude: i32,
    /// Ticks spent on each side per wiggle
    pub half_period: u16,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            ticks: WARMUP_TICKS,
            amplitude: WARMUP_AMPLITUDE,
            half_period: WARMUP_HALF_PERIOD,
        }
    }
}

/// Phase of the [Driver].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Sensors are ignored, the car stands still and wiggles its steering
    Warmup { remaining: u16 },
    /// The policy decides. Never left again.
    Drive,
}

impl Phase {
    fn initial(warmup: &WarmupConfig) -> Phase {
        match warmup.ticks {
            0 => Phase::Drive,
            remaining => Phase::Warmup { remaining },
        }
    }
}

/// Runs the warmup phase and then the configured policy, one tick at a time.
pub struct Driver {
    warmup: WarmupConfig,
    phase: Phase,
    policy: Box<dyn Policy + Send>,
    ticks: u64,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("warmup", &self.warmup)
            .field("phase", &self.phase)
            .field("policy", &self.policy.name())
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl Driver {
    /// Build a driver for the policy selected in `config`.
    pub fn new(config: &Config) -> Self {
        let policy: Box<dyn Policy + Send> = match config.policy {
            PolicyKind::Avoidance => Box::new(Avoidance::new(config.avoidance)),
            PolicyKind::ZoneThrottle => Box::new(ZoneThrottle::new(config.zones)),
        };
        Self::with_policy(config.warmup, policy)
    }

    /// Build a driver around any policy.
    pub fn with_policy(warmup: WarmupConfig, policy: Box<dyn Policy + Send>) -> Self {
        Self {
            warmup,
            phase: Phase::initial(&warmup),
            policy,
            ticks: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of ticks run since creation or the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Restart the warmup countdown and the tick counter.
    pub fn reset(&mut self) {
        self.phase = Phase::initial(&self.warmup);
        self.ticks = 0;
    }

    /// Run one tick: read `ctx`, write the resulting commands back into `ctx`.
    pub fn tick(&mut self, ctx: &mut Context) {
        self.ticks += 1;

        let command = match self.phase {
            Phase::Warmup { remaining } => {
                let remaining = remaining.saturating_sub(1);
                let command = Command::new(0, self.wiggle(remaining));

                self.phase = if remaining == 0 {
                    info!("Warmup finished after {} ticks, {} takes over", self.ticks, self.policy.name());
                    Phase::Drive
                } else {
                    Phase::Warmup { remaining }
                };
                command
            }
            Phase::Drive => self.policy.decide(ctx),
        };

        debug!(
            "Tick {}: {:?} power {} -> {:?}",
            self.ticks,
            ctx.distances(),
            ctx.current_power(),
            command
        );
        ctx.apply(command);
    }

    /// Steering while wiggling with `remaining` warmup ticks left.
    fn wiggle(&self, remaining: u16) -> i32 {
        let half_period = u32::from(self.warmup.half_period.max(1));
        if u32::from(remaining) % (2 * half_period) < half_period {
            self.warmup.amplitude
        } else {
            self.warmup.amplitude.saturating_neg()
        }
    }
}
