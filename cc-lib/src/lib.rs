// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! C interface of the crazycar controller.
//!
//! The simulator loads this library and calls it once per tick, always in the same
//! order: acknowledge the applied throttle and steering, push the three sensor
//! readings, run [regelungtechnik] and read back [getfwert] and [getswert].
//!
//! The exported names are the ones the simulator binds to and must not change.
//! `include/cc-lib.h` declares all of them.
//!
//! The controller state exists once per process and lives as long as the process.

#![allow(non_snake_case)]

use cc_control::prelude::*;
use cc_log::{debug, info, warn};
use std::ffi::c_int;
use std::sync::{LazyLock, Mutex, PoisonError};

pub use cc_log::ffi::{cc_log, cc_max_level, cc_set_max_level};
pub use cc_logger::ffi::cc_logger_init;

/// Process-wide controller state
#[derive(Debug)]
struct State {
    config: Config,
    ctx: Context,
    driver: Driver,
}

impl State {
    fn new(config: Config) -> Self {
        Self {
            ctx: Context::new(config.linearization),
            driver: Driver::new(&config),
            config,
        }
    }
}

static STATE: LazyLock<Mutex<State>> = LazyLock::new(|| Mutex::new(State::new(Config::default())));

/// Run `f` on the process-wide state.
fn with_state<R>(f: impl FnOnce(&mut State) -> R) -> R {
    // A panic while holding the lock cannot leave the plain integer cells inconsistent.
    let mut state = STATE.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut state)
}

/// Set the throttle command.
#[no_mangle]
pub extern "C" fn fahr(f: c_int) {
    with_state(|s| s.ctx.set_throttle_command(f));
}

/// Get the throttle command.
#[no_mangle]
pub extern "C" fn getfwert() -> c_int {
    with_state(|s| s.ctx.throttle_command())
}

/// Set the steering command.
#[no_mangle]
pub extern "C" fn servo(s: c_int) {
    with_state(|state| state.ctx.set_steer_command(s));
}

/// Get the steering command.
#[no_mangle]
pub extern "C" fn getswert() -> c_int {
    with_state(|s| s.ctx.steer_command())
}

/// Acknowledge the throttle the simulator applied.
#[no_mangle]
pub extern "C" fn getfahr(leistung: i8) {
    with_state(|s| s.ctx.acknowledge_power(leistung));
}

/// Get the acknowledged throttle.
#[no_mangle]
pub extern "C" fn getFahr() -> i8 {
    with_state(|s| s.ctx.current_power())
}

/// Acknowledge the steering angle the simulator applied.
#[no_mangle]
pub extern "C" fn getservo(winkel: i8) {
    with_state(|s| s.ctx.acknowledge_steer(winkel));
}

/// Get the acknowledged steering angle.
#[no_mangle]
pub extern "C" fn getServo() -> i8 {
    with_state(|s| s.ctx.current_steer())
}

/// Linearize and store a front sensor reading. Returns the distance in cm.
#[no_mangle]
pub extern "C" fn getabstandvorne(analogwert: u16) -> u16 {
    with_state(|s| s.ctx.update_front(analogwert))
}

/// Linearize and store a right sensor reading. `cos_alpha` is `cos * 100` of the mounting angle.
#[no_mangle]
pub extern "C" fn getabstandrechts(analogwert: u16, cos_alpha: u8) -> u16 {
    with_state(|s| s.ctx.update_right(analogwert, cos_alpha))
}

/// Linearize and store a left sensor reading. `cos_alpha` is `cos * 100` of the mounting angle.
#[no_mangle]
pub extern "C" fn getabstandlinks(analogwert: u16, cos_alpha: u8) -> u16 {
    with_state(|s| s.ctx.update_left(analogwert, cos_alpha))
}

#[no_mangle]
pub extern "C" fn get_abstandvorne() -> u16 {
    with_state(|s| s.ctx.distances().front)
}

#[no_mangle]
pub extern "C" fn get_abstandrechts() -> u16 {
    with_state(|s| s.ctx.distances().right)
}

#[no_mangle]
pub extern "C" fn get_abstandlinks() -> u16 {
    with_state(|s| s.ctx.distances().left)
}

/// Run one controller tick.
#[no_mangle]
pub extern "C" fn regelungtechnik() {
    with_state(|s| {
        s.driver.tick(&mut s.ctx);
        debug!(
            "Controller output: throttle {} steer {}",
            s.ctx.throttle_command(),
            s.ctx.steer_command()
        );
    });
}

/// Convert an ADC value without touching any state.
#[no_mangle]
pub extern "C" fn linearisierungAD(messwert: u16, cos_alpha: u8) -> u16 {
    linearize(messwert, cos_alpha)
}

/// Restore the load-time state. The selected policy and warmup length are kept.
#[no_mangle]
pub extern "C" fn cc_reset() {
    with_state(|s| {
        s.ctx.reset();
        s.driver.reset();
        info!("Controller reset, policy {}", s.driver.policy_name());
    });
}

/// Number of controller ticks since load or the last reset.
#[no_mangle]
pub extern "C" fn cc_tick_count() -> u64 {
    with_state(|s| s.driver.ticks())
}

/// Select the policy (`0` avoidance, `1` zone throttle) and the number of warmup ticks.
///
/// Restarts the policy including its warmup. Returns `false` and changes nothing if
/// the selection is invalid.
#[no_mangle]
pub extern "C" fn cc_configure(policy: u8, warmup_ticks: u16) -> bool {
    let Ok(kind) = PolicyKind::try_from(policy) else {
        warn!("Unknown policy {policy}");
        return false;
    };

    with_state(|s| {
        let mut config = s.config;
        config.policy = kind;
        config.warmup.ticks = warmup_ticks;
        if let Err(e) = config.validate() {
            warn!("Rejected configuration: {e}");
            return false;
        }

        s.config = config;
        s.driver = Driver::new(&config);
        info!("Configured policy {} with {warmup_ticks} warmup ticks", s.driver.policy_name());
        true
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::MutexGuard;

    /// The exported functions share one state. Tests take turns.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    fn fresh() -> MutexGuard<'static, ()> {
        let guard = TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        assert!(cc_configure(0, 0));
        cc_reset();
        guard
    }

    /// One simulator tick with ADC readings in the order front, left, right.
    fn tick(power: i8, front: u16, left: u16, right: u16, cos_alpha: u8) -> (c_int, c_int) {
        getfahr(power);
        getabstandvorne(front);
        getabstandlinks(left, cos_alpha);
        getabstandrechts(right, cos_alpha);
        regelungtechnik();
        (getfwert(), getswert())
    }

    #[test]
    fn state_starts_zeroed() {
        let _guard = fresh();
        assert_eq!(getfwert(), 0);
        assert_eq!(getswert(), 0);
        assert_eq!(getFahr(), 0);
        assert_eq!(getServo(), 0);
        assert_eq!(get_abstandvorne(), 0);
        assert_eq!(get_abstandlinks(), 0);
        assert_eq!(get_abstandrechts(), 0);
        assert_eq!(cc_tick_count(), 0);
    }

    #[test]
    fn setters_round_trip() {
        let _guard = fresh();
        fahr(-42);
        servo(7);
        getfahr(-20);
        getservo(-10);
        assert_eq!(getfwert(), -42);
        assert_eq!(getswert(), 7);
        assert_eq!(getFahr(), -20);
        assert_eq!(getServo(), -10);
    }

    #[test]
    fn sensor_updates_store_distances() {
        let _guard = fresh();
        assert_eq!(getabstandvorne(163), 130);
        assert_eq!(getabstandlinks(770, 100), 30);
        assert_eq!(getabstandrechts(770, 0), 3000);
        assert_eq!(get_abstandvorne(), 130);
        assert_eq!(get_abstandlinks(), 30);
        assert_eq!(get_abstandrechts(), 3000);
        assert_eq!(linearisierungAD(163, 100), 130);
        assert_eq!(get_abstandvorne(), 130);
    }

    #[test]
    fn avoidance_scenario() {
        let _guard = fresh();
        // front 20 cm, left 60 cm, right 40 cm
        let lin = cc_control::linearization::Linearization::default();
        let (front, left, right) = (
            lin.adc_from_distance(20),
            lin.adc_from_distance(60),
            lin.adc_from_distance(40),
        );
        assert_eq!(tick(10, front, left, right, 100), (-20, 10));
        assert_eq!(cc_tick_count(), 1);
    }

    #[test]
    fn balanced_cruise_scenario() {
        let _guard = fresh();
        let lin = cc_control::linearization::Linearization::default();
        let front = lin.adc_from_distance(120);
        let side = lin.adc_from_distance(50);
        let (throttle, steer) = tick(30, front, side, side, 100);
        assert!(throttle >= 18);
        assert_eq!(steer, 0);
    }

    #[test]
    fn configure_warmup_and_zones() {
        let _guard = fresh();
        assert!(!cc_configure(9, 0));
        assert!(cc_configure(1, 2));

        assert_eq!(tick(0, 219, 219, 219, 100), (0, 10));
        assert_eq!(tick(0, 219, 219, 219, 100), (0, 10));
        // Zone policy: far zone from standstill
        let (throttle, _) = tick(0, 99, 219, 219, 100);
        assert!(throttle > 18);

        cc_reset();
        assert_eq!(cc_tick_count(), 0);
        assert_eq!(getfwert(), 0);
        // Warmup runs again after a reset
        assert_eq!(tick(0, 99, 219, 219, 100), (0, 10));
    }
}
