//! Rotational-speed estimator
//!
//! Each fixed tick the rotor speed:
//!   - decays toward zero through mechanical friction
//!   - chases a target proportional to forward airspeed, faster in thicker air
//!   - is clamped to ±max_rotational_speed
//!
//! Both passes are first-order lags with the per-step rate capped at
//! `ANTI_OVERSHOOT × |error|`, so a coarse timestep can't fling the speed past
//! its target.

use aviator_common::RotorConfig;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum rate, as a fraction of the remaining error, for one lag step
pub const ANTI_OVERSHOOT: f32 = 0.6;

// ---------------------------------------------------------------------------
// SpeedEstimator
// ---------------------------------------------------------------------------

/// Continuous rotor-speed state plus the gains that drive it
#[derive(Debug, Clone)]
pub struct SpeedEstimator {
    /// Rotational speed per m/s of forward velocity
    velocity_to_speed_gain: f32,
    /// Tracking gain per kPa of dynamic pressure
    pressure_scaling: f32,
    friction_decay: f32,
    max_speed: f32,
    current: f32,
    /// Last computed target (diagnostics only)
    target: f32,
}

/// Change in value for one clamped lag step toward `error`
fn lag_step(error: f32, gain: f32, dt: f32) -> f32 {
    let limit = ANTI_OVERSHOOT * error.abs();
    // max/min rather than clamp: NaN inputs propagate instead of panicking
    let rate = (error * gain).max(-limit).min(limit);
    rate * dt
}

impl SpeedEstimator {
    pub fn new(config: &RotorConfig) -> Self {
        Self {
            velocity_to_speed_gain: config.velocity_to_speed_gain(),
            pressure_scaling: config.pressure_scaling,
            friction_decay: config.friction_decay,
            max_speed: config.max_rotational_speed,
            current: 0.0,
            target: 0.0,
        }
    }

    /// Advance one fixed tick and return the new rotational speed
    pub fn step(&mut self, forward_velocity: f32, dynamic_pressure_kpa: f32, dt: f32) -> f32 {
        // --- Friction ---
        self.current += lag_step(-self.current, self.friction_decay, dt);

        // --- Airspeed tracking ---
        self.target = self.velocity_to_speed_gain * forward_velocity;
        let error = self.target - self.current;
        self.current += lag_step(error, dynamic_pressure_kpa * self.pressure_scaling, dt);

        self.current = self.current.max(-self.max_speed).min(self.max_speed);
        self.current
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Target speed for a given forward velocity, without stepping
    pub fn target_for(&self, forward_velocity: f32) -> f32 {
        self.velocity_to_speed_gain * forward_velocity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
