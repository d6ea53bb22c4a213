//! Loop-sound gain mapping
//!
//! Two policies, picked by config:
//!   - threshold product: loud only when dynamic pressure AND surface speed
//!     are both past their cutoffs (the dive siren)
//!   - rotational speed: loud once the rotor spins past its cutoff speed

use aviator_common::{RotorConfig, VolumePolicy};

use crate::host::LoopSound;

#[derive(Debug, Clone, PartialEq)]
pub enum VolumeMapper {
    ThresholdProduct {
        cutoff_pressure_kpa: f32,
        cutoff_velocity: f32,
        pressure_gain: f32,
        velocity_gain: f32,
        max_volume: f32,
    },
    RotationalSpeed {
        cutoff_speed: f32,
        speed_gain: f32,
        max_volume: f32,
    },
}

impl VolumeMapper {
    pub fn new(config: &RotorConfig) -> Self {
        match config.volume {
            VolumePolicy::ThresholdProduct { pressure_gain, velocity_gain } => {
                VolumeMapper::ThresholdProduct {
                    cutoff_pressure_kpa: config.cutoff_dyn_pres_kpa,
                    cutoff_velocity: config.cutoff_velocity,
                    pressure_gain,
                    velocity_gain,
                    max_volume: config.max_volume,
                }
            }
            VolumePolicy::RotationalSpeed { speed_gain } => VolumeMapper::RotationalSpeed {
                cutoff_speed: config.cutoff_rotational_speed,
                speed_gain,
                max_volume: config.max_volume,
            },
        }
    }

    /// Gain in `[0, max_volume]` for the current flight state
    pub fn volume(&self, dynamic_pressure_kpa: f32, surface_speed: f32, rotational_speed: f32) -> f32 {
        match *self {
            VolumeMapper::ThresholdProduct {
                cutoff_pressure_kpa,
                cutoff_velocity,
                pressure_gain,
                velocity_gain,
                max_volume,
            } => {
                let pressure_factor = (dynamic_pressure_kpa - cutoff_pressure_kpa) * pressure_gain;
                if pressure_factor <= 0.0 {
                    return 0.0;
                }
                let velocity_factor = (surface_speed - cutoff_velocity) * velocity_gain;
                if velocity_factor <= 0.0 {
                    return 0.0;
                }
                (pressure_factor * velocity_factor).min(1.0) * max_volume
            }
            VolumeMapper::RotationalSpeed { cutoff_speed, speed_gain, max_volume } => {
                let factor = (rotational_speed - cutoff_speed) * speed_gain;
                if factor <= 0.0 {
                    return 0.0;
                }
                factor.min(1.0) * max_volume
            }
        }
    }
}

/// What [`drive_loop`] did to the sound this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopTransition {
    Started,
    Stopped,
    /// Gain may have changed; playback state didn't
    Unchanged,
}

/// Push a gain to the loop sound, starting or stopping it only on a change
/// between silent and audible.
pub fn drive_loop<S: LoopSound + ?Sized>(sound: &mut S, volume: f32) -> LoopTransition {
    if volume > 0.0 {
        sound.set_volume(volume);
        if !sound.is_playing() {
            sound.play();
            return LoopTransition::Started;
        }
    } else if sound.is_playing() {
        sound.set_volume(0.0);
        sound.stop();
        return LoopTransition::Stopped;
    }
    LoopTransition::Unchanged
}
