//! Configuration records shared across Aviator Arsenal crates
//!
//! A rotor part is configured once, when the host loads it, and the record is
//! never mutated afterwards. Every field has a default so a part file only
//! needs to list what differs from the stock propeller.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid config value `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// How the loop-sound gain is derived each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum VolumePolicy {
    /// Gated on both dynamic pressure and surface speed being above cutoff
    ThresholdProduct {
        #[serde(default = "default_pressure_gain")]
        pressure_gain: f32,
        #[serde(default = "default_velocity_gain")]
        velocity_gain: f32,
    },
    /// Gated on the estimated rotational speed being above cutoff
    RotationalSpeed {
        #[serde(default = "default_speed_gain")]
        speed_gain: f32,
    },
}

fn default_pressure_gain() -> f32 {
    0.1
}

fn default_velocity_gain() -> f32 {
    10.0
}

fn default_speed_gain() -> f32 {
    0.002
}

impl Default for VolumePolicy {
    fn default() -> Self {
        VolumePolicy::ThresholdProduct {
            pressure_gain: default_pressure_gain(),
            velocity_gain: default_velocity_gain(),
        }
    }
}

/// How the per-frame visual rotation relates to frame time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinMode {
    /// Rotate by the speed value every frame, whatever the frame length
    #[default]
    PerFrame,
    /// Rotate by speed × frame dt
    PerSecond,
}

/// Mesh swap + spin setup. Absent for parts with no visual rotor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Blade mesh shown at low speed
    pub discrete_transform: String,
    /// Blurred disk mesh shown at high speed
    pub disk_transform: String,
    /// Transform whose axis the rotor spins around
    pub axis_transform: String,
    pub mesh_switch_threshold: f32,
    pub disk_rotation_scale: f32,
    pub spin: SpinMode,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            discrete_transform: String::new(),
            disk_transform: String::new(),
            axis_transform: String::new(),
            mesh_switch_threshold: 300.0,
            disk_rotation_scale: 0.25,
            spin: SpinMode::PerFrame,
        }
    }
}

/// Audio source setup for the loop cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopSettings {
    pub doppler_level: f32,
    pub priority: u8,
    pub bypass_listener_effects: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub initial_volume: f32,
    pub looping: bool,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            doppler_level: 1.0,
            priority: 5,
            bypass_listener_effects: true,
            min_distance: 0.1,
            max_distance: 2000.0,
            initial_volume: 0.0,
            looping: true,
        }
    }
}

/// Static configuration for one rotor part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotorConfig {
    /// Airspeed (m/s) at which the rotor reaches `cutoff_rotational_speed`
    pub cutoff_velocity: f32,
    /// Dynamic pressure (kPa) below which the threshold-product cue is silent
    pub cutoff_dyn_pres_kpa: f32,
    pub cutoff_rotational_speed: f32,
    pub max_rotational_speed: f32,
    /// Velocity-tracking gain per kPa of dynamic pressure
    pub pressure_scaling: f32,
    pub friction_decay: f32,
    pub max_volume: f32,
    pub audio_clip_name: String,
    pub volume: VolumePolicy,
    pub presentation: Option<PresentationConfig>,
    pub audio: LoopSettings,
}

impl Default for RotorConfig {
    fn default() -> Self {
        Self {
            cutoff_velocity: 110.0,
            cutoff_dyn_pres_kpa: 7.5,
            cutoff_rotational_speed: 300.0,
            max_rotational_speed: 1000.0,
            pressure_scaling: 0.05,
            friction_decay: 0.05,
            max_volume: 1.0,
            audio_clip_name: String::new(),
            volume: VolumePolicy::default(),
            presentation: None,
            audio: LoopSettings::default(),
        }
    }
}

impl RotorConfig {
    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RotorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(
            "Loaded rotor config from {} (clip '{}', presentation: {})",
            path.display(),
            config.audio_clip_name,
            config.presentation.is_some()
        );
        Ok(config)
    }

    /// Rotational speed reached per m/s of forward velocity
    pub fn velocity_to_speed_gain(&self) -> f32 {
        self.cutoff_rotational_speed / self.cutoff_velocity
    }

    /// Reject numbers that would leave the rotor model undefined.
    /// Resource names are checked when the component resolves them.
    pub fn validate(&self) -> Result<()> {
        if self.cutoff_velocity == 0.0 || !self.cutoff_velocity.is_finite() {
            return Err(invalid("cutoff_velocity", "must be finite and non-zero"));
        }
        if !(self.max_rotational_speed.is_finite() && self.max_rotational_speed >= 0.0) {
            return Err(invalid("max_rotational_speed", "must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&self.max_volume) {
            return Err(invalid("max_volume", "must be within [0, 1]"));
        }

        let gains = [
            ("cutoff_dyn_pres_kpa", self.cutoff_dyn_pres_kpa),
            ("cutoff_rotational_speed", self.cutoff_rotational_speed),
            ("pressure_scaling", self.pressure_scaling),
            ("friction_decay", self.friction_decay),
        ];
        for (field, value) in gains {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }

        match self.volume {
            VolumePolicy::ThresholdProduct { pressure_gain, velocity_gain } => {
                if !(pressure_gain.is_finite() && velocity_gain.is_finite()) {
                    return Err(invalid("volume", "gains must be finite"));
                }
            }
            VolumePolicy::RotationalSpeed { speed_gain } => {
                if !speed_gain.is_finite() {
                    return Err(invalid("volume", "speed_gain must be finite"));
                }
            }
        }

        if let Some(p) = &self.presentation {
            if !(p.mesh_switch_threshold.is_finite() && p.disk_rotation_scale.is_finite()) {
                return Err(invalid("presentation", "threshold and scale must be finite"));
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}
