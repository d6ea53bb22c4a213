//! Scripted flight profiles
//!
//! Each profile maps elapsed time to airspeed and altitude. Dynamic pressure
//! comes from the ISA troposphere density at that altitude. The aircraft
//! always flies along +Z, the hub axis of the headless scene.

use aviator_rotor::FlightSample;
use clap::ValueEnum;
use glam::Vec3;

/// Sea-level density (kg/m³)
const RHO0: f32 = 1.225;
/// Sea-level temperature (K)
const T0: f32 = 288.15;
/// Temperature lapse rate (K/m)
const LAPSE: f32 = 0.0065;
/// Density exponent g/(R·L) - 1 for the troposphere
const DENSITY_EXP: f32 = 4.25588;

/// Air density at altitude, valid up to ~11 km
pub fn isa_density(altitude_m: f32) -> f32 {
    let a = 1.0 - LAPSE * altitude_m / T0;
    RHO0 * a.max(0.0).powf(DENSITY_EXP)
}

/// Dynamic pressure q = ½ρv², in kPa
pub fn dynamic_pressure_kpa(density: f32, speed: f32) -> f32 {
    0.5 * density * speed * speed / 1000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// Ground roll from standstill up to climb speed, then a slow climb
    Takeoff,
    /// Level cruise, a steep dive past the siren threshold, and pull-out
    Dive,
    /// Fixed 210 m/s at sea level
    Constant,
}

impl Profile {
    /// Airspeed (m/s) and altitude (m) at time `t` seconds
    pub fn state_at(&self, t: f32) -> (f32, f32) {
        match self {
            Profile::Takeoff => {
                if t < 30.0 {
                    (t * 3.0, 0.0)
                } else {
                    (90.0, (t - 30.0) * 8.0)
                }
            }
            Profile::Dive => {
                if t < 10.0 {
                    (80.0, 4000.0)
                } else if t < 30.0 {
                    // Accelerating dive, 4000 m → 1000 m
                    let f = (t - 10.0) / 20.0;
                    (80.0 + 170.0 * f, 4000.0 - 3000.0 * f)
                } else if t < 45.0 {
                    // Pull-out, bleeding speed back off
                    let f = (t - 30.0) / 15.0;
                    (250.0 - 170.0 * f, 1000.0)
                } else {
                    (80.0, 1000.0)
                }
            }
            Profile::Constant => (210.0, 0.0),
        }
    }

    pub fn sample(&self, t: f32) -> FlightSample {
        let (speed, altitude) = self.state_at(t);
        FlightSample {
            velocity: Vec3::Z * speed,
            surface_speed: speed,
            dynamic_pressure_kpa: dynamic_pressure_kpa(isa_density(altitude), speed),
        }
    }
}
