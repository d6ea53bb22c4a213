//! Blade/disk mesh swap and visual spin
//!
//! A rotor shows its individual blades at low speed and a blurred disk once
//! it spins past `mesh_switch_threshold`. Whichever mesh is visible is
//! rotated every frame by an angle proportional to the rotor speed.

use glam::Vec3;

use aviator_common::{PresentationConfig, SpinMode};

use crate::host::SceneTransform;

/// Which rotor mesh is currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    Discrete,
    Disk,
}

impl PresentationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationMode::Discrete => "discrete",
            PresentationMode::Disk => "disk",
        }
    }
}

/// Two-state mesh selector. Holds its mode at exactly the threshold.
#[derive(Debug, Clone)]
pub struct PresentationSelector {
    threshold: f32,
    disk_scale: f32,
    spin: SpinMode,
    mode: PresentationMode,
}

impl PresentationSelector {
    pub fn new(config: &PresentationConfig) -> Self {
        Self {
            threshold: config.mesh_switch_threshold,
            disk_scale: config.disk_rotation_scale,
            spin: config.spin,
            mode: PresentationMode::Discrete,
        }
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    /// Feed the current speed; returns the new mode if it changed
    pub fn update(&mut self, rotational_speed: f32) -> Option<PresentationMode> {
        let next = match self.mode {
            PresentationMode::Discrete if rotational_speed > self.threshold => PresentationMode::Disk,
            PresentationMode::Disk if rotational_speed < self.threshold => PresentationMode::Discrete,
            _ => return None,
        };
        self.mode = next;
        Some(next)
    }

    /// Rotation to apply to the visible mesh this frame
    pub fn rotation_delta(&self, rotational_speed: f32, frame_dt: f32) -> f32 {
        let delta = match self.mode {
            PresentationMode::Discrete => rotational_speed,
            PresentationMode::Disk => rotational_speed * self.disk_scale,
        };
        match self.spin {
            SpinMode::PerFrame => delta,
            SpinMode::PerSecond => delta * frame_dt,
        }
    }
}

/// The three resolved rotor transforms plus the selector that drives them
#[derive(Debug)]
pub struct RotorVisuals<T> {
    discrete: T,
    disk: T,
    axis: T,
    selector: PresentationSelector,
}

impl<T: SceneTransform> RotorVisuals<T> {
    /// Wrap resolved handles and show the blade mesh
    pub fn new(config: &PresentationConfig, discrete: T, disk: T, axis: T) -> Self {
        let mut visuals = Self {
            discrete,
            disk,
            axis,
            selector: PresentationSelector::new(config),
        };
        visuals.apply_visibility();
        visuals
    }

    pub fn mode(&self) -> PresentationMode {
        self.selector.mode()
    }

    /// Unit spin axis, or zero if the host reports a degenerate axis
    pub fn spin_axis(&self) -> Vec3 {
        self.axis.axis().normalize_or_zero()
    }

    /// Per-frame update: swap meshes if needed, then spin the visible one.
    /// Returns the new mode on a swap.
    pub fn frame(&mut self, rotational_speed: f32, frame_dt: f32) -> Option<PresentationMode> {
        let changed = self.selector.update(rotational_speed);
        if let Some(mode) = changed {
            tracing::info!("Rotor mesh -> {} at speed {:.1}", mode.as_str(), rotational_speed);
            self.apply_visibility();
        }

        let axis = self.spin_axis();
        let delta = self.selector.rotation_delta(rotational_speed, frame_dt);
        match self.selector.mode() {
            PresentationMode::Discrete => self.discrete.rotate(axis, delta),
            PresentationMode::Disk => self.disk.rotate(axis, delta),
        }
        changed
    }

    fn apply_visibility(&mut self) {
        let disk = self.selector.mode() == PresentationMode::Disk;
        self.disk.set_visible(disk);
        self.discrete.set_visible(!disk);
    }
}
