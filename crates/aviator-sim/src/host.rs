//! Headless host scene for the harness
//!
//! Transforms only track visibility and accumulated spin. The loop sound is
//! either a silent recorder or, with the `audio` feature, a real output
//! device.

use std::path::PathBuf;

use aviator_rotor::{HostResolver, LoopSettings, LoopSound, ResolveError, SceneTransform};
use glam::Vec3;

#[derive(Debug)]
pub struct HeadlessTransform {
    name: String,
    axis: Vec3,
    visible: bool,
    /// Accumulated spin, wrapped to [0, 360)
    angle: f32,
}

impl SceneTransform for HeadlessTransform {
    fn set_visible(&mut self, visible: bool) {
        if visible != self.visible {
            tracing::debug!("'{}' visible={}", self.name, visible);
        }
        self.visible = visible;
    }

    fn rotate(&mut self, _axis: Vec3, angle: f32) {
        self.angle = (self.angle + angle).rem_euclid(360.0);
    }

    fn axis(&self) -> Vec3 {
        self.axis
    }
}

/// Records what the component asked of its loop sound
#[derive(Debug, Default)]
pub struct SilentLoop {
    playing: bool,
    volume: f32,
}

pub enum SimSound {
    Silent(SilentLoop),
    #[cfg(feature = "audio")]
    Device(crate::audio::DeviceLoop),
}

impl LoopSound for SimSound {
    fn is_playing(&self) -> bool {
        match self {
            SimSound::Silent(s) => s.playing,
            #[cfg(feature = "audio")]
            SimSound::Device(d) => d.is_playing(),
        }
    }

    fn play(&mut self) {
        match self {
            SimSound::Silent(s) => s.playing = true,
            #[cfg(feature = "audio")]
            SimSound::Device(d) => d.play(),
        }
    }

    fn stop(&mut self) {
        match self {
            SimSound::Silent(s) => s.playing = false,
            #[cfg(feature = "audio")]
            SimSound::Device(d) => d.stop(),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        match self {
            SimSound::Silent(s) => {
                if (volume - s.volume).abs() > 0.05 {
                    tracing::trace!("loop volume {:.2} -> {:.2}", s.volume, volume);
                }
                s.volume = volume;
            }
            #[cfg(feature = "audio")]
            SimSound::Device(d) => d.set_volume(volume),
        }
    }
}

/// Resolves every named transform to a headless one spinning about `axis`
pub struct HeadlessScene {
    axis: Vec3,
    /// Audio file to play for the loop clip (requires the `audio` feature)
    audio_file: Option<PathBuf>,
}

impl HeadlessScene {
    pub fn new(axis: Vec3, audio_file: Option<PathBuf>) -> Self {
        Self { axis, audio_file }
    }
}

impl HostResolver for HeadlessScene {
    type Transform = HeadlessTransform;
    type Sound = SimSound;

    fn resolve_transform(&mut self, name: &str) -> Result<HeadlessTransform, ResolveError> {
        if name.is_empty() {
            return Err(ResolveError::TransformNotFound(name.to_string()));
        }
        Ok(HeadlessTransform {
            name: name.to_string(),
            axis: self.axis,
            visible: false,
            angle: 0.0,
        })
    }

    fn resolve_loop_sound(
        &mut self,
        clip: &str,
        settings: &LoopSettings,
    ) -> Result<SimSound, ResolveError> {
        match &self.audio_file {
            #[cfg(feature = "audio")]
            Some(path) => {
                tracing::info!("Loop clip '{}' -> {}", clip, path.display());
                crate::audio::DeviceLoop::open(path, settings).map(SimSound::Device)
            }
            #[cfg(not(feature = "audio"))]
            Some(path) => Err(ResolveError::Backend(format!(
                "cannot play {} for clip '{}': built without the `audio` feature",
                path.display(),
                clip
            ))),
            None => Ok(SimSound::Silent(SilentLoop {
                playing: false,
                volume: settings.initial_volume,
            })),
        }
    }
}
