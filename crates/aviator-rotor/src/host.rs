//! Capabilities the host game provides to a rotor component
//!
//! Handles are opaque to the core. It only shows, hides and rotates
//! transforms, and starts, stops and sets the gain of one looping sound.

use glam::Vec3;
use thiserror::Error;

use aviator_common::LoopSettings;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Transform not found: {0}")]
    TransformNotFound(String),

    #[error("Audio clip not found: {0}")]
    ClipNotFound(String),

    #[error("Host backend error: {0}")]
    Backend(String),
}

/// A transform in the host's scene graph
pub trait SceneTransform {
    /// Show or hide the transform's mesh
    fn set_visible(&mut self, visible: bool);

    /// Apply an incremental rotation around a world-space axis
    fn rotate(&mut self, axis: Vec3, angle: f32);

    /// Spin axis of this transform in world space
    fn axis(&self) -> Vec3;
}

/// A looping audio source attached to the part
pub trait LoopSound {
    fn is_playing(&self) -> bool;
    fn play(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
}

/// Resolves configured names into host handles, once, at start-up
pub trait HostResolver {
    type Transform: SceneTransform;
    type Sound: LoopSound;

    fn resolve_transform(&mut self, name: &str) -> Result<Self::Transform, ResolveError>;

    /// Create a looping source for `clip` configured with `settings`
    fn resolve_loop_sound(
        &mut self,
        clip: &str,
        settings: &LoopSettings,
    ) -> Result<Self::Sound, ResolveError>;
}
