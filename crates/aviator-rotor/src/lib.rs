//! Procedural rotor response for simulated aircraft parts
//!
//! This crate handles:
//! - Rotational-speed estimation from airspeed and dynamic pressure
//! - Loop-sound gain mapping and play/stop control
//! - Blade/disk mesh swapping and per-frame spin
//!
//! The host game owns transforms, audio and scheduling. It hands them in
//! through the traits in [`host`] and calls [`RotorComponent::on_fixed_tick`]
//! and [`RotorComponent::on_frame_tick`].

pub mod component;
pub mod error;
pub mod estimator;
pub mod host;
pub mod presentation;
pub mod volume;

#[cfg(test)]
pub(crate) mod testing;

pub use component::{FlightSample, FrameOutput, RotorComponent};
pub use error::{Result, RotorError};
pub use estimator::SpeedEstimator;
pub use host::{HostResolver, LoopSound, ResolveError, SceneTransform};
pub use presentation::{PresentationMode, PresentationSelector, RotorVisuals};
pub use volume::{drive_loop, LoopTransition, VolumeMapper};

pub use aviator_common::{LoopSettings, PresentationConfig, RotorConfig, SpinMode, VolumePolicy};
