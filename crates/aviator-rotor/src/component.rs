//! Rotor component lifecycle and the two host callbacks
//!
//! The host drives a component with:
//!   - `start` once, after the part is loaded (resolves handles, marks ready)
//!   - `on_fixed_tick` every physics step (speed estimator)
//!   - `on_frame_tick` every rendered frame (loop sound + meshes)
//!
//! Callbacks are no-ops while the flight scene is inactive, before `start`
//! succeeded, or after a failed `start` disabled the component.

use glam::Vec3;

use aviator_common::RotorConfig;

use crate::error::{Result, RotorError};
use crate::estimator::SpeedEstimator;
use crate::host::{HostResolver, LoopSound, SceneTransform};
use crate::presentation::{PresentationMode, RotorVisuals};
use crate::volume::{drive_loop, LoopTransition, VolumeMapper};

/// Vehicle state sampled by the host for one callback
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlightSample {
    /// Vessel velocity relative to the air, world space (m/s)
    pub velocity: Vec3,
    /// Speed relative to the surrounding air (m/s)
    pub surface_speed: f32,
    pub dynamic_pressure_kpa: f32,
}

/// Everything a frame tick pushed out to the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub rotational_speed: f32,
    pub volume: f32,
    pub cue: LoopTransition,
    /// `None` for parts without a visual rotor
    pub mode: Option<PresentationMode>,
    pub mode_changed: bool,
}

pub struct RotorComponent<T, S> {
    config: RotorConfig,
    estimator: SpeedEstimator,
    mapper: VolumeMapper,
    visuals: Option<RotorVisuals<T>>,
    sound: Option<S>,
    volume: f32,
    ready: bool,
    disabled: bool,
}

impl<T: SceneTransform, S: LoopSound> RotorComponent<T, S> {
    /// Create an unstarted component. Ticks are ignored until [`start`](Self::start).
    pub fn new(config: RotorConfig) -> Self {
        Self {
            estimator: SpeedEstimator::new(&config),
            mapper: VolumeMapper::new(&config),
            config,
            visuals: None,
            sound: None,
            volume: 0.0,
            ready: false,
            disabled: false,
        }
    }

    /// Create and start a component. Failures are logged and leave the
    /// component permanently disabled.
    pub fn initialize<R>(config: RotorConfig, resolver: &mut R) -> Self
    where
        R: HostResolver<Transform = T, Sound = S>,
    {
        let mut component = Self::new(config);
        // Already logged by start()
        let _ = component.start(resolver);
        component
    }

    /// Create and start a component, returning the failure instead of a
    /// disabled component.
    pub fn try_initialize<R>(config: RotorConfig, resolver: &mut R) -> Result<Self>
    where
        R: HostResolver<Transform = T, Sound = S>,
    {
        let mut component = Self::new(config);
        component.start(resolver)?;
        Ok(component)
    }

    /// Validate config and resolve every host handle. Any failure disables
    /// the component for good.
    pub fn start<R>(&mut self, resolver: &mut R) -> Result<()>
    where
        R: HostResolver<Transform = T, Sound = S>,
    {
        if self.disabled {
            return Err(RotorError::Disabled);
        }
        if self.ready {
            tracing::debug!("Rotor module already started");
            return Ok(());
        }

        match self.resolve(resolver) {
            Ok((visuals, sound)) => {
                self.visuals = visuals;
                self.sound = Some(sound);
                self.ready = true;
                tracing::info!(
                    "Rotor module ready (clip '{}', visual rotor: {})",
                    self.config.audio_clip_name,
                    self.visuals.is_some()
                );
                Ok(())
            }
            Err(e) => {
                self.disabled = true;
                tracing::error!("Rotor module disabled: {}", e);
                Err(e)
            }
        }
    }

    fn resolve<R>(&self, resolver: &mut R) -> Result<(Option<RotorVisuals<T>>, S)>
    where
        R: HostResolver<Transform = T, Sound = S>,
    {
        self.config.validate()?;

        if self.config.audio_clip_name.is_empty() {
            return Err(RotorError::MissingConfiguration("audio_clip_name"));
        }

        let visuals = match &self.config.presentation {
            Some(p) => {
                let names = [
                    ("discrete_transform", &p.discrete_transform),
                    ("disk_transform", &p.disk_transform),
                    ("axis_transform", &p.axis_transform),
                ];
                for (field, name) in names {
                    if name.is_empty() {
                        return Err(RotorError::MissingConfiguration(field));
                    }
                }

                let discrete = resolve_transform(resolver, &p.discrete_transform)?;
                let disk = resolve_transform(resolver, &p.disk_transform)?;
                let axis = resolve_transform(resolver, &p.axis_transform)?;
                Some(RotorVisuals::new(p, discrete, disk, axis))
            }
            None => None,
        };

        let clip = &self.config.audio_clip_name;
        let mut sound = resolver
            .resolve_loop_sound(clip, &self.config.audio)
            .map_err(|source| RotorError::MissingResource {
                kind: "audio clip",
                name: clip.clone(),
                source,
            })?;
        sound.set_volume(self.config.audio.initial_volume);

        Ok((visuals, sound))
    }

    /// Physics step. Returns the new rotational speed, or `None` if skipped.
    pub fn on_fixed_tick(&mut self, sample: &FlightSample, dt: f32, active: bool) -> Option<f32> {
        if !self.is_live(active) {
            return None;
        }

        let forward_velocity = match &self.visuals {
            Some(visuals) => sample.velocity.dot(visuals.spin_axis()),
            None => sample.surface_speed,
        };
        let speed = self
            .estimator
            .step(forward_velocity, sample.dynamic_pressure_kpa, dt);

        tracing::trace!(
            "fixed tick: v_fwd={:.2} q={:.2} target={:.1} speed={:.1}",
            forward_velocity,
            sample.dynamic_pressure_kpa,
            self.estimator.target(),
            speed
        );
        Some(speed)
    }

    /// Frame step: loop sound gain/playback, then mesh swap and spin.
    pub fn on_frame_tick(
        &mut self,
        sample: &FlightSample,
        frame_dt: f32,
        active: bool,
    ) -> Option<FrameOutput> {
        if !self.is_live(active) {
            return None;
        }

        let rotational_speed = self.estimator.current();
        self.volume = self.mapper.volume(
            sample.dynamic_pressure_kpa,
            sample.surface_speed,
            rotational_speed,
        );

        let cue = match self.sound.as_mut() {
            Some(sound) => drive_loop(sound, self.volume),
            None => LoopTransition::Unchanged,
        };
        match cue {
            LoopTransition::Started => tracing::debug!("Loop cue started at volume {:.2}", self.volume),
            LoopTransition::Stopped => tracing::debug!("Loop cue stopped"),
            LoopTransition::Unchanged => {}
        }

        let (mode, mode_changed) = match self.visuals.as_mut() {
            Some(visuals) => {
                let changed = visuals.frame(rotational_speed, frame_dt);
                (Some(visuals.mode()), changed.is_some())
            }
            None => (None, false),
        };

        Some(FrameOutput {
            rotational_speed,
            volume: self.volume,
            cue,
            mode,
            mode_changed,
        })
    }

    fn is_live(&self, active: bool) -> bool {
        active && self.ready && !self.disabled
    }

    pub fn config(&self) -> &RotorConfig {
        &self.config
    }

    pub fn rotational_speed(&self) -> f32 {
        self.estimator.current()
    }

    pub fn target_rotational_speed(&self) -> f32 {
        self.estimator.target()
    }

    /// Last volume pushed to the loop sound
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn mode(&self) -> Option<PresentationMode> {
        self.visuals.as_ref().map(|v| v.mode())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

fn resolve_transform<R: HostResolver>(resolver: &mut R, name: &str) -> Result<R::Transform> {
    resolver
        .resolve_transform(name)
        .map_err(|source| RotorError::MissingResource {
            kind: "transform",
            name: name.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ResolveError;
    use crate::testing::{FakeResolver, FakeSound, FakeTransform};
    use aviator_common::{PresentationConfig, VolumePolicy};

    type TestRotor = RotorComponent<FakeTransform, FakeSound>;

    const CLIP: &str = "AviatorArsenal/Sounds/trumpet";

    fn trumpet_config() -> RotorConfig {
        RotorConfig {
            audio_clip_name: CLIP.to_string(),
            ..Default::default()
        }
    }

    fn propeller_config() -> RotorConfig {
        RotorConfig {
            audio_clip_name: CLIP.to_string(),
            cutoff_velocity: 100.0,
            cutoff_rotational_speed: 300.0,
            max_rotational_speed: 600.0,
            volume: VolumePolicy::RotationalSpeed { speed_gain: 0.01 },
            presentation: Some(PresentationConfig {
                discrete_transform: "blades".to_string(),
                disk_transform: "disk".to_string(),
                axis_transform: "hub".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn full_resolver() -> FakeResolver {
        FakeResolver::default()
            .with_clip(CLIP)
            .with_transform("blades", Vec3::Z)
            .with_transform("disk", Vec3::Z)
            .with_transform("hub", Vec3::Z)
    }

    fn dive() -> FlightSample {
        FlightSample {
            velocity: Vec3::new(0.0, 0.0, 210.0),
            surface_speed: 210.0,
            dynamic_pressure_kpa: 17.5,
        }
    }

    #[test]
    fn end_to_end_dive_saturates_volume() {
        let mut resolver = full_resolver();
        let mut rotor = TestRotor::initialize(trumpet_config(), &mut resolver);
        assert!(rotor.is_ready());

        let mut volumes = Vec::new();
        for _ in 0..5 {
            rotor.on_fixed_tick(&dive(), 0.02, true);
            let out = rotor.on_frame_tick(&dive(), 0.02, true).expect("live component");
            volumes.push(out.volume);
        }
        assert!(volumes.iter().all(|v| (v - 1.0).abs() < 1e-6), "volumes: {:?}", volumes);

        let sound = resolver.sound();
        assert!(sound.playing);
        assert_eq!(sound.play_calls, 1);
        assert!((sound.volume - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sound_resolved_with_loop_settings() {
        let mut resolver = full_resolver();
        let _rotor = TestRotor::initialize(trumpet_config(), &mut resolver);
        assert_eq!(resolver.sounds.len(), 1);
        let (clip, settings, _) = &resolver.sounds[0];
        assert_eq!(clip, CLIP);
        assert!(settings.looping);
        assert_eq!(settings.priority, 5);
        assert_eq!(resolver.sound().volume, 0.0);
    }

    #[test]
    fn low_pressure_is_silent() {
        let mut resolver = full_resolver();
        let mut rotor = TestRotor::initialize(trumpet_config(), &mut resolver);
        let sample = FlightSample {
            velocity: Vec3::new(0.0, 0.0, 400.0),
            surface_speed: 400.0,
            dynamic_pressure_kpa: 7.5,
        };
        for _ in 0..10 {
            rotor.on_fixed_tick(&sample, 0.02, true);
            let out = rotor.on_frame_tick(&sample, 0.016, true).expect("live component");
            assert_eq!(out.volume, 0.0);
            assert_eq!(out.cue, LoopTransition::Unchanged);
        }
        assert_eq!(resolver.sound().play_calls, 0);
    }

    #[test]
    fn inactive_scene_skips_callbacks() {
        let mut resolver = full_resolver();
        let mut rotor = TestRotor::initialize(trumpet_config(), &mut resolver);
        assert_eq!(rotor.on_fixed_tick(&dive(), 0.02, false), None);
        assert_eq!(rotor.on_frame_tick(&dive(), 0.02, false), None);
        assert_eq!(rotor.rotational_speed(), 0.0);
        assert_eq!(resolver.sound().play_calls, 0);
    }

    #[test]
    fn unstarted_component_ignores_ticks() {
        let mut rotor = TestRotor::new(trumpet_config());
        assert!(!rotor.is_ready());
        assert_eq!(rotor.on_fixed_tick(&dive(), 0.02, true), None);
        assert_eq!(rotor.on_frame_tick(&dive(), 0.02, true), None);
    }

    #[test]
    fn missing_clip_name_disables() {
        let mut resolver = full_resolver();
        let result = TestRotor::try_initialize(RotorConfig::default(), &mut resolver);
        assert!(matches!(result, Err(RotorError::MissingConfiguration("audio_clip_name"))));

        let mut rotor = TestRotor::initialize(RotorConfig::default(), &mut resolver);
        assert!(rotor.is_disabled());
        assert!(!rotor.is_ready());
        assert_eq!(rotor.on_frame_tick(&dive(), 0.02, true), None);
        assert!(resolver.sounds.is_empty());
    }

    #[test]
    fn unknown_clip_disables() {
        let mut resolver = FakeResolver::default();
        let result = TestRotor::try_initialize(trumpet_config(), &mut resolver);
        match result {
            Err(RotorError::MissingResource { kind, name, source }) => {
                assert_eq!(kind, "audio clip");
                assert_eq!(name, CLIP);
                assert_eq!(source, ResolveError::ClipNotFound(CLIP.to_string()));
            }
            other => panic!("expected MissingResource, got {:?}", other.err()),
        }
    }

    #[test]
    fn missing_disk_transform_disables() {
        let mut resolver = FakeResolver::default()
            .with_clip(CLIP)
            .with_transform("blades", Vec3::Z)
            .with_transform("hub", Vec3::Z);
        let mut rotor = TestRotor::initialize(propeller_config(), &mut resolver);
        assert!(rotor.is_disabled());
        assert_eq!(rotor.on_fixed_tick(&dive(), 0.02, true), None);
    }

    #[test]
    fn missing_axis_transform_disables() {
        let mut resolver = FakeResolver::default()
            .with_clip(CLIP)
            .with_transform("blades", Vec3::Z)
            .with_transform("disk", Vec3::Z);
        let result = TestRotor::try_initialize(propeller_config(), &mut resolver);
        assert!(matches!(
            result,
            Err(RotorError::MissingResource { kind: "transform", ref name, .. }) if name == "hub"
        ));
    }

    #[test]
    fn empty_transform_name_disables() {
        let mut config = propeller_config();
        if let Some(p) = config.presentation.as_mut() {
            p.axis_transform.clear();
        }
        let mut resolver = full_resolver();
        let result = TestRotor::try_initialize(config, &mut resolver);
        assert!(matches!(result, Err(RotorError::MissingConfiguration("axis_transform"))));
    }

    #[test]
    fn invalid_numbers_disable() {
        let config = RotorConfig { cutoff_velocity: 0.0, ..trumpet_config() };
        let mut resolver = full_resolver();
        let result = TestRotor::try_initialize(config, &mut resolver);
        assert!(matches!(result, Err(RotorError::InvalidConfig(_))));
    }

    #[test]
    fn disabled_component_cannot_restart() {
        let mut resolver = FakeResolver::default();
        let mut rotor = TestRotor::initialize(trumpet_config(), &mut resolver);
        assert!(rotor.is_disabled());

        let mut resolver = full_resolver();
        assert!(matches!(rotor.start(&mut resolver), Err(RotorError::Disabled)));
        assert!(rotor.is_disabled());
    }

    #[test]
    fn propeller_spin_up_swaps_to_disk_once() {
        let mut resolver = full_resolver();
        let mut rotor = TestRotor::initialize(propeller_config(), &mut resolver);
        assert_eq!(rotor.mode(), Some(PresentationMode::Discrete));

        // Forward airflow along the hub axis: target 3 × 200 = 600
        let fast = FlightSample {
            velocity: Vec3::new(0.0, 0.0, 200.0),
            surface_speed: 200.0,
            dynamic_pressure_kpa: 24.5,
        };
        let mut swaps = 0;
        for _ in 0..500 {
            let speed = rotor.on_fixed_tick(&fast, 0.02, true).expect("live component");
            assert!(speed.abs() <= 600.0);
            let out = rotor.on_frame_tick(&fast, 0.016, true).expect("live component");
            if out.mode_changed {
                swaps += 1;
                assert_eq!(out.mode, Some(PresentationMode::Disk));
                assert!(out.rotational_speed > 300.0);
            }
        }
        assert_eq!(swaps, 1);
        assert_eq!(rotor.mode(), Some(PresentationMode::Disk));
        assert!(rotor.volume() > 0.0);
        assert_eq!(resolver.transform("disk").visible, Some(true));
        assert_eq!(resolver.transform("blades").visible, Some(false));
        assert!(resolver.transform("disk").total_angle > 0.0);

        // Engine-off glide in thin air: friction winds it back down
        let still = FlightSample::default();
        for _ in 0..5000 {
            rotor.on_fixed_tick(&still, 0.02, true);
            rotor.on_frame_tick(&still, 0.016, true);
        }
        assert_eq!(rotor.mode(), Some(PresentationMode::Discrete));
        assert_eq!(rotor.volume(), 0.0);
        assert_eq!(resolver.sound().stop_calls, 1);
        assert_eq!(resolver.transform("blades").visible, Some(true));
    }

    #[test]
    fn crossflow_does_not_spin_rotor() {
        let mut resolver = full_resolver();
        let mut rotor = TestRotor::initialize(propeller_config(), &mut resolver);
        let sideways = FlightSample {
            velocity: Vec3::new(150.0, 0.0, 0.0),
            surface_speed: 150.0,
            dynamic_pressure_kpa: 14.0,
        };
        for _ in 0..100 {
            rotor.on_fixed_tick(&sideways, 0.02, true);
        }
        assert_eq!(rotor.target_rotational_speed(), 0.0);
        assert_eq!(rotor.rotational_speed(), 0.0);
    }
}
