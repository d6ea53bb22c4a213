//! Recording fakes of the host capabilities, for unit tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec3;

use aviator_common::LoopSettings;

use crate::host::{HostResolver, LoopSound, ResolveError, SceneTransform};

#[derive(Debug, Default, Clone)]
pub struct TransformState {
    pub visible: Option<bool>,
    pub total_angle: f32,
    pub rotate_calls: u32,
    pub last_axis: Option<Vec3>,
}

#[derive(Debug)]
pub struct FakeTransform {
    axis: Vec3,
    state: Rc<RefCell<TransformState>>,
}

impl FakeTransform {
    pub fn new(axis: Vec3) -> (Self, Rc<RefCell<TransformState>>) {
        let state = Rc::new(RefCell::new(TransformState::default()));
        (Self { axis, state: state.clone() }, state)
    }
}

impl SceneTransform for FakeTransform {
    fn set_visible(&mut self, visible: bool) {
        self.state.borrow_mut().visible = Some(visible);
    }

    fn rotate(&mut self, axis: Vec3, angle: f32) {
        let mut state = self.state.borrow_mut();
        state.total_angle += angle;
        state.rotate_calls += 1;
        state.last_axis = Some(axis);
    }

    fn axis(&self) -> Vec3 {
        self.axis
    }
}

#[derive(Debug, Default, Clone)]
pub struct SoundState {
    pub playing: bool,
    pub volume: f32,
    pub play_calls: u32,
    pub stop_calls: u32,
}

#[derive(Debug, Default)]
pub struct FakeSound {
    state: Rc<RefCell<SoundState>>,
}

impl FakeSound {
    pub fn state(&self) -> SoundState {
        self.state.borrow().clone()
    }
}

impl LoopSound for FakeSound {
    fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    fn play(&mut self) {
        let mut state = self.state.borrow_mut();
        state.playing = true;
        state.play_calls += 1;
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.playing = false;
        state.stop_calls += 1;
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume;
    }
}

/// Resolver over a fixed set of named transforms and clips
#[derive(Debug, Default)]
pub struct FakeResolver {
    axes: HashMap<String, Vec3>,
    clips: Vec<String>,
    pub transforms: HashMap<String, Rc<RefCell<TransformState>>>,
    pub sounds: Vec<(String, LoopSettings, Rc<RefCell<SoundState>>)>,
}

impl FakeResolver {
    pub fn with_transform(mut self, name: &str, axis: Vec3) -> Self {
        self.axes.insert(name.to_string(), axis);
        self
    }

    pub fn with_clip(mut self, clip: &str) -> Self {
        self.clips.push(clip.to_string());
        self
    }

    pub fn transform(&self, name: &str) -> TransformState {
        self.transforms[name].borrow().clone()
    }

    pub fn sound(&self) -> SoundState {
        self.sounds[0].2.borrow().clone()
    }
}

impl HostResolver for FakeResolver {
    type Transform = FakeTransform;
    type Sound = FakeSound;

    fn resolve_transform(&mut self, name: &str) -> Result<FakeTransform, ResolveError> {
        let axis = *self
            .axes
            .get(name)
            .ok_or_else(|| ResolveError::TransformNotFound(name.to_string()))?;
        let (transform, state) = FakeTransform::new(axis);
        self.transforms.insert(name.to_string(), state);
        Ok(transform)
    }

    fn resolve_loop_sound(
        &mut self,
        clip: &str,
        settings: &LoopSettings,
    ) -> Result<FakeSound, ResolveError> {
        if !self.clips.iter().any(|c| c == clip) {
            return Err(ResolveError::ClipNotFound(clip.to_string()));
        }
        let sound = FakeSound::default();
        self.sounds.push((clip.to_string(), settings.clone(), sound.state.clone()));
        Ok(sound)
    }
}
