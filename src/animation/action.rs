use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::binding::{PropertyBinding, TrackData};
use crate::animation::clip::AnimationClip;
use crate::animation::tracks::KeyframeCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
    PingPong,
}

#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,

    bindings: Vec<PropertyBinding>,

    // One cursor per binding
    pub(crate) cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
            enabled: true,
            bindings: Vec::new(),
            cursors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_bindings(mut self, bindings: Vec<PropertyBinding>) -> Self {
        self.set_bindings(bindings);
        self
    }

    pub fn set_bindings(&mut self, bindings: Vec<PropertyBinding>) {
        self.cursors = vec![KeyframeCursor::default(); bindings.len()];
        self.bindings = bindings;
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn bindings(&self) -> &[PropertyBinding] {
        &self.bindings
    }

    /// Enables the action and resumes it from where it is.
    pub fn play(&mut self) -> &mut Self {
        self.enabled = true;
        self.paused = false;
        self
    }

    /// Disables the action and rewinds it.
    pub fn stop(&mut self) -> &mut Self {
        self.enabled = false;
        self.time = 0.0;
        self
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.enabled && !self.paused && self.weight > 0.0
    }

    /// Advances time by `dt`, applying the loop mode.
    pub fn update(&mut self, dt: f32) {
        if self.paused || !self.enabled {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                // Stop at either end and auto-pause
                if self.time >= duration {
                    self.time = duration;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Loop => {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    // Reverse playback wraps to the end
                    self.time = duration + (self.time % duration);
                }
            }
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let mut t = self.time % double_duration;
                if t < 0.0 {
                    t += double_duration;
                }
                // Second half of the cycle runs backwards
                if t > duration {
                    t = double_duration - t;
                }
                self.time = t;
            }
        }
    }

    /// Samples binding `binding_index` at the current time.
    pub fn sample_binding(&mut self, binding_index: usize) -> Option<TrackValue> {
        let binding = self.bindings.get(binding_index)?;
        let cursor = self.cursors.get_mut(binding_index)?;

        match &binding.data {
            TrackData::Vector3(t) => t.sample_with_cursor(self.time, cursor).map(TrackValue::Vector3),
            TrackData::Quaternion(t) => t.sample_with_cursor(self.time, cursor).map(TrackValue::Quaternion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}
