use std::sync::Arc;

use crate::animation::action::{AnimationAction, TrackValue};
use crate::animation::binder::Binder;
use crate::animation::clip::AnimationClip;
use crate::animation::track_name::TrackProperty;
use crate::scene::skeleton::{Bone, Skeleton};

/// Plays actions against one skeleton.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Returns the action for `clip`, binding a new one against `skeleton` on
    /// first use. Actions are matched by clip identity.
    pub fn clip_action(&mut self, clip: &Arc<AnimationClip>, skeleton: &Skeleton) -> &mut AnimationAction {
        let index = match self.actions.iter().position(|a| Arc::ptr_eq(a.clip(), clip)) {
            Some(index) => index,
            None => {
                let action = AnimationAction::new(Arc::clone(clip)).with_bindings(Binder::bind(skeleton, clip));
                self.actions.push(action);
                self.actions.len() - 1
            }
        };
        &mut self.actions[index]
    }

    pub fn add_action(&mut self, action: AnimationAction) {
        self.actions.push(action);
    }

    #[must_use]
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut [AnimationAction] {
        &mut self.actions
    }

    /// Advances every action by `dt` and writes sampled values onto the bones.
    ///
    /// Every animated property starts the frame at its rest value. A weight of
    /// 1 overwrites it; lower weights blend from it (lerp for vectors, slerp
    /// for rotations), and later actions blend on top of earlier ones.
    pub fn update(&mut self, dt: f32, skeleton: &mut Skeleton) {
        for action in &mut self.actions {
            action.update(dt);
        }

        for action in &self.actions {
            if !action.enabled || action.weight <= 0.0 {
                continue;
            }
            for binding in action.bindings() {
                if let Some(bone) = skeleton.bone_mut(binding.bone_index) {
                    reset_property(bone, binding.property);
                }
            }
        }

        for action in &mut self.actions {
            if !action.enabled || action.weight <= 0.0 {
                continue;
            }
            let weight = action.weight.min(1.0);

            for binding_index in 0..action.bindings().len() {
                let (bone_index, property) = {
                    let binding = &action.bindings()[binding_index];
                    (binding.bone_index, binding.property)
                };
                let Some(value) = action.sample_binding(binding_index) else {
                    continue;
                };
                let Some(bone) = skeleton.bone_mut(bone_index) else {
                    continue;
                };

                let local = &mut bone.local;
                let full = weight >= 1.0;
                match (property, value) {
                    (TrackProperty::Position, TrackValue::Vector3(v)) => {
                        local.position = if full { v } else { local.position.lerp(v, weight) };
                    }
                    (TrackProperty::Scale, TrackValue::Vector3(v)) => {
                        local.scale = if full { v } else { local.scale.lerp(v, weight) };
                    }
                    (TrackProperty::Quaternion, TrackValue::Quaternion(q)) => {
                        local.rotation = if full { q } else { local.rotation.slerp(q, weight) };
                    }
                    _ => {}
                }
            }
        }
    }
}

fn reset_property(bone: &mut Bone, property: TrackProperty) {
    match property {
        TrackProperty::Position => bone.local.position = bone.rest.position,
        TrackProperty::Quaternion => bone.local.rotation = bone.rest.rotation,
        TrackProperty::Scale => bone.local.scale = bone.rest.scale,
    }
}
