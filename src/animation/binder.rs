use glam::{Quat, Vec3};

use crate::animation::binding::{PropertyBinding, TrackData};
use crate::animation::clip::AnimationClip;
use crate::animation::track_name::TrackProperty;
use crate::animation::tracks::KeyframeTrack;
use crate::scene::skeleton::Skeleton;

pub struct Binder;

impl Binder {
    /// Resolves each track of `clip` to a bone of `skeleton` by name.
    ///
    /// The bone component of the track name (prefix included) must equal a
    /// bone name exactly. Unresolved or malformed tracks are left unbound.
    #[must_use]
    pub fn bind(skeleton: &Skeleton, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            let parsed = match track.parsed_name() {
                Ok(parsed) => parsed,
                Err(err) => {
                    log::debug!("Track '{}' not bound: {err}", track.name);
                    continue;
                }
            };

            let Some(bone_index) = skeleton.find_bone(&parsed.qualified_bone()) else {
                log::debug!("Track '{}' not bound: no bone '{}'", track.name, parsed.qualified_bone());
                continue;
            };

            let data = match parsed.property {
                TrackProperty::Position | TrackProperty::Scale => {
                    KeyframeTrack::<Vec3>::from_vec3_track(track).map(TrackData::Vector3)
                }
                TrackProperty::Quaternion => {
                    KeyframeTrack::<Quat>::from_quat_track(track).map(TrackData::Quaternion)
                }
            };

            let Some(data) = data else {
                log::warn!(
                    "Track '{}' not bound: {} values for {} samples",
                    track.name,
                    track.values.len(),
                    track.sample_count()
                );
                continue;
            };

            bindings.push(PropertyBinding {
                track_index,
                bone_index,
                property: parsed.property,
                data,
            });
        }

        bindings
    }
}
