use glam::{Quat, Vec3};

use crate::animation::track_name::TrackProperty;
use crate::animation::tracks::KeyframeTrack;

/// Typed keyframes for one bound track.
#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

/// Binding relationship: track `track_index` of a clip drives `property` of
/// bone `bone_index` in a skeleton.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub bone_index: usize,
    pub property: TrackProperty,
    pub data: TrackData,
}
