//! Animation retargeting.
//!
//! [`retarget`] rewrites a clip authored against one bone-naming convention so
//! that its tracks address the nodes of a destination humanoid rig:
//!
//! 1. Parse each track name as `[prefix:]bone.property`.
//! 2. Resolve `bone` to a [`HumanBone`] through the [`BoneNameMap`]
//!    (longest matching suffix).
//! 3. Look the role up in the destination [`SkeletonBinding`].
//! 4. Clone the track, rename it `<destinationNode>.<property>` and, when
//!    requested, invert its quaternions.
//!
//! Tracks that fail any step are dropped and listed in the
//! [`RetargetReport`]. Nothing here is fatal; an empty result is still a
//! valid clip and the caller decides what to do with it.

pub mod bone_map;

use glam::Quat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::clip::{AnimationClip, InterpolationMode, PropertyTrack};
use crate::animation::track_name::{TrackName, TrackNameError, TrackProperty, track_name};
use crate::scene::humanoid::{HumanBone, SkeletonBinding};

pub use bone_map::{BoneNameMap, BoneNameMapConfig};

const RETARGETED_SUFFIX: &str = "_retargeted";
const INVERTED_SUFFIX: &str = "_inverted";

/// Per source/destination pairing switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetOptions {
    /// Replace every rotation sample with its inverse.
    ///
    /// Some authoring pipelines disagree on rotation handedness; this flips
    /// them. It is not correct in general and stays off unless asked for.
    pub invert_rotations: bool,
}

impl RetargetOptions {
    #[must_use]
    pub fn inverted() -> Self {
        Self {
            invert_rotations: true,
        }
    }
}

/// Why a source track is absent from the output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("unparsable track name: {0}")]
    UnparsableTrackName(TrackNameError),

    #[error("unsupported property '{0}'")]
    UnsupportedProperty(String),

    #[error("bone '{0}' has no entry in the bone-name map")]
    UnmappedBone(String),

    #[error("destination skeleton has no node for {0}")]
    UnboundDestinationNode(HumanBone),
}

impl From<TrackNameError> for SkipReason {
    fn from(err: TrackNameError) -> Self {
        match err {
            TrackNameError::UnsupportedProperty(property) => Self::UnsupportedProperty(property),
            other => Self::UnparsableTrackName(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTrack {
    pub name: String,
    pub reason: SkipReason,
}

/// What happened to each track of one [`retarget_with_report`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetargetReport {
    pub source_tracks: usize,
    pub retained: usize,
    pub skipped: Vec<SkippedTrack>,
}

impl RetargetReport {
    /// All tracks were dropped (or there were none to begin with).
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        self.retained == 0
    }

    /// Fraction of source tracks that were dropped, `0.0` for an empty source.
    #[must_use]
    pub fn dropped_ratio(&self) -> f32 {
        if self.source_tracks == 0 {
            0.0
        } else {
            self.skipped.len() as f32 / self.source_tracks as f32
        }
    }

    pub fn skipped_because<'a>(
        &'a self,
        matches: impl Fn(&SkipReason) -> bool + 'a,
    ) -> impl Iterator<Item = &'a SkippedTrack> + 'a {
        self.skipped.iter().filter(move |s| matches(&s.reason))
    }
}

/// Retargets `source` onto the rig described by `destination`.
///
/// See the [module docs](self) for the rules. The source clip is never
/// modified.
#[must_use]
pub fn retarget(
    source: &AnimationClip,
    destination: &SkeletonBinding,
    bone_map: &BoneNameMap,
    options: &RetargetOptions,
) -> AnimationClip {
    retarget_with_report(source, destination, bone_map, options).0
}

/// [`retarget`], plus an account of every dropped track.
#[must_use]
pub fn retarget_with_report(
    source: &AnimationClip,
    destination: &SkeletonBinding,
    bone_map: &BoneNameMap,
    options: &RetargetOptions,
) -> (AnimationClip, RetargetReport) {
    let mut tracks = Vec::with_capacity(source.tracks.len());
    let mut report = RetargetReport {
        source_tracks: source.tracks.len(),
        ..RetargetReport::default()
    };

    for track in &source.tracks {
        match retarget_track(track, destination, bone_map, options) {
            Ok(retargeted) => tracks.push(retargeted),
            Err(reason) => {
                log::debug!("Dropping track '{}': {reason}", track.name);
                report.skipped.push(SkippedTrack {
                    name: track.name.clone(),
                    reason,
                });
            }
        }
    }
    report.retained = tracks.len();

    log::debug!(
        "Retargeted '{}': kept {} of {} tracks",
        source.name,
        report.retained,
        report.source_tracks
    );

    let clip = AnimationClip::with_duration(retargeted_name(&source.name, options), source.duration, tracks);
    (clip, report)
}

fn retarget_track(
    track: &PropertyTrack,
    destination: &SkeletonBinding,
    bone_map: &BoneNameMap,
    options: &RetargetOptions,
) -> Result<PropertyTrack, SkipReason> {
    let parsed = TrackName::parse(&track.name)?;

    let role = bone_map
        .resolve(parsed.bone)
        .ok_or_else(|| SkipReason::UnmappedBone(parsed.qualified_bone()))?;

    let node_name = destination
        .node_name(role)
        .ok_or(SkipReason::UnboundDestinationNode(role))?;

    let mut retargeted = track.clone();
    retargeted.name = track_name(node_name, parsed.property);

    match parsed.property {
        TrackProperty::Quaternion if options.invert_rotations => match retargeted.interpolation {
            InterpolationMode::CubicSpline => invert_cubic_quaternions(&mut retargeted.values),
            InterpolationMode::Linear | InterpolationMode::Step => invert_quaternions(&mut retargeted.values),
        },
        TrackProperty::Quaternion | TrackProperty::Position | TrackProperty::Scale => {}
    }

    Ok(retargeted)
}

fn retargeted_name(source: &str, options: &RetargetOptions) -> String {
    if options.invert_rotations {
        format!("{source}{RETARGETED_SUFFIX}{INVERTED_SUFFIX}")
    } else {
        format!("{source}{RETARGETED_SUFFIX}")
    }
}

/// Replaces each `(x, y, z, w)` group of `values` with its multiplicative
/// inverse, `conj(q) / |q|²`. For unit quaternions that is the conjugate.
///
/// A zero quaternion has no inverse and is left as is; a trailing partial
/// group is ignored.
pub fn invert_quaternions(values: &mut [f32]) {
    for chunk in values.chunks_exact_mut(4) {
        let q = Quat::from_slice(chunk);
        let length_squared = q.length_squared();
        if length_squared < f32::MIN_POSITIVE {
            continue;
        }
        let inverse = q.conjugate() / length_squared;
        inverse.write_to_slice(chunk);
    }
}

/// Inverts a cubic-spline rotation buffer laid out as
/// `[in_tangent, value, out_tangent]` per keyframe.
///
/// Values get the full inverse. Tangents are derivatives of the curve, and the
/// derivative of `conj(q(t))` is `conj(q'(t))`, so they are only conjugated.
pub fn invert_cubic_quaternions(values: &mut [f32]) {
    for keyframe in values.chunks_exact_mut(12) {
        let (in_tangent, rest) = keyframe.split_at_mut(4);
        let (value, out_tangent) = rest.split_at_mut(4);

        conjugate_in_place(in_tangent);
        invert_quaternions(value);
        conjugate_in_place(out_tangent);
    }
}

fn conjugate_in_place(q: &mut [f32]) {
    for component in &mut q[..3] {
        *component = -*component;
    }
}
