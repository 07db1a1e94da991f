#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod assets;
pub mod errors;
pub mod retarget;
pub mod scene;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, LoopMode, PropertyTrack};
pub use assets::GltfLoader;
pub use errors::{Result, RetargetError};
pub use retarget::{
    BoneNameMap, RetargetOptions, RetargetReport, SkipReason, retarget, retarget_with_report,
};
pub use scene::{HumanBone, Skeleton, SkeletonBinding};
