pub mod values;
pub mod track_name;
pub mod tracks;
pub mod clip;
pub mod action;
pub mod binding;
pub mod binder;
pub mod mixer;

pub use clip::{AnimationClip, InterpolationMode, PropertyTrack};
pub use track_name::{TrackName, TrackNameError, TrackProperty};
pub use action::{AnimationAction, LoopMode, TrackValue};
pub use mixer::AnimationMixer;
pub use binder::Binder;
pub use binding::{PropertyBinding, TrackData};
pub use tracks::{KeyframeCursor, KeyframeTrack};
