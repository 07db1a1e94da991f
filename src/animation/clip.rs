use crate::animation::track_name::{TrackName, TrackNameError, TrackProperty};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

/// One time-sampled channel for one transform property of one bone.
///
/// `values` is a flat buffer: 3 components per sample for position/scale,
/// 4 (x, y, z, w) for quaternions. For `CubicSpline` each sample stores
/// in-tangent, value and out-tangent, so the buffer is three times longer.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyTrack {
    pub name: String,
    pub times: Vec<f32>,
    pub values: Vec<f32>,
    pub interpolation: InterpolationMode,
}

impl PropertyTrack {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        times: Vec<f32>,
        values: Vec<f32>,
        interpolation: InterpolationMode,
    ) -> Self {
        Self {
            name: name.into(),
            times,
            values,
            interpolation,
        }
    }

    pub fn parsed_name(&self) -> Result<TrackName<'_>, TrackNameError> {
        TrackName::parse(&self.name)
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn last_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Whether `values` holds exactly one entry per sample for `property`.
    #[must_use]
    pub fn is_well_formed(&self, property: TrackProperty) -> bool {
        let per_sample = match self.interpolation {
            InterpolationMode::CubicSpline => property.components() * 3,
            InterpolationMode::Linear | InterpolationMode::Step => property.components(),
        };
        self.values.len() == self.times.len() * per_sample
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<PropertyTrack>,
}

impl AnimationClip {
    /// Creates a clip whose duration is the latest sample time of any track.
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<PropertyTrack>) -> Self {
        let duration = tracks
            .iter()
            .map(PropertyTrack::last_time)
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    #[must_use]
    pub fn with_duration(name: impl Into<String>, duration: f32, tracks: Vec<PropertyTrack>) -> Self {
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    #[must_use]
    pub fn track(&self, name: &str) -> Option<&PropertyTrack> {
        self.tracks.iter().find(|t| t.name == name)
    }
}
