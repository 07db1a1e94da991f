use glam::{Quat, Vec3};

use crate::animation::clip::{InterpolationMode, PropertyTrack};
use crate::animation::values::Interpolatable;

const MAX_SCAN_OFFSET: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// Typed keyframes decoded from a [`PropertyTrack`], ready for sampling.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>, // For CubicSpline, length is times.len() * 3
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    fn expected_values(&self) -> usize {
        match self.interpolation {
            InterpolationMode::CubicSpline => self.times.len() * 3,
            InterpolationMode::Linear | InterpolationMode::Step => self.times.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty() || self.values.len() < self.expected_values()
    }

    /// Stateless sampling (binary search). `None` for an empty track.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // partition_point finds the first index where t > time, i.e. next_index
        let next_idx = self.times.partition_point(|&t| t <= time);
        Some(self.sample_at_frame(next_idx.saturating_sub(1), time))
    }

    /// Sampling with a cursor remembered between calls.
    ///
    /// Sequential playback hits the cursor's neighbourhood in O(1); jumps fall
    /// back to a binary search and re-seat the cursor.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let len = self.times.len();
        // Single keyframe: static value
        if len == 1 {
            return Some(*self.get_value_at(0));
        }

        let i = cursor.last_index.min(len - 1);
        let t_curr = self.times[i];

        let found_index = if time >= t_curr {
            // Forward: playback or fast-forward
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                let idx = i + offset;
                if idx >= len - 1 {
                    if time >= self.times[len - 1] {
                        res = Some(len - 1);
                    }
                    break;
                }
                if time < self.times[idx + 1] {
                    res = Some(idx);
                    break;
                }
            }
            res
        } else {
            // Backward: reverse playback or loop reset
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                if i < offset {
                    break;
                }
                let idx = i - offset;
                if time >= self.times[idx] {
                    res = Some(idx);
                    break;
                }
            }
            res
        };

        let final_index = found_index.unwrap_or_else(|| {
            let next_idx = self.times.partition_point(|&t| t <= time);
            next_idx.saturating_sub(1)
        });
        cursor.last_index = final_index;

        Some(self.sample_at_frame(final_index, time))
    }

    /// For Linear/Step the index is used directly; for CubicSpline the value
    /// sits at `index * 3 + 1`.
    fn get_value_at(&self, index: usize) -> &T {
        match self.interpolation {
            InterpolationMode::CubicSpline => &self.values[index * 3 + 1],
            InterpolationMode::Linear | InterpolationMode::Step => &self.values[index],
        }
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> T {
        let len = self.times.len();

        if index >= len - 1 {
            return *self.get_value_at(len - 1);
        }

        let next_idx = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next_idx];
        let dt = t1 - t0;

        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => *self.get_value_at(index),
            InterpolationMode::Linear => {
                T::interpolate_linear(*self.get_value_at(index), *self.get_value_at(next_idx), t)
            }
            InterpolationMode::CubicSpline => {
                let i_prev = index * 3;
                let i_next = next_idx * 3;

                let v0 = self.values[i_prev + 1];
                let out_tangent0 = self.values[i_prev + 2];
                let in_tangent1 = self.values[i_next];
                let v1 = self.values[i_next + 1];

                T::interpolate_cubic(v0, out_tangent0, in_tangent1, v1, t, dt)
            }
        }
    }
}

impl KeyframeTrack<Vec3> {
    /// Decodes a 3-component flat track. `None` if the buffer is malformed.
    #[must_use]
    pub fn from_vec3_track(track: &PropertyTrack) -> Option<Self> {
        let values: Vec<Vec3> = track
            .values
            .chunks_exact(3)
            .map(Vec3::from_slice)
            .collect();
        Self::checked(track, values)
    }
}

impl KeyframeTrack<Quat> {
    /// Decodes a 4-component (x, y, z, w) flat track. `None` if the buffer is malformed.
    #[must_use]
    pub fn from_quat_track(track: &PropertyTrack) -> Option<Self> {
        let values: Vec<Quat> = track
            .values
            .chunks_exact(4)
            .map(Quat::from_slice)
            .collect();
        Self::checked(track, values)
    }
}

impl<T: Interpolatable> KeyframeTrack<T> {
    fn checked(track: &PropertyTrack, values: Vec<T>) -> Option<Self> {
        let typed = Self::new(track.times.clone(), values, track.interpolation);
        (typed.values.len() == typed.expected_values() && !typed.times.is_empty()).then_some(typed)
    }
}
