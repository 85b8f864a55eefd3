use kinema_core::errors::{KinemaError, Result};

use crate::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpolationMode {
    Linear,
    Step,
    /// Cubic Hermite spline; values are stored as `[in_tangent, value, out_tangent]` per key.
    CubicSpline,
}

const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the last bracketing key of a curve so monotonic playback
/// finds the next bracket with a short linear scan instead of a search.
#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// The two keys surrounding a query time and the blend factor between them.
///
/// `prev == next` means the value is held (before the first key, after the
/// last key, or a stationary curve).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub prev: usize,
    pub next: usize,
    pub factor: f32,
}

impl Bracket {
    #[inline]
    #[must_use]
    pub fn hold(index: usize) -> Self {
        Self {
            prev: index,
            next: index,
            factor: 0.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.prev == self.next
    }
}

/// Immutable keyframe data: strictly increasing times, a parallel value
/// sequence and an interpolation mode.
#[derive(Debug, Clone)]
pub struct Curve<T: Interpolatable> {
    times: Vec<f32>,
    values: Vec<T>, // For CubicSpline, length is times.len() * 3
    interpolation: InterpolationMode,
}

impl<T: Interpolatable> Curve<T> {
    /// Builds a curve, rejecting empty, non-finite, unordered or duplicate
    /// key times and value sequences of the wrong length.
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Result<Self> {
        if times.is_empty() {
            return Err(KinemaError::EmptyCurve);
        }

        for (index, &time) in times.iter().enumerate() {
            if !time.is_finite() {
                return Err(KinemaError::NonFiniteKeyframe { index });
            }
            if index > 0 && time <= times[index - 1] {
                return Err(KinemaError::UnorderedKeyframes {
                    index,
                    previous: times[index - 1],
                    current: time,
                });
            }
        }

        let expected = match interpolation {
            InterpolationMode::CubicSpline => times.len() * 3,
            InterpolationMode::Linear | InterpolationMode::Step => times.len(),
        };
        if values.len() != expected {
            return Err(KinemaError::ValueCountMismatch {
                expected,
                found: values.len(),
            });
        }

        Ok(Self {
            times,
            values,
            interpolation,
        })
    }

    /// Builds a cubic curve from plain key values using zero tangents.
    pub fn cubic_with_zero_tangents(times: Vec<f32>, keys: Vec<T>) -> Result<Self> {
        let mut values = Vec::with_capacity(keys.len() * 3);
        for key in keys {
            values.push(T::zero_tangent());
            values.push(key);
            values.push(T::zero_tangent());
        }
        Self::new(times, values, InterpolationMode::CubicSpline)
    }

    #[inline]
    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    #[inline]
    #[must_use]
    pub fn keyframe_count(&self) -> usize {
        self.times.len()
    }

    /// A curve with fewer than two keys never interpolates.
    #[inline]
    #[must_use]
    pub fn is_stationary(&self) -> bool {
        self.times.len() < 2
    }

    /// Time of the last key.
    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Value of key `index`.
    ///
    /// For Linear/Step the index is used directly; for CubicSpline the value
    /// sits between its two tangents at `index * 3 + 1`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.keyframe_count()`.
    #[must_use]
    pub fn keyframe_value(&self, index: usize) -> &T {
        match self.interpolation {
            InterpolationMode::CubicSpline => &self.values[index * 3 + 1],
            _ => &self.values[index],
        }
    }

    /// Locates the keys surrounding `time` with a binary search.
    #[must_use]
    pub fn bracket(&self, time: f32) -> Bracket {
        if self.is_stationary() || time.is_nan() || time <= self.times[0] {
            return Bracket::hold(0);
        }
        // First key strictly after `time`; `time > times[0]` keeps it >= 1.
        let next_idx = self.times.partition_point(|&t| t <= time);
        self.bracket_at(next_idx - 1, time)
    }

    /// Stateless sampling.
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        self.evaluate(self.bracket(time))
    }

    /// Sampling with a cursor: amortised O(1) for sequential playback,
    /// binary search fallback for jumps. Returns the same value as [`sample`](Self::sample).
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> T {
        self.evaluate(self.bracket_with_cursor(time, cursor))
    }

    /// Cursor-assisted variant of [`bracket`](Self::bracket).
    pub fn bracket_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Bracket {
        let len = self.times.len();
        // Fast path: static data and anything at or before the first key
        if self.is_stationary() || time.is_nan() || time <= self.times[0] {
            cursor.last_index = 0;
            return Bracket::hold(0);
        }

        // A cursor left over from another curve is reset to the start.
        let i = if cursor.last_index < len {
            cursor.last_index
        } else {
            0
        };
        let t_curr = self.times[i];

        let found_index = if time >= t_curr {
            // Normal playback: scan forward over [idx, idx + 1) intervals
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
            // Reverse playback or loop wrap: scan backward, the right
            // boundary is implied by the previous iteration.
            let mut res = None;
            for offset in 1..=MAX_SCAN_OFFSET {
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

        let index = found_index.unwrap_or_else(|| {
            // Large jump (scrubbing / loop reset)
            let next_idx = self.times.partition_point(|&t| t <= time);
            next_idx.saturating_sub(1)
        });

        cursor.last_index = index;
        self.bracket_at(index, time)
    }

    /// Bracket for a known previous key (`times[index] <= time`).
    fn bracket_at(&self, index: usize, time: f32) -> Bracket {
        let len = self.times.len();
        if index >= len - 1 {
            return Bracket::hold(len - 1);
        }

        let next = index + 1;
        let t0 = self.times[index];
        let dt = self.times[next] - t0;

        let factor = match self.interpolation {
            InterpolationMode::Step => 0.0,
            _ if dt > 0.0 => ((time - t0) / dt).clamp(0.0, 1.0),
            _ => 0.0,
        };

        Bracket {
            prev: index,
            next,
            factor,
        }
    }

    /// Evaluates the curve for a bracket. Key indices past the last key are
    /// clamped to it and the factor is clamped to `[0, 1]`.
    #[must_use]
    pub fn evaluate(&self, bracket: Bracket) -> T {
        let last = self.times.len() - 1;
        let prev = bracket.prev.min(last);
        let next = bracket.next.min(last);
        if prev == next || bracket.factor.is_nan() || bracket.factor <= 0.0 {
            return self.keyframe_value(prev).clone();
        }
        let factor = bracket.factor.min(1.0);

        match self.interpolation {
            InterpolationMode::Step => self.keyframe_value(prev).clone(),
            InterpolationMode::Linear => {
                T::interpolate_linear(self.keyframe_value(prev), self.keyframe_value(next), factor)
            }
            InterpolationMode::CubicSpline => {
                let i_prev = prev * 3;
                let i_next = next * 3;
                let dt = self.times[next] - self.times[prev];

                let v0 = &self.values[i_prev + 1];
                let out_tangent0 = &self.values[i_prev + 2];
                let in_tangent1 = &self.values[i_next];
                let v1 = &self.values[i_next + 1];

                T::interpolate_cubic(v0, out_tangent0, in_tangent1, v1, factor, dt)
            }
        }
    }
}
