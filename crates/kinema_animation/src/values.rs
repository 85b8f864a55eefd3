use glam::{Quat, Vec3, Vec4};
use smallvec::SmallVec;

/// Morph weight slots stored inline up to this count.
pub const INLINE_MORPH_WEIGHTS: usize = 8;

/// Value types a keyframe curve can carry.
///
/// `interpolate_linear` is the blend used by `Linear` curves and by
/// cross-fades; `interpolate_cubic` evaluates a cubic Hermite segment whose
/// tangents are expressed per second and scaled by the key spacing `dt`.
pub trait Interpolatable: Clone + Sized {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self;

    fn interpolate_cubic(
        v0: &Self,
        out_tangent0: &Self,
        in_tangent1: &Self,
        v1: &Self,
        t: f32,
        dt: f32,
    ) -> Self;

    /// The neutral tangent used when a cubic curve is built from plain keys.
    fn zero_tangent() -> Self;
}

/// Hermite basis weights `(s0, s1, s2, s3)` for `v0`, `m0`, `v1`, `m1`.
#[inline]
fn hermite_basis(t: f32) -> (f32, f32, f32, f32) {
    let t2 = t * t;
    let t3 = t2 * t;
    let s2 = -2.0 * t3 + 3.0 * t2;
    let s3 = t3 - t2;
    let s0 = 1.0 - s2;
    let s1 = s3 - t2 + t;
    (s0, s1, s2, s3)
}

/// Morph target weights, one slot per target.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MorphWeightData {
    pub weights: SmallVec<[f32; INLINE_MORPH_WEIGHTS]>,
}

impl MorphWeightData {
    /// Creates `count` zeroed weight slots.
    #[must_use]
    pub fn allocate(count: usize) -> Self {
        Self {
            weights: SmallVec::from_elem(0.0, count),
        }
    }

    #[must_use]
    pub fn from_slice(weights: &[f32]) -> Self {
        Self {
            weights: SmallVec::from_slice(weights),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    #[inline]
    fn slot(&self, i: usize) -> f32 {
        self.weights.get(i).copied().unwrap_or(0.0)
    }
}

impl Interpolatable for MorphWeightData {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        let count = start.len().max(end.len());
        let weights = (0..count)
            .map(|i| {
                let a = start.slot(i);
                a + (end.slot(i) - a) * t
            })
            .collect();
        Self { weights }
    }

    fn interpolate_cubic(
        v0: &Self,
        out_tangent0: &Self,
        in_tangent1: &Self,
        v1: &Self,
        t: f32,
        dt: f32,
    ) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);
        let count = v0.len().max(v1.len());
        let weights = (0..count)
            .map(|i| {
                let m0 = out_tangent0.slot(i) * dt;
                let m1 = in_tangent1.slot(i) * dt;
                s0 * v0.slot(i) + s1 * m0 + s2 * v1.slot(i) + s3 * m1
            })
            .collect();
        Self { weights }
    }

    fn zero_tangent() -> Self {
        Self::default()
    }
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start + (end - start) * t
    }

    fn interpolate_cubic(
        v0: &Self,
        out_tangent0: &Self,
        in_tangent1: &Self,
        v1: &Self,
        t: f32,
        dt: f32,
    ) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);
        let m0 = out_tangent0 * dt;
        let m1 = in_tangent1 * dt;
        s0 * v0 + s1 * m0 + s2 * v1 + s3 * m1
    }

    fn zero_tangent() -> Self {
        0.0
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start.lerp(*end, t)
    }

    fn interpolate_cubic(
        v0: &Self,
        out_tangent0: &Self,
        in_tangent1: &Self,
        v1: &Self,
        t: f32,
        dt: f32,
    ) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);
        let m0 = *out_tangent0 * dt;
        let m1 = *in_tangent1 * dt;
        *v0 * s0 + m0 * s1 + *v1 * s2 + m1 * s3
    }

    fn zero_tangent() -> Self {
        Vec3::ZERO
    }
}

impl Interpolatable for Quat {
    /// Shortest-arc spherical interpolation; never a component-wise blend.
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start.slerp(*end, t)
    }

    fn interpolate_cubic(
        v0: &Self,
        out_tangent0: &Self,
        in_tangent1: &Self,
        v1: &Self,
        t: f32,
        dt: f32,
    ) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);

        // Keep both ends on the same hemisphere so the spline takes the short arc.
        let sign = if v0.dot(*v1) < 0.0 { -1.0 } else { 1.0 };

        let v0_v = Vec4::from(*v0);
        let v1_v = Vec4::from(*v1) * sign;
        let m0_v = Vec4::from(*out_tangent0) * dt;
        let m1_v = Vec4::from(*in_tangent1) * (dt * sign);

        let result = v0_v * s0 + m0_v * s1 + v1_v * s2 + m1_v * s3;

        Quat::from_vec4(result).normalize()
    }

    fn zero_tangent() -> Self {
        Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)
    }
}
