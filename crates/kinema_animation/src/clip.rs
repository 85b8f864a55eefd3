use glam::{Quat, Vec3};
use kinema_core::errors::{KinemaError, Result};

use crate::channel::{Channel, TargetPath};
use crate::curve::Curve;
use crate::values::MorphWeightData;

/// Keyframe data of one curve, tagged by the kind of value it produces.
#[derive(Debug, Clone)]
pub enum CurveData {
    Vector3(Curve<Vec3>),
    Quaternion(Curve<Quat>),
    MorphWeights(Curve<MorphWeightData>),
}

impl CurveData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            CurveData::Vector3(curve) => curve.end_time(),
            CurveData::Quaternion(curve) => curve.end_time(),
            CurveData::MorphWeights(curve) => curve.end_time(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            CurveData::Vector3(_) => "vector3",
            CurveData::Quaternion(_) => "quaternion",
            CurveData::MorphWeights(_) => "morph weights",
        }
    }

    /// Whether this curve can drive `path`.
    #[must_use]
    pub fn drives(&self, path: TargetPath) -> bool {
        matches!(
            (self, path),
            (CurveData::Vector3(_), TargetPath::Translation | TargetPath::Scale)
                | (CurveData::Quaternion(_), TargetPath::Rotation)
                | (CurveData::MorphWeights(_), TargetPath::Weights)
        )
    }
}

/// A named bundle of curves and the channels binding them to node
/// properties. Immutable after construction; share it with `Arc`.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    name: String,
    duration: f32,
    curves: Vec<CurveData>,
    channels: Vec<Channel>,
}

impl AnimationClip {
    /// Builds a clip. The duration is the latest key time over all curves.
    ///
    /// Channels must reference an existing curve whose kind matches the
    /// channel's target property.
    pub fn new(name: impl Into<String>, curves: Vec<CurveData>, channels: Vec<Channel>) -> Result<Self> {
        let name = name.into();

        for (channel_index, channel) in channels.iter().enumerate() {
            let Some(curve) = curves.get(channel.curve_index) else {
                return Err(KinemaError::CurveIndexOutOfBounds {
                    clip: name,
                    channel: channel_index,
                    curve: channel.curve_index,
                    curve_count: curves.len(),
                });
            };
            if !curve.drives(channel.target.path) {
                return Err(KinemaError::TargetKindMismatch {
                    clip: name,
                    channel: channel_index,
                    curve_kind: curve.kind(),
                    target: channel.target.path.as_str(),
                });
            }
        }

        let duration = curves.iter().map(CurveData::end_time).fold(0.0_f32, f32::max);

        Ok(Self {
            name,
            duration,
            curves,
            channels,
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn curves(&self) -> &[CurveData] {
        &self.curves
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    #[inline]
    #[must_use]
    pub fn curve(&self, index: usize) -> Option<&CurveData> {
        self.curves.get(index)
    }
}
