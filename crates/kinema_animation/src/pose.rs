use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::channel::{ChannelTarget, TargetPath};
use crate::values::{Interpolatable, MorphWeightData};

/// A sampled value for one target property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Translation(Vec3),
    Rotation(Quat),
    Scale(Vec3),
    Weights(MorphWeightData),
}

impl PropertyValue {
    #[must_use]
    pub fn path(&self) -> TargetPath {
        match self {
            Self::Translation(_) => TargetPath::Translation,
            Self::Rotation(_) => TargetPath::Rotation,
            Self::Scale(_) => TargetPath::Scale,
            Self::Weights(_) => TargetPath::Weights,
        }
    }

    /// Blends `self` (factor 0) towards `other` (factor 1).
    ///
    /// Rotations use shortest-arc slerp, everything else a linear blend.
    /// Values of different properties do not blend; `other` wins.
    #[must_use]
    pub fn blend(&self, other: &Self, factor: f32) -> Self {
        match (self, other) {
            (Self::Translation(a), Self::Translation(b)) => {
                Self::Translation(Vec3::interpolate_linear(a, b, factor))
            }
            (Self::Rotation(a), Self::Rotation(b)) => {
                Self::Rotation(Quat::interpolate_linear(a, b, factor))
            }
            (Self::Scale(a), Self::Scale(b)) => Self::Scale(Vec3::interpolate_linear(a, b, factor)),
            (Self::Weights(a), Self::Weights(b)) => {
                Self::Weights(MorphWeightData::interpolate_linear(a, b, factor))
            }
            _ => other.clone(),
        }
    }
}

/// Pose buffer: one value per `(node, property)`, last writer wins.
///
/// Entries keep their first-insertion order so commits are reproducible.
#[derive(Debug, Clone, Default)]
pub struct Pose {
    entries: Vec<(ChannelTarget, PropertyValue)>,
    lookup: FxHashMap<ChannelTarget, usize>,
}

impl Pose {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a value, replacing any earlier value for the same target.
    pub fn set(&mut self, target: ChannelTarget, value: PropertyValue) {
        if let Some(&slot) = self.lookup.get(&target) {
            self.entries[slot].1 = value;
        } else {
            self.lookup.insert(target, self.entries.len());
            self.entries.push((target, value));
        }
    }

    #[must_use]
    pub fn get(&self, target: &ChannelTarget) -> Option<&PropertyValue> {
        self.lookup.get(target).map(|&slot| &self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChannelTarget, &PropertyValue)> {
        self.entries.iter().map(|(target, value)| (target, value))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empties the buffer while keeping its allocations.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lookup.clear();
    }

    /// Copies every entry of `other` into `self`, overwriting shared targets.
    pub fn overlay(&mut self, other: &Pose) {
        for (target, value) in &other.entries {
            self.set(*target, value.clone());
        }
    }

    /// Writes the blend of `from` (factor 0) and `to` (factor 1) into `self`.
    ///
    /// Targets present in only one of the two poses keep that pose's value.
    pub fn blend_into(&mut self, from: &Pose, to: &Pose, factor: f32) {
        let factor = factor.clamp(0.0, 1.0);
        for (target, from_value) in &from.entries {
            let value = match to.get(target) {
                Some(to_value) => from_value.blend(to_value, factor),
                None => from_value.clone(),
            };
            self.set(*target, value);
        }
        for (target, to_value) in &to.entries {
            if from.get(target).is_none() {
                self.set(*target, to_value.clone());
            }
        }
    }
}
