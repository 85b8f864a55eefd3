//! Transform store interface.
//!
//! The animation core never owns the scene hierarchy. It reads joint and node
//! state through [`TransformStore`] and writes poses through a
//! [`Transaction`], which hands every write of an update pass to the store in
//! a single [`TransformStore::commit`] call. Implementations apply a commit
//! atomically, so a concurrent reader sees either all of a tick's writes or
//! none of them.

use glam::{Affine3A, Quat, Vec3};
use kinema_core::NodeHandle;

use crate::channel::{ChannelTarget, TargetPath};
use crate::pose::{Pose, PropertyValue};
use crate::values::MorphWeightData;

/// Local translation / rotation / scale of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl LocalTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Hierarchical transform storage consumed by the animation core.
///
/// Methods take `&self` so independent animators can evaluate against one
/// store from several threads; implementations synchronise internally.
pub trait TransformStore {
    /// Whether `node` currently exists.
    fn contains(&self, node: NodeHandle) -> bool;

    fn local_transform(&self, node: NodeHandle) -> Option<LocalTransform>;

    /// World matrix as of the last commit.
    fn world_matrix(&self, node: NodeHandle) -> Option<Affine3A>;

    fn morph_weights(&self, node: NodeHandle) -> Option<MorphWeightData>;

    fn parent(&self, node: NodeHandle) -> Option<NodeHandle>;

    fn children(&self, node: NodeHandle) -> Vec<NodeHandle>;

    /// Applies a batch of property writes atomically and refreshes the
    /// affected world matrices. Writes to missing nodes are ignored.
    fn commit(&self, writes: &[(ChannelTarget, PropertyValue)]);

    /// Opens a write transaction against this store.
    fn begin_transaction(&self) -> Transaction<'_, Self>
    where
        Self: Sized,
    {
        Transaction::new(self)
    }
}

/// Buffered writes of one update pass.
///
/// Nothing is visible in the store until [`commit`](Self::commit); a
/// transaction dropped without committing discards its writes.
pub struct Transaction<'s, S: TransformStore + ?Sized> {
    store: &'s S,
    writes: Vec<(ChannelTarget, PropertyValue)>,
    committed: bool,
}

impl<'s, S: TransformStore + ?Sized> Transaction<'s, S> {
    #[must_use]
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            writes: Vec::new(),
            committed: false,
        }
    }

    pub fn write(&mut self, target: ChannelTarget, value: PropertyValue) {
        self.writes.push((target, value));
    }

    pub fn set_translation(&mut self, node: NodeHandle, translation: Vec3) {
        self.write(
            ChannelTarget::new(node, TargetPath::Translation),
            PropertyValue::Translation(translation),
        );
    }

    pub fn set_rotation(&mut self, node: NodeHandle, rotation: Quat) {
        self.write(
            ChannelTarget::new(node, TargetPath::Rotation),
            PropertyValue::Rotation(rotation),
        );
    }

    pub fn set_scale(&mut self, node: NodeHandle, scale: Vec3) {
        self.write(
            ChannelTarget::new(node, TargetPath::Scale),
            PropertyValue::Scale(scale),
        );
    }

    pub fn set_morph_weights(&mut self, node: NodeHandle, weights: MorphWeightData) {
        self.write(
            ChannelTarget::new(node, TargetPath::Weights),
            PropertyValue::Weights(weights),
        );
    }

    /// Queues every entry of a pose.
    pub fn write_pose(&mut self, pose: &Pose) {
        self.writes.reserve(pose.len());
        for (target, value) in pose.iter() {
            self.writes.push((*target, value.clone()));
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Publishes all queued writes in one store commit. Returns the number of
    /// writes handed to the store.
    pub fn commit(mut self) -> usize {
        let writes = std::mem::take(&mut self.writes);
        self.committed = true;
        if !writes.is_empty() {
            self.store.commit(&writes);
        }
        writes.len()
    }
}

impl<S: TransformStore + ?Sized> Drop for Transaction<'_, S> {
    fn drop(&mut self) {
        if !self.committed && !self.writes.is_empty() {
            log::warn!(
                "Transform transaction dropped without commit; discarding {} writes",
                self.writes.len()
            );
        }
    }
}
