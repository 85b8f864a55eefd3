use glam::Mat4;

use crate::skin::Skin;
use crate::store::TransformStore;

/// Per-joint skinning matrices in skin joint order.
///
/// Recomputed every tick; valid until the next recomputation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoneMatrices {
    matrices: Vec<Mat4>,
}

impl BoneMatrices {
    /// `count` bind-pose (identity) matrices.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            matrices: vec![Mat4::IDENTITY; count],
        }
    }

    #[must_use]
    pub fn for_skin(skin: &Skin) -> Self {
        Self::new(skin.joint_count())
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Mat4] {
        &self.matrices
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    #[must_use]
    pub fn is_bind_pose(&self) -> bool {
        self.matrices.iter().all(|m| *m == Mat4::IDENTITY)
    }
}

/// Recomputes bone matrices from the store's current joint transforms.
pub struct SkinningUpdater;

impl SkinningUpdater {
    /// `bone[i] = world(joint_i) * inverse_bind[i]`.
    ///
    /// Must run after the tick's transaction has committed. Joints missing
    /// from the store keep their previous matrix. Returns the number of
    /// joints updated.
    pub fn update<S: TransformStore + ?Sized>(skin: &Skin, store: &S, out: &mut BoneMatrices) -> usize {
        if out.matrices.len() != skin.joint_count() {
            out.matrices.resize(skin.joint_count(), Mat4::IDENTITY);
        }

        let mut updated = 0;
        for (i, (&joint, ibm)) in skin
            .joints()
            .iter()
            .zip(skin.inverse_bind_matrices())
            .enumerate()
        {
            let Some(joint_world) = store.world_matrix(joint) else {
                log::trace!("Skin '{}': joint {i} not in store, skipped", skin.name());
                continue;
            };
            // Apply the IBM first (mesh space -> joint space), then the joint's current world transform
            out.matrices[i] = Mat4::from(joint_world * *ibm);
            updated += 1;
        }
        updated
    }

    /// Sets every bone matrix to the bind pose.
    pub fn reset(skin: &Skin, out: &mut BoneMatrices) {
        out.matrices.clear();
        out.matrices.resize(skin.joint_count(), Mat4::IDENTITY);
    }
}
