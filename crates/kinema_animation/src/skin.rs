use glam::{Affine3A, Vec3};
use kinema_core::NodeHandle;
use kinema_core::errors::{KinemaError, Result};

use crate::store::TransformStore;

/// Joint set of a skinned mesh.
///
/// `joints[i]` corresponds to `joints[i]` in the renderer's skinning shader
/// and to `inverse_bind_matrices[i]`. Joints are references into the
/// transform store; the skin does not own them.
#[derive(Debug, Clone)]
pub struct Skin {
    name: String,
    joints: Vec<NodeHandle>,
    // Static data: transforms vertices from mesh space into joint space
    inverse_bind_matrices: Vec<Affine3A>,
    targets: Vec<NodeHandle>,
}

impl Skin {
    pub fn new(
        name: impl Into<String>,
        joints: Vec<NodeHandle>,
        inverse_bind_matrices: Vec<Affine3A>,
        targets: Vec<NodeHandle>,
    ) -> Result<Self> {
        let name = name.into();
        if joints.len() != inverse_bind_matrices.len() {
            return Err(KinemaError::SkinMismatch {
                skin: name,
                joints: joints.len(),
                inverse_binds: inverse_bind_matrices.len(),
            });
        }
        Ok(Self {
            name,
            joints,
            inverse_bind_matrices,
            targets,
        })
    }

    /// Builds a skin whose bind pose is the store's current pose: each
    /// inverse bind matrix is the inverse of the joint's world matrix.
    /// Joints missing from the store get an identity inverse bind.
    pub fn from_current_pose<S: TransformStore + ?Sized>(
        name: impl Into<String>,
        joints: Vec<NodeHandle>,
        targets: Vec<NodeHandle>,
        store: &S,
    ) -> Result<Self> {
        let inverse_bind_matrices = joints
            .iter()
            .map(|&joint| {
                store
                    .world_matrix(joint)
                    .map_or(Affine3A::IDENTITY, |world| world.inverse())
            })
            .collect();
        Self::new(name, joints, inverse_bind_matrices, targets)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn joints(&self) -> &[NodeHandle] {
        &self.joints
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    #[must_use]
    pub fn inverse_bind_matrices(&self) -> &[Affine3A] {
        &self.inverse_bind_matrices
    }

    /// Render targets deformed by this joint set.
    #[inline]
    #[must_use]
    pub fn targets(&self) -> &[NodeHandle] {
        &self.targets
    }

    #[must_use]
    pub fn influences(&self, node: NodeHandle) -> bool {
        self.targets.contains(&node)
    }

    /// Tight world-space bounds `(min, max)` of the current joint positions,
    /// or `None` when no joint resolves in the store.
    pub fn joint_bounds<S: TransformStore + ?Sized>(&self, store: &S) -> Option<(Vec3, Vec3)> {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        let mut valid = false;

        for &joint in &self.joints {
            if let Some(world) = store.world_matrix(joint) {
                let pos: Vec3 = world.translation.into();
                min = min.min(pos);
                max = max.max(pos);
                valid = true;
            }
        }

        valid.then_some((min, max))
    }
}
