use kinema_animation::values::INLINE_MORPH_WEIGHTS;
use kinema_core::NodeHandle;
use glam::Affine3A;
use smallvec::SmallVec;

use crate::transform::Transform;

/// A scene node: hierarchy links, a transform and morph target weights.
///
/// # Hierarchy
///
/// Nodes form a tree through parent-child relationships:
/// - `parent`: handle of the parent node (`None` for root nodes)
/// - `children`: child node handles
///
/// Links are maintained by [`Scene`](crate::Scene); use
/// [`Scene::attach`](crate::Scene::attach) rather than editing them directly.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    /// Morph target weights, written by weight channels.
    pub morph_weights: SmallVec<[f32; INLINE_MORPH_WEIGHTS]>,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            morph_weights: SmallVec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World matrix as of the last hierarchy update.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
