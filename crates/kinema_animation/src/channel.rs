use kinema_core::NodeHandle;

/// Defines the target property for animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation, // Maps to transform.position
    Rotation,    // Maps to transform.rotation
    Scale,       // Maps to transform.scale
    Weights,     // Maps to Morph Target weights
}

impl TargetPath {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
            Self::Weights => "weights",
        }
    }
}

/// A single animatable property of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelTarget {
    pub node: NodeHandle,
    pub path: TargetPath,
}

impl ChannelTarget {
    #[inline]
    #[must_use]
    pub fn new(node: NodeHandle, path: TargetPath) -> Self {
        Self { node, path }
    }
}

/// Binding relationship: maps curve `curve_index` of the owning clip to the
/// target property of a node in the transform store.
#[derive(Debug, Clone)]
pub struct Channel {
    pub curve_index: usize,
    pub target: ChannelTarget,
}

impl Channel {
    #[must_use]
    pub fn new(curve_index: usize, node: NodeHandle, path: TargetPath) -> Self {
        Self {
            curve_index,
            target: ChannelTarget::new(node, path),
        }
    }
}
