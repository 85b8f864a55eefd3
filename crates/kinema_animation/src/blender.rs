use std::sync::Arc;

use crate::clip::AnimationClip;
use crate::curve::KeyframeCursor;
use crate::evaluator;
use crate::playback::CrossFade;
use crate::pose::Pose;
use crate::store::TransformStore;

/// One clip to evaluate in a layered pass.
#[derive(Debug, Clone, Copy)]
pub struct Layer {
    pub clip: usize,
    /// Clip-relative time.
    pub time: f32,
}

/// Combines several clips into one pose.
///
/// Layers are applied in the order given; for a `(node, property)` pair
/// written by several layers the last one wins. Cross-fades evaluate both
/// clips into independent scratch buffers and blend them in one pass.
#[derive(Debug, Default)]
pub struct Blender {
    from_pose: Pose,
    to_pose: Pose,
    blended: Pose,
}

impl Blender {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates every layer into `out`. Layers naming a missing clip are
    /// skipped. Returns the number of channels written.
    pub fn evaluate_layers<S: TransformStore + ?Sized>(
        &mut self,
        clips: &[Arc<AnimationClip>],
        layers: &[Layer],
        cursors: &mut [Vec<KeyframeCursor>],
        store: &S,
        out: &mut Pose,
    ) -> usize {
        let mut written = 0;
        for layer in layers {
            let Some(clip) = clips.get(layer.clip) else {
                continue;
            };
            let clip_cursors = cursors.get_mut(layer.clip).map(Vec::as_mut_slice).unwrap_or_default();
            written += evaluator::evaluate_clip(clip, layer.time, clip_cursors, store, out);
        }
        written
    }

    /// Blends `fade.from` sampled at `from_time` with `fade.to` sampled at
    /// `to_time` using the fade's factor, and overlays the result on `out`.
    ///
    /// Returns the number of targets touched by the fade.
    pub fn cross_fade<S: TransformStore + ?Sized>(
        &mut self,
        clips: &[Arc<AnimationClip>],
        fade: &CrossFade,
        from_time: f32,
        to_time: f32,
        cursors: &mut [Vec<KeyframeCursor>],
        store: &S,
        out: &mut Pose,
    ) -> usize {
        let (Some(from_clip), Some(to_clip)) = (clips.get(fade.from), clips.get(fade.to)) else {
            return 0;
        };

        self.to_pose.clear();
        self.from_pose.clear();
        self.blended.clear();

        let to_cursors = cursors.get_mut(fade.to).map(Vec::as_mut_slice).unwrap_or_default();
        evaluator::evaluate_clip(to_clip, to_time, to_cursors, store, &mut self.to_pose);

        let from_cursors = cursors.get_mut(fade.from).map(Vec::as_mut_slice).unwrap_or_default();
        evaluator::evaluate_clip(from_clip, from_time, from_cursors, store, &mut self.from_pose);

        self.blended.blend_into(&self.from_pose, &self.to_pose, fade.factor());
        out.overlay(&self.blended);
        self.blended.len()
    }
}
