//! Clip evaluation.
//!
//! Samples every channel of a clip at one clip-relative time and writes the
//! results into a [`Pose`]. Nothing reaches the transform store until the
//! pose is committed through a [`Transaction`].

use crate::channel::{Channel, TargetPath};
use crate::clip::{AnimationClip, CurveData};
use crate::curve::KeyframeCursor;
use crate::pose::{Pose, PropertyValue};
use crate::store::{Transaction, TransformStore};

/// Samples one channel. Returns `None` when the channel's curve is missing or
/// cannot drive its target property.
pub fn sample_channel(
    clip: &AnimationClip,
    channel: &Channel,
    time: f32,
    cursor: &mut KeyframeCursor,
) -> Option<PropertyValue> {
    let curve = clip.curve(channel.curve_index)?;
    Some(match (curve, channel.target.path) {
        (CurveData::Vector3(c), TargetPath::Translation) => {
            PropertyValue::Translation(c.sample_with_cursor(time, cursor))
        }
        (CurveData::Vector3(c), TargetPath::Scale) => {
            PropertyValue::Scale(c.sample_with_cursor(time, cursor))
        }
        (CurveData::Quaternion(c), TargetPath::Rotation) => {
            PropertyValue::Rotation(c.sample_with_cursor(time, cursor))
        }
        (CurveData::MorphWeights(c), TargetPath::Weights) => {
            PropertyValue::Weights(c.sample_with_cursor(time, cursor))
        }
        _ => return None,
    })
}

/// Evaluates all channels of `clip` at `time` into `pose`.
///
/// `cursors` holds one cursor per curve of the clip; a slice of the wrong
/// length falls back to stateless sampling. Channels whose node is not in
/// the store are skipped. Returns the number of channels written.
pub fn evaluate_clip<S: TransformStore + ?Sized>(
    clip: &AnimationClip,
    time: f32,
    cursors: &mut [KeyframeCursor],
    store: &S,
    pose: &mut Pose,
) -> usize {
    let use_cursors = cursors.len() == clip.curves().len();
    let mut scratch = KeyframeCursor::default();
    let mut written = 0;

    for channel in clip.channels() {
        if !store.contains(channel.target.node) {
            log::trace!(
                "Clip '{}': {} target node missing, channel skipped",
                clip.name(),
                channel.target.path.as_str()
            );
            continue;
        }

        let cursor = if use_cursors {
            &mut cursors[channel.curve_index]
        } else {
            scratch.last_index = 0;
            &mut scratch
        };

        if let Some(value) = sample_channel(clip, channel, time, cursor) {
            pose.set(channel.target, value);
            written += 1;
        }
    }

    written
}

/// Evaluates `clip` at `time` and commits the result in one transaction.
pub fn apply_clip<S: TransformStore + ?Sized>(clip: &AnimationClip, time: f32, store: &S) -> usize {
    let mut pose = Pose::new();
    evaluate_clip(clip, time, &mut [], store, &mut pose);

    let mut transaction = Transaction::new(store);
    transaction.write_pose(&pose);
    transaction.commit()
}
