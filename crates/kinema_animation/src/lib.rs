//! Kinema Animation
//!
//! Keyframe curves, clips targeting scene nodes, layered evaluation with
//! cross-fades, skinning and the per-entity playback controller.
//!
//! The crate never owns scene data. Everything it writes goes through a
//! [`TransformStore`] in one [`Transaction`] per animator tick.

pub mod values;
pub mod curve;
pub mod channel;
pub mod clip;
pub mod pose;
pub mod store;
pub mod skin;
pub mod skinning;
pub mod evaluator;
pub mod blender;
pub mod playback;
pub mod settings;
pub mod animator;
pub mod system;

pub use values::{Interpolatable, MorphWeightData};
pub use curve::{Bracket, Curve, InterpolationMode, KeyframeCursor};
pub use channel::{Channel, ChannelTarget, TargetPath};
pub use clip::{AnimationClip, CurveData};
pub use pose::{Pose, PropertyValue};
pub use store::{LocalTransform, Transaction, TransformStore};
pub use skin::Skin;
pub use skinning::{BoneMatrices, SkinningUpdater};
pub use blender::{Blender, Layer};
pub use playback::{CrossFade, LoopMode, PlaybackMode, PlaybackState};
pub use settings::AnimationSettings;
pub use animator::Animator;
pub use system::AnimationSystem;
