//! Kinema
//!
//! CPU-side skeletal animation: keyframe curves, layered clips, cross-fades,
//! bone matrices and a per-entity playback controller, plus a hierarchical
//! scene store they animate.
//!
//! | Crate              | Contents                                        |
//! |--------------------|-------------------------------------------------|
//! | `kinema_core`      | [`NodeHandle`], [`KinemaError`], [`Timer`]      |
//! | `kinema_animation` | Curves, clips, blending, skinning, playback     |
//! | `kinema_scene`     | [`Scene`], the default [`TransformStore`]       |

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod engine;

pub use kinema_core as core;
pub use kinema_animation as animation;
pub use kinema_scene as scene;
pub use glam;

pub use kinema_core::{Instant, KinemaError, NodeHandle, Result, Timer};
pub use kinema_core::errors;
pub use kinema_animation::{
    AnimationClip, AnimationSettings, AnimationSystem, Animator, BoneMatrices, Channel, ChannelTarget,
    CrossFade, Curve, CurveData, InterpolationMode, KeyframeCursor, LocalTransform, LoopMode,
    MorphWeightData, PlaybackMode, Pose, PropertyValue, Skin, SkinningUpdater, TargetPath, Transaction,
    TransformStore,
};
pub use kinema_scene::{Node, Scene, Transform};
pub use engine::Engine;
