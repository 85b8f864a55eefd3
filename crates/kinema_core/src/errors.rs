//! Error Types
//!
//! Errors raised while importing animation data into the engine.
//!
//! # Overview
//!
//! Evaluation never fails: a missing clip, node or animator degrades to a
//! documented sentinel at runtime. [`KinemaError`] therefore only covers
//! data-integrity problems detected when curves, clips, skins and settings are
//! constructed, so corrupt data is rejected once instead of being tolerated on
//! every tick.
//!
//! ```rust,ignore
//! use kinema_core::errors::{KinemaError, Result};
//!
//! fn import() -> Result<()> {
//!     // Constructors return Result and are chained with `?`
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the Kinema engine.
#[derive(Error, Debug)]
pub enum KinemaError {
    // ========================================================================
    // Curve Errors
    // ========================================================================
    /// A curve was built without any keyframe.
    #[error("Curve has no keyframes")]
    EmptyCurve,

    /// A keyframe time is NaN or infinite.
    #[error("Keyframe time at index {index} is not finite")]
    NonFiniteKeyframe {
        /// Index of the offending keyframe
        index: usize,
    },

    /// Keyframe times are not strictly increasing (unordered or duplicate).
    #[error("Keyframe times must be strictly increasing: {previous} then {current} at index {index}")]
    UnorderedKeyframes {
        /// Index of the keyframe that breaks the ordering
        index: usize,
        /// Time of the preceding keyframe
        previous: f32,
        /// Time of the offending keyframe
        current: f32,
    },

    /// The value sequence does not match the number of keyframes.
    #[error("Curve value count mismatch: expected {expected}, found {found}")]
    ValueCountMismatch {
        /// Number of values required by the keyframes and interpolation mode
        expected: usize,
        /// Number of values provided
        found: usize,
    },

    // ========================================================================
    // Clip Errors
    // ========================================================================
    /// A channel references a curve the clip does not own.
    #[error("Channel {channel} references curve {curve}, but clip '{clip}' has {curve_count} curves")]
    CurveIndexOutOfBounds {
        /// Name of the clip being built
        clip: String,
        /// Index of the channel
        channel: usize,
        /// The invalid curve index
        curve: usize,
        /// Number of curves in the clip
        curve_count: usize,
    },

    /// A channel binds a curve to a property of a different kind.
    #[error("Channel {channel} of clip '{clip}' binds a {curve_kind} curve to {target}")]
    TargetKindMismatch {
        /// Name of the clip being built
        clip: String,
        /// Index of the channel
        channel: usize,
        /// Kind of the referenced curve
        curve_kind: &'static str,
        /// Target property of the channel
        target: &'static str,
    },

    // ========================================================================
    // Skin Errors
    // ========================================================================
    /// Joint list and inverse bind matrices have different lengths.
    #[error("Skin '{skin}' has {joints} joints but {inverse_binds} inverse bind matrices")]
    SkinMismatch {
        /// Name of the skin
        skin: String,
        /// Number of joints
        joints: usize,
        /// Number of inverse bind matrices
        inverse_binds: usize,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Settings failed validation.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, KinemaError>`.
pub type Result<T> = std::result::Result<T, KinemaError>;
