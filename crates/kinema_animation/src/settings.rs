//! Animation Settings
//!
//! Defaults applied to every animator created by an
//! [`AnimationSystem`](crate::AnimationSystem), loadable from JSON.
//!
//! ```rust,ignore
//! use kinema_animation::{AnimationSettings, LoopMode};
//!
//! let settings = AnimationSettings {
//!     loop_mode: LoopMode::PingPong,
//!     ..Default::default()
//! };
//!
//! let from_file = AnimationSettings::from_json_str(r#"{ "play_rate": 0.5 }"#)?;
//! ```

use kinema_core::errors::{KinemaError, Result};
use serde::{Deserialize, Serialize};

use crate::playback::{LoopMode, PlaybackMode};

/// Animation configuration.
///
/// | Field          | Description                                   | Default    |
/// |----------------|-----------------------------------------------|------------|
/// | `play_rate`    | Master clock multiplier                       | `1.0`      |
/// | `loop_mode`    | Animator-wide wrap policy                     | `Loop`     |
/// | `initial_mode` | Mode of a freshly attached animator           | `InitPose` |
/// | `parallel`     | Tick animators on the rayon pool              | `true`     |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub play_rate: f32,
    pub loop_mode: LoopMode,
    pub initial_mode: PlaybackMode,
    pub parallel: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            play_rate: 1.0,
            loop_mode: LoopMode::Loop,
            initial_mode: PlaybackMode::InitPose,
            parallel: true,
        }
    }
}

impl AnimationSettings {
    /// Parses and validates settings from JSON. Missing fields take their
    /// default value.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.play_rate.is_finite() {
            return Err(KinemaError::InvalidSettings(format!(
                "play_rate must be finite, got {}",
                self.play_rate
            )));
        }
        Ok(())
    }

    /// Returns `self` when valid, the defaults otherwise.
    #[must_use]
    pub fn or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("Rejected animation settings: {e}");
                Self::default()
            }
        }
    }
}
