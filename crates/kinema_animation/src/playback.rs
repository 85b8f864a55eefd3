use std::collections::BTreeSet;

use kinema_core::Instant;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Wrap policy mapping the master clock onto a clip's own timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoopMode {
    /// Clamp to `[0, duration]`.
    Once,
    /// Wrap modulo the duration (negative time wraps from the end).
    #[default]
    Loop,
    /// Play forward then backward.
    PingPong,
}

impl LoopMode {
    /// Clip-relative time for master time `time`.
    #[must_use]
    pub fn wrap(self, time: f32, duration: f32) -> f32 {
        if duration <= 0.0 || !time.is_finite() {
            return 0.0;
        }
        match self {
            LoopMode::Once => time.clamp(0.0, duration),
            LoopMode::Loop => time.rem_euclid(duration),
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let t = time.rem_euclid(double_duration);
                // In the second half of the cycle, reverse direction
                if t > duration { double_duration - t } else { t }
            }
        }
    }

    /// Like [`wrap`](Self::wrap), but a reversing clock that sits on a
    /// positive multiple of the duration maps to the clip's end rather than
    /// its start.
    #[must_use]
    pub fn wrap_directed(self, time: f32, duration: f32, reversing: bool) -> f32 {
        let wrapped = self.wrap(time, duration);
        if reversing && self == LoopMode::Loop && wrapped == 0.0 && time > 0.0 {
            duration
        } else {
            wrapped
        }
    }
}

/// Playback mode of an animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// Bind pose; clips are not evaluated.
    #[default]
    InitPose,
    Play,
    /// Time frozen, clips still evaluated at the frozen time.
    Pause,
}

/// A timed transition from one clip to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossFade {
    pub from: usize,
    pub to: usize,
    pub duration: f32,
    /// Fade-local elapsed time.
    pub elapsed: f32,
}

impl CrossFade {
    /// Blend factor: 0 shows `from`, 1 shows `to`.
    #[must_use]
    pub fn factor(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Per-animator playback state. Mutated only through [`Animator`](crate::Animator)
/// operations and its per-tick update.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub(crate) mode: PlaybackMode,
    pub(crate) elapsed: f32,
    pub(crate) previous_elapsed: f32,
    pub(crate) reset_pending: bool,
    pub(crate) play_rate: f32,
    pub(crate) reversing: bool,
    pub(crate) loop_mode: LoopMode,
    pub(crate) clip_loop_modes: FxHashMap<usize, LoopMode>,
    pub(crate) activated: BTreeSet<usize>,
    pub(crate) cross_fade: Option<CrossFade>,
    pub(crate) last_tick: Option<Instant>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            mode: PlaybackMode::InitPose,
            elapsed: 0.0,
            previous_elapsed: 0.0,
            reset_pending: false,
            play_rate: 1.0,
            reversing: false,
            loop_mode: LoopMode::Loop,
            clip_loop_modes: FxHashMap::default(),
            activated: BTreeSet::new(),
            cross_fade: None,
            last_tick: None,
        }
    }
}

impl PlaybackState {
    #[inline]
    #[must_use]
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Master clock in seconds.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Master clock at the end of the previous tick.
    #[inline]
    #[must_use]
    pub fn previous_elapsed(&self) -> f32 {
        self.previous_elapsed
    }

    #[inline]
    #[must_use]
    pub fn is_reset_pending(&self) -> bool {
        self.reset_pending
    }

    #[inline]
    #[must_use]
    pub fn play_rate(&self) -> f32 {
        self.play_rate
    }

    #[inline]
    #[must_use]
    pub fn is_reversing(&self) -> bool {
        self.reversing
    }

    /// Play rate with the playback direction applied.
    #[inline]
    #[must_use]
    pub fn signed_play_rate(&self) -> f32 {
        if self.reversing { -self.play_rate } else { self.play_rate }
    }

    /// Loop mode for `clip`, falling back to the animator-wide mode.
    #[must_use]
    pub fn loop_mode_for(&self, clip: usize) -> LoopMode {
        self.clip_loop_modes.get(&clip).copied().unwrap_or(self.loop_mode)
    }

    #[must_use]
    pub fn is_activated(&self, clip: usize) -> bool {
        self.activated.contains(&clip)
    }

    /// Activated clip indices in ascending order.
    pub fn activated(&self) -> impl Iterator<Item = usize> + '_ {
        self.activated.iter().copied()
    }

    #[inline]
    #[must_use]
    pub fn cross_fade(&self) -> Option<&CrossFade> {
        self.cross_fade.as_ref()
    }

    /// Moves the master clock forward by `delta` seconds of wall time.
    pub(crate) fn advance(&mut self, delta: f32) {
        let step = delta * self.signed_play_rate();
        self.elapsed += step;
        if let Some(fade) = self.cross_fade.as_mut() {
            fade.elapsed += step.abs();
        }
    }
}
