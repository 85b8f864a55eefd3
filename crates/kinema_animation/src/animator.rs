use std::sync::Arc;

use kinema_core::Instant;

use crate::blender::{Blender, Layer};
use crate::clip::AnimationClip;
use crate::curve::KeyframeCursor;
use crate::playback::{CrossFade, LoopMode, PlaybackMode, PlaybackState};
use crate::pose::Pose;
use crate::settings::AnimationSettings;
use crate::skin::Skin;
use crate::skinning::{BoneMatrices, SkinningUpdater};
use crate::store::{Transaction, TransformStore};

/// Playback controller of one animated entity.
///
/// Owns the playback state machine, per-curve sampling cursors, scratch pose
/// buffers and the bone matrices of its skins. Clips and skins are shared
/// read-only. Operations referencing an unknown clip index are no-ops that
/// return a sentinel (`false`, `-1.0`, `-1` or `""`).
///
/// # Tick
///
/// [`update`](Self::update) runs once per frame:
/// 1. advance the master clock according to the mode
/// 2. evaluate activated clips in ascending index order (last writer wins)
/// 3. blend an active cross-fade over the affected targets
/// 4. commit the pose to the store in one transaction
/// 5. recompute bone matrices from the committed joint transforms
#[derive(Debug)]
pub struct Animator {
    clips: Vec<Arc<AnimationClip>>,
    skins: Vec<Arc<Skin>>,
    state: PlaybackState,

    cursors: Vec<Vec<KeyframeCursor>>,
    bone_matrices: Vec<BoneMatrices>,

    blender: Blender,
    layers: Vec<Layer>,
    pose: Pose,
}

impl Animator {
    #[must_use]
    pub fn new(clips: Vec<Arc<AnimationClip>>, skins: Vec<Arc<Skin>>) -> Self {
        Self::with_settings(clips, skins, &AnimationSettings::default())
    }

    /// Creates an animator from `settings`, falling back to the defaults when
    /// they fail validation.
    #[must_use]
    pub fn with_settings(
        clips: Vec<Arc<AnimationClip>>,
        skins: Vec<Arc<Skin>>,
        settings: &AnimationSettings,
    ) -> Self {
        let settings = settings.clone().or_default();
        let cursors = clips
            .iter()
            .map(|clip| vec![KeyframeCursor::default(); clip.curves().len()])
            .collect();
        let bone_matrices = skins.iter().map(|skin| BoneMatrices::for_skin(skin)).collect();

        let state = PlaybackState {
            mode: settings.initial_mode,
            play_rate: settings.play_rate,
            loop_mode: settings.loop_mode,
            ..PlaybackState::default()
        };

        Self {
            clips,
            skins,
            state,
            cursors,
            bone_matrices,
            blender: Blender::new(),
            layers: Vec::new(),
            pose: Pose::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> PlaybackMode {
        self.state.mode
    }

    /// Master clock in seconds.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.state.elapsed
    }

    #[inline]
    #[must_use]
    pub fn clips(&self) -> &[Arc<AnimationClip>] {
        &self.clips
    }

    #[inline]
    #[must_use]
    pub fn skins(&self) -> &[Arc<Skin>] {
        &self.skins
    }

    #[inline]
    #[must_use]
    pub fn animation_count(&self) -> usize {
        self.clips.len()
    }

    /// Bone matrices of skin `skin`, as of the last tick.
    #[must_use]
    pub fn bone_matrices(&self, skin: usize) -> Option<&BoneMatrices> {
        self.bone_matrices.get(skin)
    }

    /// The pose committed by the last tick.
    #[inline]
    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    // ========================================================================
    // Playback Control
    // ========================================================================

    pub fn set_mode(&mut self, mode: PlaybackMode) {
        if self.state.mode != mode {
            log::debug!("Animator mode {:?} -> {:?}", self.state.mode, mode);
            self.state.mode = mode;
        }
    }

    pub fn play(&mut self) {
        self.state.reversing = false;
        self.set_mode(PlaybackMode::Play);
    }

    pub fn play_from_start(&mut self) {
        self.play();
        self.zero_time();
    }

    /// Pauses and rewinds to the start.
    pub fn stop(&mut self) {
        self.set_mode(PlaybackMode::Pause);
        self.zero_time();
    }

    pub fn pause(&mut self) {
        self.set_mode(PlaybackMode::Pause);
    }

    /// Plays with the clock running backwards.
    pub fn reverse(&mut self) {
        self.state.reversing = true;
        self.set_mode(PlaybackMode::Play);
    }

    /// Plays backwards from the end of the longest activated clip (or of the
    /// longest clip when none is activated).
    pub fn reverse_from_end(&mut self) {
        self.reverse();
        let end = self.end_time();
        self.state.elapsed = end;
        self.state.previous_elapsed = end;
    }

    /// Requests a rewind on the next playing tick; an active cross-fade is
    /// dropped at the same time.
    pub fn reset(&mut self) {
        self.state.reset_pending = true;
    }

    /// Sets the wrap policy of one clip, or the animator-wide default when
    /// `clip` is `None`.
    pub fn set_loop_mode(&mut self, clip: Option<usize>, mode: LoopMode) -> bool {
        match clip {
            None => {
                self.state.loop_mode = mode;
                true
            }
            Some(index) if index < self.clips.len() => {
                self.state.clip_loop_modes.insert(index, mode);
                true
            }
            Some(_) => false,
        }
    }

    /// Sets the clock multiplier. Non-finite rates are rejected.
    pub fn set_play_rate(&mut self, rate: f32) -> bool {
        if !rate.is_finite() {
            return false;
        }
        self.state.play_rate = rate;
        true
    }

    /// Moves the master clock. Non-finite times are rejected.
    pub fn set_current_time(&mut self, seconds: f32) -> bool {
        if !seconds.is_finite() {
            return false;
        }
        self.state.elapsed = seconds;
        self.state.previous_elapsed = seconds;
        true
    }

    pub fn activate_animation(&mut self, clip: usize) -> bool {
        if clip >= self.clips.len() {
            return false;
        }
        self.state.activated.insert(clip);
        true
    }

    pub fn deactivate_animation(&mut self, clip: usize) -> bool {
        if clip >= self.clips.len() {
            return false;
        }
        self.state.activated.remove(&clip);
        true
    }

    pub fn deactivate_all(&mut self) {
        self.state.activated.clear();
    }

    /// Starts a cross-fade from clip `from` to clip `to` over `seconds`.
    ///
    /// Negative or NaN durations are treated as zero (an instantaneous
    /// switch). When the fade completes, `to` is activated and `from`
    /// deactivated. Fading a clip into itself cancels any pending fade and
    /// activates the clip.
    pub fn set_cross_fade_duration(&mut self, from: usize, to: usize, seconds: f32) -> bool {
        if from >= self.clips.len() || to >= self.clips.len() {
            return false;
        }
        if from == to {
            self.state.cross_fade = None;
            self.state.activated.insert(to);
            return true;
        }
        let duration = if seconds > 0.0 { seconds } else { 0.0 };
        log::debug!(
            "Cross-fade '{}' -> '{}' over {duration}s",
            self.clips[from].name(),
            self.clips[to].name()
        );
        self.state.cross_fade = Some(CrossFade {
            from,
            to,
            duration,
            elapsed: 0.0,
        });
        true
    }

    /// Clip-relative play time of `clip`, or `-1.0` for an unknown clip.
    #[must_use]
    pub fn animation_play_time(&self, clip: usize) -> f32 {
        if clip >= self.clips.len() {
            return -1.0;
        }
        self.clip_time(clip, self.state.elapsed)
    }

    /// Clip-relative play times of every clip, in clip order.
    #[must_use]
    pub fn animation_play_times(&self) -> Vec<f32> {
        (0..self.clips.len())
            .map(|clip| self.clip_time(clip, self.state.elapsed))
            .collect()
    }

    /// Name of `clip`, or `""` for an unknown clip.
    #[must_use]
    pub fn animation_name(&self, clip: usize) -> &str {
        self.clips.get(clip).map_or("", |c| c.name())
    }

    /// Index of the first clip called `name`, or `-1`.
    #[must_use]
    pub fn animation_index(&self, name: &str) -> isize {
        self.clips
            .iter()
            .position(|c| c.name() == name)
            .and_then(|i| isize::try_from(i).ok())
            .unwrap_or(-1)
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advances playback to `now` and writes the resulting pose into `store`.
    ///
    /// Callers must not tick the same animator concurrently; independent
    /// animators may share a store across threads.
    pub fn update<S: TransformStore + ?Sized>(&mut self, now: Instant, store: &S) {
        let delta = self
            .state
            .last_tick
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        // Refreshed in every mode so resuming never applies a stale delta
        self.state.last_tick = Some(now);
        self.state.previous_elapsed = self.state.elapsed;

        match self.state.mode {
            PlaybackMode::InitPose => {
                self.state.reset_pending = false;
                for (skin, matrices) in self.skins.iter().zip(&mut self.bone_matrices) {
                    SkinningUpdater::reset(skin, matrices);
                }
                return;
            }
            PlaybackMode::Pause => {}
            PlaybackMode::Play => {
                if self.state.reset_pending {
                    self.state.reset_pending = false;
                    self.state.cross_fade = None;
                    self.zero_time();
                }
                self.state.advance(delta);
            }
        }

        self.evaluate(store);
    }

    fn evaluate<S: TransformStore + ?Sized>(&mut self, store: &S) {
        self.finish_cross_fade();

        self.pose.clear();
        let elapsed = self.state.elapsed;
        let mut layers = std::mem::take(&mut self.layers);
        layers.clear();
        layers.extend(self.state.activated().map(|clip| Layer {
            clip,
            time: self.clip_time(clip, elapsed),
        }));
        self.blender
            .evaluate_layers(&self.clips, &layers, &mut self.cursors, store, &mut self.pose);
        self.layers = layers;

        if let Some(fade) = self.state.cross_fade {
            let from_time = self.clip_time(fade.from, self.state.previous_elapsed);
            let to_time = self.clip_time(fade.to, elapsed);
            self.blender.cross_fade(
                &self.clips,
                &fade,
                from_time,
                to_time,
                &mut self.cursors,
                store,
                &mut self.pose,
            );
        }

        let mut transaction = Transaction::new(store);
        transaction.write_pose(&self.pose);
        transaction.commit();

        for (skin, matrices) in self.skins.iter().zip(&mut self.bone_matrices) {
            SkinningUpdater::update(skin, store, matrices);
        }
    }

    /// Clears a completed cross-fade and hands playback over to its target.
    fn finish_cross_fade(&mut self) {
        if let Some(fade) = self.state.cross_fade
            && fade.is_finished()
        {
            self.state.cross_fade = None;
            self.state.activated.remove(&fade.from);
            self.state.activated.insert(fade.to);
            log::debug!(
                "Cross-fade to '{}' finished",
                self.animation_name(fade.to)
            );
        }
    }

    fn clip_time(&self, clip: usize, time: f32) -> f32 {
        self.clips.get(clip).map_or(0.0, |c| {
            self.state
                .loop_mode_for(clip)
                .wrap_directed(time, c.duration(), self.state.reversing)
        })
    }

    fn end_time(&self) -> f32 {
        if self.state.activated.is_empty() {
            self.clips.iter().map(|c| c.duration()).fold(0.0_f32, f32::max)
        } else {
            self.state
                .activated()
                .filter_map(|i| self.clips.get(i))
                .map(|c| c.duration())
                .fold(0.0_f32, f32::max)
        }
    }

    fn zero_time(&mut self) {
        self.state.elapsed = 0.0;
        self.state.previous_elapsed = 0.0;
    }
}
