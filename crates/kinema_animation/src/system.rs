use std::sync::Arc;

use kinema_core::{Instant, NodeHandle};
use rustc_hash::FxHashMap;

use crate::animator::Animator;
use crate::clip::AnimationClip;
use crate::playback::{LoopMode, PlaybackMode};
use crate::settings::AnimationSettings;
use crate::skin::Skin;
use crate::skinning::BoneMatrices;
use crate::store::TransformStore;

/// Animation system.
///
/// Owns one [`Animator`] per animated entity and drives them all once per
/// frame. Every playback operation is addressed by entity; when no animator
/// is attached to the entity the operation is a no-op returning the same
/// sentinel an out-of-range clip index would.
#[derive(Debug, Default)]
pub struct AnimationSystem {
    animators: FxHashMap<NodeHandle, Animator>,
    settings: AnimationSettings,
}

impl AnimationSystem {
    /// Creates an empty system. Settings that fail validation are replaced by
    /// the defaults.
    #[must_use]
    pub fn new(settings: AnimationSettings) -> Self {
        Self {
            animators: FxHashMap::default(),
            settings: settings.or_default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    /// Creates an animator for `entity` using the system settings, replacing
    /// any animator already attached.
    pub fn attach(
        &mut self,
        entity: NodeHandle,
        clips: Vec<Arc<AnimationClip>>,
        skins: Vec<Arc<Skin>>,
    ) -> &mut Animator {
        let animator = Animator::with_settings(clips, skins, &self.settings);
        log::debug!(
            "Animator attached with {} clips and {} skins",
            animator.animation_count(),
            animator.skins().len()
        );
        self.animators.entry(entity).insert_entry(animator).into_mut()
    }

    /// Attaches a prebuilt animator, returning the one it replaces.
    pub fn attach_animator(&mut self, entity: NodeHandle, animator: Animator) -> Option<Animator> {
        self.animators.insert(entity, animator)
    }

    /// Detaches and returns the animator of `entity`, dropping its playback state.
    pub fn detach(&mut self, entity: NodeHandle) -> Option<Animator> {
        let animator = self.animators.remove(&entity);
        if animator.is_some() {
            log::debug!("Animator detached");
        }
        animator
    }

    #[must_use]
    pub fn animator(&self, entity: NodeHandle) -> Option<&Animator> {
        self.animators.get(&entity)
    }

    pub fn animator_mut(&mut self, entity: NodeHandle) -> Option<&mut Animator> {
        self.animators.get_mut(&entity)
    }

    #[must_use]
    pub fn contains(&self, entity: NodeHandle) -> bool {
        self.animators.contains_key(&entity)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.animators.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.animators.is_empty()
    }

    /// Ticks every animator.
    ///
    /// With the `parallel` feature and `settings.parallel` set, animators run
    /// on the rayon pool; each owns disjoint state and commits its own
    /// transaction, so the store's commit is the only point of contention.
    pub fn update<S: TransformStore + Sync + ?Sized>(&mut self, now: Instant, store: &S) {
        #[cfg(feature = "parallel")]
        if self.settings.parallel {
            use rayon::prelude::*;
            self.animators
                .par_iter_mut()
                .for_each(|(_, animator)| animator.update(now, store));
            return;
        }

        for animator in self.animators.values_mut() {
            animator.update(now, store);
        }
    }

    fn with_animator<R>(&mut self, entity: NodeHandle, missing: R, f: impl FnOnce(&mut Animator) -> R) -> R {
        match self.animators.get_mut(&entity) {
            Some(animator) => f(animator),
            None => {
                log::trace!("No animator attached to entity {entity:?}");
                missing
            }
        }
    }

    // ========================================================================
    // Playback operations (by entity)
    // ========================================================================

    pub fn set_mode(&mut self, entity: NodeHandle, mode: PlaybackMode) -> bool {
        self.with_animator(entity, false, |a| {
            a.set_mode(mode);
            true
        })
    }

    pub fn play(&mut self, entity: NodeHandle) -> bool {
        self.with_animator(entity, false, |a| {
            a.play();
            true
        })
    }

    pub fn play_from_start(&mut self, entity: NodeHandle) -> bool {
        self.with_animator(entity, false, |a| {
            a.play_from_start();
            true
        })
    }

    pub fn stop(&mut self, entity: NodeHandle) -> bool {
        self.with_animator(entity, false, |a| {
            a.stop();
            true
        })
    }

    pub fn pause(&mut self, entity: NodeHandle) -> bool {
        self.with_animator(entity, false, |a| {
            a.pause();
            true
        })
    }

    pub fn reverse(&mut self, entity: NodeHandle) -> bool {
        self.with_animator(entity, false, |a| {
            a.reverse();
            true
        })
    }

    pub fn reverse_from_end(&mut self, entity: NodeHandle) -> bool {
        self.with_animator(entity, false, |a| {
            a.reverse_from_end();
            true
        })
    }

    pub fn reset(&mut self, entity: NodeHandle) -> bool {
        self.with_animator(entity, false, |a| {
            a.reset();
            true
        })
    }

    pub fn set_loop_mode(&mut self, entity: NodeHandle, clip: Option<usize>, mode: LoopMode) -> bool {
        self.with_animator(entity, false, |a| a.set_loop_mode(clip, mode))
    }

    pub fn set_play_rate(&mut self, entity: NodeHandle, rate: f32) -> bool {
        self.with_animator(entity, false, |a| a.set_play_rate(rate))
    }

    pub fn set_current_time(&mut self, entity: NodeHandle, seconds: f32) -> bool {
        self.with_animator(entity, false, |a| a.set_current_time(seconds))
    }

    pub fn activate_animation(&mut self, entity: NodeHandle, clip: usize) -> bool {
        self.with_animator(entity, false, |a| a.activate_animation(clip))
    }

    pub fn deactivate_animation(&mut self, entity: NodeHandle, clip: usize) -> bool {
        self.with_animator(entity, false, |a| a.deactivate_animation(clip))
    }

    pub fn deactivate_all(&mut self, entity: NodeHandle) -> bool {
        self.with_animator(entity, false, |a| {
            a.deactivate_all();
            true
        })
    }

    pub fn set_cross_fade_duration(&mut self, entity: NodeHandle, from: usize, to: usize, seconds: f32) -> bool {
        self.with_animator(entity, false, |a| a.set_cross_fade_duration(from, to, seconds))
    }

    #[must_use]
    pub fn animation_play_time(&self, entity: NodeHandle, clip: usize) -> f32 {
        self.animators
            .get(&entity)
            .map_or(-1.0, |a| a.animation_play_time(clip))
    }

    #[must_use]
    pub fn animation_play_times(&self, entity: NodeHandle) -> Vec<f32> {
        self.animators
            .get(&entity)
            .map(Animator::animation_play_times)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn animation_name(&self, entity: NodeHandle, clip: usize) -> &str {
        self.animators
            .get(&entity)
            .map_or("", |a| a.animation_name(clip))
    }

    #[must_use]
    pub fn animation_index(&self, entity: NodeHandle, name: &str) -> isize {
        self.animators
            .get(&entity)
            .map_or(-1, |a| a.animation_index(name))
    }

    #[must_use]
    pub fn bone_matrices(&self, entity: NodeHandle, skin: usize) -> Option<&BoneMatrices> {
        self.animators.get(&entity)?.bone_matrices(skin)
    }
}
