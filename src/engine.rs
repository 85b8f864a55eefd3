//! Engine Core Module
//!
//! [`Engine`] bundles a [`Scene`], the [`AnimationSystem`] driving it and a
//! frame [`Timer`]. It owns no window or render state, so it can be driven
//! by any host loop.
//!
//! # Example
//!
//! ```rust,ignore
//! use kinema::{AnimationSettings, Engine};
//!
//! let mut engine = Engine::new(AnimationSettings::default());
//! let root = engine.scene.create_node("root");
//! let animator = engine.animation.attach(root, clips, skins);
//! animator.activate_animation(0);
//! animator.play();
//!
//! loop {
//!     engine.update();
//!     // ... upload engine.animation.bone_matrices(root, 0) ...
//! }
//! ```

use kinema_animation::{AnimationSettings, AnimationSystem};
use kinema_core::{Instant, Timer};
use kinema_scene::Scene;

/// Explicit animation context owned by the host.
///
/// # Lifecycle
///
/// 1. Create with [`Engine::new`] or [`Engine::default`]
/// 2. Populate [`scene`](Self::scene) and attach animators to
///    [`animation`](Self::animation)
/// 3. Call [`Engine::update`] once per frame
pub struct Engine {
    pub scene: Scene,
    pub animation: AnimationSystem,

    timer: Timer,
}

impl Engine {
    /// Creates an engine. Settings that fail validation are replaced by the
    /// defaults.
    #[must_use]
    pub fn new(settings: AnimationSettings) -> Self {
        log::debug!("Engine created with {settings:?}");
        Self {
            scene: Scene::new(),
            animation: AnimationSystem::new(settings),
            timer: Timer::new(),
        }
    }

    /// Ticks the frame timer and every animator against the wall clock.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Ticks as if the current time were `now`. Used by hosts with their own
    /// clock and by deterministic tests.
    pub fn update_at(&mut self, now: Instant) {
        self.timer.tick_at(now);
        self.animation.update(now, &self.scene);
    }

    /// Seconds since the engine was created, as of the last update.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.timer.elapsed.as_secs_f32()
    }

    /// Seconds between the last two updates.
    #[inline]
    #[must_use]
    pub fn delta(&self) -> f32 {
        self.timer.dt_seconds()
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(AnimationSettings::default())
    }
}
