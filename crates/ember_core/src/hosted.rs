//! # Hosted Systems
//!
//! A particle system that should only be part of the scene while it runs.
//! [`HostedSystem`] watches the wrapped system's enabled flag and tells the
//! host to attach or detach it on every transition, including the automatic
//! disable at the end of a step and the re-enable caused by a manual spawn.

use tracing::debug;

use crate::math::Vec3;
use crate::system::{FrameReport, ParticleSystem};

/// The scene (or whatever owns render attachment) a hosted system lives in.
pub trait ParticleHost {
    /// The named system started running.
    fn attach(&mut self, name: &str);

    /// The named system stopped running.
    fn detach(&mut self, name: &str);
}

/// A [`ParticleSystem`] that attaches itself to a host while enabled.
#[derive(Debug)]
pub struct HostedSystem<H: ParticleHost> {
    system: ParticleSystem,
    host: H,
    attached: bool,
}

impl<H: ParticleHost> HostedSystem<H> {
    /// Wraps `system`. The wrapped system is disabled and starts detached.
    #[must_use]
    pub fn new(mut system: ParticleSystem, host: H) -> Self {
        system.disable();
        Self {
            system,
            host,
            attached: false,
        }
    }

    /// Runs one frame, then syncs attachment.
    pub fn step(&mut self, dt: f32) -> Option<FrameReport> {
        let report = self.system.step(dt);
        self.sync();
        report
    }

    /// Enables the system and attaches it.
    pub fn enable(&mut self) {
        self.set_enabled(true);
    }

    /// Disables the system and detaches it.
    pub fn disable(&mut self) {
        self.set_enabled(false);
    }

    /// Sets the enabled flag and syncs attachment.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.system.set_enabled(enabled);
        self.sync();
    }

    /// See [`ParticleSystem::emit_next`].
    pub fn emit_next(&mut self) -> Option<usize> {
        let slot = self.system.emit_next();
        self.sync();
        slot
    }

    /// See [`ParticleSystem::emit_next_at`].
    pub fn emit_next_at(&mut self, position: Vec3, velocity: Vec3) -> Option<usize> {
        let slot = self.system.emit_next_at(position, velocity);
        self.sync();
        slot
    }

    /// See [`ParticleSystem::emit_all`].
    pub fn emit_all(&mut self) -> usize {
        let spawned = self.system.emit_all();
        self.sync();
        spawned
    }

    /// Runs `f` against the wrapped system, then syncs attachment.
    pub fn with_system<R>(&mut self, f: impl FnOnce(&mut ParticleSystem) -> R) -> R {
        let result = f(&mut self.system);
        self.sync();
        result
    }

    /// The wrapped system.
    #[must_use]
    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Is the system currently attached to the host?
    #[inline]
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Detaches if needed and returns the parts.
    #[must_use]
    pub fn into_parts(mut self) -> (ParticleSystem, H) {
        if self.attached {
            self.host.detach(self.system.name());
        }
        (self.system, self.host)
    }

    fn sync(&mut self) {
        let enabled = self.system.is_enabled();
        if enabled == self.attached {
            return;
        }
        if enabled {
            debug!(system = %self.system.name(), "attaching to host");
            self.host.attach(self.system.name());
        } else {
            debug!(system = %self.system.name(), "detaching from host");
            self.host.detach(self.system.name());
        }
        self.attached = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::EmissionScheduler;

    #[derive(Debug, Default)]
    struct SceneLog {
        events: Vec<String>,
    }

    impl ParticleHost for SceneLog {
        fn attach(&mut self, name: &str) {
            self.events.push(format!("attach {name}"));
        }
        fn detach(&mut self, name: &str) {
            self.events.push(format!("detach {name}"));
        }
    }

    #[derive(Debug, Clone)]
    struct OneShot;

    impl EmissionScheduler for OneShot {
        fn particles_to_spawn(&mut self, _dt: f32) -> u32 {
            0
        }
        fn on_particle_death(&mut self, _slot: usize) {}
        fn should_auto_disable(&self) -> bool {
            true
        }
        fn clone_for_system(&self) -> Box<dyn EmissionScheduler> {
            Box::new(OneShot)
        }
    }

    fn hosted() -> HostedSystem<SceneLog> {
        let system = ParticleSystem::builder(4)
            .name("smoke")
            .fixed_life(0.1)
            .scheduler(OneShot)
            .build();
        HostedSystem::new(system, SceneLog::default())
    }

    #[test]
    fn test_starts_detached() {
        let hosted = hosted();
        assert!(!hosted.system().is_enabled());
        assert!(!hosted.is_attached());
        assert!(hosted.host().events.is_empty());
    }

    #[test]
    fn test_manual_spawn_attaches_and_expiry_detaches() {
        let mut hosted = hosted();

        let _ = hosted.emit_next();
        assert!(hosted.is_attached());

        hosted.step(0.05);
        assert!(hosted.is_attached());
        hosted.step(0.1);
        assert!(!hosted.is_attached());

        assert_eq!(hosted.host().events, vec!["attach smoke", "detach smoke"]);
    }

    #[test]
    fn test_explicit_toggle_is_idempotent() {
        let mut hosted = hosted();
        hosted.enable();
        hosted.enable();
        hosted.disable();
        assert_eq!(hosted.host().events.len(), 2);
    }

    #[test]
    fn test_into_parts_detaches() {
        let mut hosted = hosted();
        hosted.with_system(ParticleSystem::enable);
        let (system, host) = hosted.into_parts();
        assert!(system.is_enabled());
        assert_eq!(host.events, vec!["attach smoke", "detach smoke"]);
    }
}
