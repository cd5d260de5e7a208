use glam::Vec2;

use crate::components::emitter::{BoundsBehaviour, EmitterConfig};
use crate::core::collision::{BroadPhase, CollisionConfig, NarrowPhase};
use super::particle::Particle;
use super::rng::{RandomSource, Rng};

/// A bounded particle pool driven by one [`EmitterConfig`].
///
/// Emits at `emission_rate` while playing, advances every live particle once
/// per [`update`](Self::update), and recycles expired slots for later spawns.
pub struct ParticleEmitter<R: RandomSource = Rng> {
    config: EmitterConfig,
    collision: CollisionConfig,
    particles: Vec<Particle>,
    free: Vec<Particle>,
    rng: R,
    emitting: bool,
    paused: bool,
    /// Seconds banked toward the next continuous spawn.
    emit_counter: f32,
    elapsed: f32,
    warned_parallax: bool,
    warned_animation: bool,
}

impl ParticleEmitter<Rng> {
    /// Create an emitter with a seeded xorshift source. Starts emitting.
    pub fn new(config: EmitterConfig, seed: u64) -> Self {
        Self::with_random(config, Rng::new(seed))
    }
}

impl<R: RandomSource> ParticleEmitter<R> {
    pub fn with_random(config: EmitterConfig, rng: R) -> Self {
        let capacity = config.max_particles as usize;
        Self {
            config,
            collision: CollisionConfig::default(),
            particles: Vec::with_capacity(capacity),
            free: Vec::new(),
            rng,
            emitting: true,
            paused: false,
            emit_counter: 0.0,
            elapsed: 0.0,
            warned_parallax: false,
            warned_animation: false,
        }
    }

    pub fn with_collision(mut self, collision: CollisionConfig) -> Self {
        self.collision = collision;
        self
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Mutable config access between ticks.
    pub fn config_mut(&mut self) -> &mut EmitterConfig {
        &mut self.config
    }

    pub fn collision(&self) -> &CollisionConfig {
        &self.collision
    }

    pub fn collision_mut(&mut self) -> &mut CollisionConfig {
        &mut self.collision
    }

    /// Restart emission from the beginning of `duration`.
    pub fn play(&mut self) {
        if self.paused {
            self.paused = false;
            return;
        }
        log::debug!("particle emitter: play");
        self.emitting = true;
        self.elapsed = 0.0;
        self.emit_counter = 0.0;
    }

    /// Freeze emission and simulation.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Stop emitting. Live particles keep simulating until they expire.
    pub fn stop(&mut self) {
        if self.emitting {
            log::debug!("particle emitter: stop after {:.2}s", self.elapsed);
        }
        self.emitting = false;
        self.emit_counter = 0.0;
    }

    /// Stop emitting and drop every live particle into the free list.
    pub fn clear(&mut self) {
        self.stop();
        self.free.append(&mut self.particles);
    }

    /// Spawn up to `count` particles right now. Returns how many were spawned.
    pub fn emit(&mut self, count: usize, origin: Vec2) -> usize {
        let room = (self.config.max_particles as usize).saturating_sub(self.particles.len());
        let count = count.min(room);
        for _ in 0..count {
            self.spawn_one(origin);
        }
        log::trace!("particle emitter: burst of {}", count);
        count
    }

    fn spawn_one(&mut self, origin: Vec2) {
        let mut particle = self.free.pop().unwrap_or_default();
        particle.spawn(&self.config, origin, &mut self.rng);
        self.particles.push(particle);
    }

    /// Advance the emitter by `dt` seconds: emit, then advance every live
    /// particle once. Returns the number of particles retired this tick.
    pub fn update<W>(&mut self, dt: f32, root_position: Vec2, world: &W) -> usize
    where
        W: BroadPhase + NarrowPhase<<W as BroadPhase>::Collider>,
    {
        if self.paused {
            return 0;
        }
        self.warn_degenerate_config();

        if self.emitting {
            self.tick_emission(dt, root_position);
        }

        let bounds = self.config.bounds;
        let check_bounds = !bounds.is_empty();
        let mut retired = 0;
        let mut i = 0;
        while i < self.particles.len() {
            let particle = &mut self.particles[i];
            let mut expired =
                particle.advance(dt, &self.config, &self.collision, root_position, world);

            if !expired && check_bounds {
                match self.config.bounds_behaviour {
                    BoundsBehaviour::Destroy => expired = !bounds.contains(particle.position()),
                    BoundsBehaviour::Reflect => particle.reflect_within(&bounds),
                }
            }

            if expired {
                let slot = self.particles.swap_remove(i);
                self.free.push(slot);
                retired += 1;
            } else {
                i += 1;
            }
        }
        retired
    }

    fn tick_emission(&mut self, dt: f32, origin: Vec2) {
        let max = self.config.max_particles as usize;
        if self.config.emission_rate > 0.0 {
            let interval = 1.0 / self.config.emission_rate;
            if self.particles.len() < max {
                self.emit_counter += dt;
            }
            while self.particles.len() < max && self.emit_counter > interval {
                self.spawn_one(origin);
                self.emit_counter -= interval;
            }
        }

        self.elapsed += dt;
        if self.config.duration >= 0.0 && self.elapsed > self.config.duration {
            log::debug!("particle emitter: duration of {:.2}s elapsed", self.config.duration);
            self.stop();
        }
    }

    fn warn_degenerate_config(&mut self) {
        let uses_parallax_factor = self.config.scale_by_parallax || self.config.parallax_by_scale;
        if !self.warned_parallax && uses_parallax_factor && self.config.parallax_scale_factor == 0.0 {
            log::warn!("particle emitter: parallax_scale_factor is 0, treating it as 1");
            self.warned_parallax = true;
        }
        if !self.warned_animation && self.config.animations.iter().any(|a| a.frames.is_empty()) {
            log::warn!("particle emitter: animation without frames is ignored");
            self.warned_animation = true;
        }
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Not emitting and nothing left alive.
    pub fn all_expired(&self) -> bool {
        !self.emitting && self.particles.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::emitter::Bounds;
    use crate::core::collision::NoColliders;
    use crate::systems::rng::SequenceRandom;

    fn quiet_config() -> EmitterConfig {
        EmitterConfig::exact()
            .with_speed(0.0, 0.0)
            .with_emission_rate(0.0)
            .with_max_particles(8)
    }

    #[test]
    fn continuous_emission_rate() {
        let config = quiet_config().with_emission_rate(10.0).with_lifespan(5.0, 0.0);
        let mut emitter = ParticleEmitter::new(config, 42);
        for _ in 0..11 {
            emitter.update(0.1, Vec2::ZERO, &NoColliders);
        }
        assert_eq!(emitter.live_count(), 8, "capped at max_particles");
    }

    #[test]
    fn emission_accumulates_fractional_time() {
        let config = quiet_config().with_emission_rate(4.0).with_lifespan(5.0, 0.0);
        let mut emitter = ParticleEmitter::new(config, 1);
        emitter.update(0.2, Vec2::ZERO, &NoColliders);
        assert_eq!(emitter.live_count(), 0);
        emitter.update(0.1, Vec2::ZERO, &NoColliders);
        assert_eq!(emitter.live_count(), 1);
    }

    #[test]
    fn burst_respects_capacity() {
        let mut emitter = ParticleEmitter::new(quiet_config(), 42);
        assert_eq!(emitter.emit(5, Vec2::ZERO), 5);
        assert_eq!(emitter.emit(5, Vec2::ZERO), 3);
        assert_eq!(emitter.live_count(), 8);
    }

    #[test]
    fn expired_particles_are_recycled() {
        let config = quiet_config().with_lifespan(0.1, 0.0);
        let mut emitter = ParticleEmitter::new(config, 42);
        emitter.emit(4, Vec2::ZERO);
        assert_eq!(emitter.update(0.2, Vec2::ZERO, &NoColliders), 4);
        assert_eq!(emitter.live_count(), 0);
        assert_eq!(emitter.free.len(), 4);

        emitter.emit(2, Vec2::ZERO);
        assert_eq!(emitter.free.len(), 2);
        assert!(emitter.particles().iter().all(|p| p.time_to_live() > 0.0));
    }

    #[test]
    fn duration_stops_emission() {
        let config = quiet_config()
            .with_emission_rate(100.0)
            .with_duration(0.25)
            .with_lifespan(0.05, 0.0);
        let mut emitter = ParticleEmitter::new(config, 3);
        for _ in 0..3 {
            emitter.update(0.1, Vec2::ZERO, &NoColliders);
        }
        assert!(!emitter.is_emitting());
        for _ in 0..3 {
            emitter.update(0.1, Vec2::ZERO, &NoColliders);
        }
        assert!(emitter.all_expired());
    }

    #[test]
    fn pause_freezes_simulation() {
        let config = quiet_config().with_lifespan(1.0, 0.0);
        let mut emitter = ParticleEmitter::new(config, 42);
        emitter.emit(1, Vec2::ZERO);
        emitter.pause();
        emitter.update(5.0, Vec2::ZERO, &NoColliders);
        assert_eq!(emitter.live_count(), 1);
        emitter.resume();
        emitter.update(5.0, Vec2::ZERO, &NoColliders);
        assert_eq!(emitter.live_count(), 0);
    }

    #[test]
    fn stop_keeps_live_particles_clear_drops_them() {
        let config = quiet_config().with_lifespan(1.0, 0.0);
        let mut emitter = ParticleEmitter::new(config, 42);
        emitter.emit(3, Vec2::ZERO);
        emitter.stop();
        assert_eq!(emitter.live_count(), 3);
        assert!(!emitter.all_expired());
        emitter.clear();
        assert!(emitter.all_expired());
        emitter.play();
        assert!(emitter.is_emitting());
    }

    #[test]
    fn destroy_bounds_retires_escaping_particles() {
        let config = quiet_config()
            .with_speed(100.0, 0.0)
            .with_angle(0.0, 0.0)
            .with_lifespan(5.0, 0.0)
            .with_bounds(Bounds::new(-10.0, -10.0, 20.0, 20.0), BoundsBehaviour::Destroy);
        let mut emitter = ParticleEmitter::with_random(config, SequenceRandom::zero());
        emitter.emit(1, Vec2::ZERO);
        assert_eq!(emitter.update(0.05, Vec2::ZERO, &NoColliders), 0);
        assert_eq!(emitter.update(0.1, Vec2::ZERO, &NoColliders), 1);
    }

    #[test]
    fn reflect_bounds_turns_particles_around() {
        let config = quiet_config()
            .with_speed(100.0, 0.0)
            .with_angle(0.0, 0.0)
            .with_lifespan(5.0, 0.0)
            .with_bounds(Bounds::new(-10.0, -10.0, 20.0, 20.0), BoundsBehaviour::Reflect);
        let mut emitter = ParticleEmitter::with_random(config, SequenceRandom::zero());
        emitter.emit(1, Vec2::ZERO);
        emitter.update(0.15, Vec2::ZERO, &NoColliders);
        assert_eq!(emitter.live_count(), 1);
        assert!(emitter.particles()[0].direction().x < 0.0);
    }

    #[test]
    fn seed_drives_spawn_sampling() {
        let config = EmitterConfig::default().with_emission_rate(0.0);
        let mut a = ParticleEmitter::new(config.clone(), 0);
        let mut b = ParticleEmitter::with_random(config, Rng::new(0));
        a.emit(4, Vec2::ZERO);
        b.emit(4, Vec2::ZERO);
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.position(), pb.position());
            assert_eq!(pa.start_color(), pb.start_color());
        }
    }

    #[test]
    fn spawn_anchor_is_emitter_origin() {
        let mut emitter = ParticleEmitter::with_random(quiet_config(), SequenceRandom::zero());
        emitter.emit(1, Vec2::new(40.0, 2.0));
        assert_eq!(emitter.particles()[0].spawn_position(), Vec2::new(40.0, 2.0));
    }
}
