//! Emitter runtime state and the per-frame tick

use std::collections::HashSet;
use std::fmt;

use ember_core::{Sampler, SeededSampler, Vec2, Vec3};
use log::{debug, trace, warn};
use serde::Serialize;

use crate::despawn::should_despawn;
use crate::modules::ParticleModule;
use crate::options::{
    CoreOptions, EmissionOptions, EmitterOptions, RendererOptions, ShapeOptions,
};
use crate::particle::{Particle, ParticleInstance};

/// Running totals since construction or the last [`Emitter::reset`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmitterStats {
    pub spawned: u64,
    /// Removed to stay within `max_particles`
    pub evicted: u64,
    /// Removed by despawn rules
    pub despawned: u64,
    /// Continuous spawns skipped because they would have been evicted
    /// within the same tick
    pub skipped: u64,
    /// Ticks where `max_per_tick` cut continuous emission short
    pub capped_ticks: u64,
}

/// Spawns, updates and retires particles over a series of loops.
///
/// The emitter is `Active` until a finite loop budget is used up, then
/// `Expired` for good; an expired emitter ignores `tick`.
pub struct Emitter<S: Sampler = SeededSampler> {
    options: EmitterOptions,
    particles: Vec<Particle>,
    modules: Vec<Box<dyn ParticleModule>>,
    sampler: S,
    /// Seconds elapsed in the current loop
    duration_timer: f64,
    /// Seconds banked towards the next continuous spawn
    emission_timer: f64,
    /// Completed loops
    current_loop: u32,
    /// Burst indices already fired this loop
    attempted_bursts: HashSet<usize>,
    /// Whether the emission cap has been reported this loop
    cap_reported: bool,
    /// Scratch flags for the despawn pass, parallel to `particles`
    despawn_marks: Vec<bool>,
    stats: EmitterStats,
}

impl Emitter<SeededSampler> {
    /// An emitter with the default options and the default seeded sampler
    pub fn new() -> Self {
        Self::from_parts(EmitterOptions::default(), SeededSampler::default())
    }

    /// An emitter with custom options, validated up front
    pub fn with_options(options: EmitterOptions) -> ember_core::Result<Self> {
        Self::with_sampler(options, SeededSampler::default())
    }
}

impl Default for Emitter<SeededSampler> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sampler> Emitter<S> {
    pub fn with_sampler(options: EmitterOptions, sampler: S) -> ember_core::Result<Self> {
        options.validate()?;
        Ok(Self::from_parts(options, sampler))
    }

    fn from_parts(options: EmitterOptions, sampler: S) -> Self {
        let capacity = options.core.max_particles;
        Self {
            options,
            particles: Vec::with_capacity(capacity),
            modules: Vec::new(),
            sampler,
            duration_timer: 0.0,
            emission_timer: 0.0,
            current_loop: 0,
            attempted_bursts: HashSet::new(),
            cap_reported: false,
            despawn_marks: Vec::new(),
            stats: EmitterStats::default(),
        }
    }

    // ── Options ──

    pub fn options(&self) -> &EmitterOptions {
        &self.options
    }

    /// Direct access for configuration code between ticks. Values written
    /// here skip validation; `tick` stays well-behaved regardless.
    pub fn options_mut(&mut self) -> &mut EmitterOptions {
        &mut self.options
    }

    /// Replace all option groups after validating them
    pub fn set_options(&mut self, options: EmitterOptions) -> ember_core::Result<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    pub fn core(&self) -> &CoreOptions {
        &self.options.core
    }

    pub fn emission(&self) -> &EmissionOptions {
        &self.options.emission
    }

    pub fn shape(&self) -> &ShapeOptions {
        &self.options.shape
    }

    pub fn renderer(&self) -> &RendererOptions {
        &self.options.renderer
    }

    // ── Modules ──

    /// Append a module; modules run in the order they were added
    pub fn add_module(&mut self, module: impl ParticleModule + 'static) {
        self.modules.push(Box::new(module));
    }

    pub fn add_boxed_module(&mut self, module: Box<dyn ParticleModule>) {
        self.modules.push(module);
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    // ── Runtime state ──

    /// True once a finite loop budget has been used up
    pub fn is_expired(&self) -> bool {
        let loops = self.options.core.loops;
        loops >= 0 && i64::from(self.current_loop) >= i64::from(loops)
    }

    pub fn current_loop(&self) -> u32 {
        self.current_loop
    }

    pub fn duration_timer(&self) -> f64 {
        self.duration_timer
    }

    pub fn emission_timer(&self) -> f64 {
        self.emission_timer
    }

    /// Live particles, oldest first
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn stats(&self) -> EmitterStats {
        self.stats
    }

    /// Drop all particles and timers, returning to the first loop.
    /// Options and modules are kept.
    pub fn reset(&mut self) {
        self.particles.clear();
        self.duration_timer = 0.0;
        self.emission_timer = 0.0;
        self.current_loop = 0;
        self.attempted_bursts.clear();
        self.cap_reported = false;
        self.stats = EmitterStats::default();
    }

    /// Pack live particles for instanced drawing
    pub fn instances(&self) -> Vec<ParticleInstance> {
        let renderer = &self.options.renderer;
        self.particles
            .iter()
            .map(|p| ParticleInstance::from_particle(p, renderer.frames_x, renderer.frames_y))
            .collect()
    }

    // ── Simulation ──

    /// Advance the simulation by `delta` seconds.
    ///
    /// Negative or non-finite deltas are treated as zero.
    pub fn tick(&mut self, delta: f64) {
        if self.is_expired() {
            return;
        }

        let delta = if delta.is_finite() && delta >= 0.0 {
            delta
        } else {
            warn!("Ignoring invalid tick delta {delta}; using 0");
            0.0
        };

        // Loop accounting
        self.duration_timer += delta;
        if self.duration_timer >= self.options.core.duration {
            self.current_loop += 1;
            if self.is_expired() {
                debug!(
                    "Emitter expired after {} loop(s) with {} live particle(s)",
                    self.current_loop,
                    self.particles.len()
                );
                return;
            }
            debug!("Emitter starting loop {}", self.current_loop);
            self.duration_timer = 0.0;
            self.attempted_bursts.clear();
            self.cap_reported = false;
        }

        let burst_spawns = self.emit_bursts();
        let continuous_spawns = self.emit_continuous(delta);
        let despawned = self.update_particles(delta as f32);

        trace!(
            "tick dt={delta:.4}: +{burst_spawns} burst, +{continuous_spawns} continuous, -{despawned} despawned, {} live",
            self.particles.len()
        );
    }

    /// Fire every burst whose time has been reached and that has not fired
    /// yet this loop. Returns the number of particles spawned.
    fn emit_bursts(&mut self) -> usize {
        let mut spawned = 0;
        for index in 0..self.options.emission.bursts.len() {
            let burst = &self.options.emission.bursts[index];
            if burst.time > self.duration_timer || self.attempted_bursts.contains(&index) {
                continue;
            }
            let count = burst.count.resolve(&mut self.sampler);
            debug!(
                "Burst {index} firing {count} particle(s) at t={:.3}",
                self.duration_timer
            );
            for _ in 0..count {
                self.push_particle();
                self.trim_batch_overflow();
            }
            self.evict_overflow();
            spawned += count as usize;
            self.attempted_bursts.insert(index);
        }
        spawned
    }

    /// Rate-based emission with catch-up, so long-run output matches the
    /// rate whatever the frame times. Returns the number spawned.
    ///
    /// A backlog larger than `max_particles` is fast-forwarded: those spawns
    /// would be evicted before the tick ends, so only the newest
    /// `max_particles` of them are created and the timer keeps its phase.
    fn emit_continuous(&mut self, delta: f64) -> usize {
        let rate = self.options.emission.rate;
        if !rate.is_finite() || rate <= 0.0 {
            return 0;
        }
        let interval = 1.0 / rate;
        let capacity = self.options.core.max_particles;
        let cap = self.options.emission.max_per_tick;

        self.emission_timer += delta;

        let backlog_limit = (capacity as f64 + 1.0) * interval;
        if self.emission_timer > backlog_limit {
            let pending = (self.emission_timer / interval).ceil() - 1.0;
            let skipped = (pending - capacity as f64).max(0.0);
            let phase = self.emission_timer % interval;
            self.emission_timer = if phase > 0.0 && phase.is_finite() {
                capacity as f64 * interval + phase
            } else {
                backlog_limit
            };
            debug!(
                "Skipping {skipped:.0} continuous spawn(s) that would be evicted this tick"
            );
            self.stats.skipped += skipped as u64;
        }

        let mut spawned = 0;
        while self.emission_timer > interval && spawned <= capacity {
            if cap.is_some_and(|cap| spawned >= cap as usize) {
                self.report_cap(spawned, self.emission_timer - interval);
                self.emission_timer = interval;
                break;
            }
            self.emission_timer -= interval;
            self.push_particle();
            self.trim_batch_overflow();
            spawned += 1;
        }
        self.evict_overflow();
        spawned
    }

    /// Warn the first time the emission cap is hit in a loop, debug after
    fn report_cap(&mut self, spawned: usize, backlog: f64) {
        self.stats.capped_ticks += 1;
        if self.cap_reported {
            debug!("Continuous emission capped at {spawned}; dropping {backlog:.3}s of backlog");
        } else {
            warn!(
                "Continuous emission capped at {spawned} this tick; dropping {backlog:.3}s of backlog \
                 (further caps this loop are logged at debug)"
            );
            self.cap_reported = true;
        }
    }

    /// Integrate, run modules and apply despawn rules on every particle.
    /// Particles are visited newest first; the dead are marked and removed
    /// in a single compaction afterwards. Returns the number removed.
    fn update_particles(&mut self, dt: f32) -> usize {
        let gravity = Vec3::Y * self.options.core.gravity;
        let rules = &self.options.core.despawning_rules;
        let marks = &mut self.despawn_marks;
        marks.clear();
        marks.resize(self.particles.len(), false);
        let mut removed = 0;

        for (particle, dead) in self.particles.iter_mut().zip(marks.iter_mut()).rev() {
            particle.lifetime -= dt;
            particle.age += dt;
            particle.velocity += gravity * dt;
            particle.location += particle.velocity * dt;

            for module in self.modules.iter_mut() {
                module.apply(particle);
            }

            if should_despawn(rules, particle) {
                *dead = true;
                removed += 1;
            }
        }

        if removed > 0 {
            let mut marks = self.despawn_marks.iter();
            self.particles
                .retain(|_| marks.next().is_some_and(|&dead| !dead));
        }
        self.stats.despawned += removed as u64;
        removed
    }

    /// Create one particle from the current options and append it, evicting
    /// the oldest particles if the collection is over capacity.
    ///
    /// Returns the new particle for further initialization. `None` only if
    /// the capacity was set to zero through [`Emitter::options_mut`].
    pub fn spawn(&mut self) -> Option<&mut Particle> {
        self.push_particle();
        self.evict_overflow();
        self.particles.last_mut()
    }

    /// Sample and append one particle without enforcing capacity
    fn push_particle(&mut self) {
        let core = &self.options.core;
        let shape = &self.options.shape;
        let sampler = &mut self.sampler;

        let origin: Vec2 = shape.source.sample_inside(sampler);
        let lifetime = core.initial_lifetime.resolve(sampler);
        let size = core.initial_size.resolve(sampler);
        let rotation = core.initial_rotation.resolve(sampler);
        let colour = core.initial_colour.resolve(sampler);
        let angle = shape.angle.resolve(sampler);
        let speed = core.initial_speed.resolve(sampler);

        self.particles.push(Particle {
            location: origin.extend(0.0),
            velocity: Vec2::from_angle(angle).extend(0.0) * speed,
            lifetime,
            age: 0.0,
            size,
            rotation,
            colour,
        });
        self.stats.spawned += 1;
    }

    /// During a batch of spawns, let the collection grow to twice its
    /// capacity before compacting, so each eviction moves `max_particles`
    /// elements at most once per `max_particles` spawns
    fn trim_batch_overflow(&mut self) {
        if self.particles.len() >= self.options.core.max_particles.max(1) * 2 {
            self.evict_overflow();
        }
    }

    /// Drop the oldest particles until the collection fits its capacity
    fn evict_overflow(&mut self) {
        let max = self.options.core.max_particles;
        if self.particles.len() > max {
            let excess = self.particles.len() - max;
            self.particles.drain(..excess);
            self.stats.evicted += excess as u64;
        }
    }
}

impl<S: Sampler> fmt::Debug for Emitter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("options", &self.options)
            .field("particles", &self.particles.len())
            .field("modules", &self.modules.len())
            .field("duration_timer", &self.duration_timer)
            .field("emission_timer", &self.emission_timer)
            .field("current_loop", &self.current_loop)
            .field("stats", &self.stats)
            .field("expired", &self.is_expired())
            .finish()
    }
}
