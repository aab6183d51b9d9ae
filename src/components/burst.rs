use std::time::{Duration, Instant};

use gpui::{
    Animation, AnimationExt, Context, Div, Hsla, ParentElement, Styled, Task, div, px,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::icon::IconName;
use crate::id::ComponentId;
use crate::motion::{BurstTiming, MotionConfig};
use crate::provider::GalleryProvider;

use super::icon::Icon;

pub const ANGLE_RANGE_DEG: (i32, i32) = (0, 360);
pub const DISTANCE_RANGE_PX: (i32, i32) = (64, 96);
pub const ROTATION_RANGE_DEG: (i32, i32) = (-30, 30);
const PARTICLE_SIZE_PX: f32 = 14.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Particle {
    pub angle_deg: i32,
    pub distance_px: i32,
    pub rotation_deg: i32,
}

impl Particle {
    /// Draws every component from its inclusive range.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            angle_deg: rng.gen_range(ANGLE_RANGE_DEG.0..=ANGLE_RANGE_DEG.1),
            distance_px: rng.gen_range(DISTANCE_RANGE_PX.0..=DISTANCE_RANGE_PX.1),
            rotation_deg: rng.gen_range(ROTATION_RANGE_DEG.0..=ROTATION_RANGE_DEG.1),
        }
    }

    /// Final offset from the button center in pixels.
    pub fn offset(&self) -> (f32, f32) {
        let radians = (self.angle_deg as f32).to_radians();
        let distance = self.distance_px as f32;
        (distance * radians.cos(), distance * radians.sin())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct BurstTicket(u64);

/// Particle batch of one submit button. Each activation replaces the previous batch and
/// only the cleanup holding the latest ticket clears it.
#[derive(Clone, Debug)]
pub struct ParticleBurst {
    timing: BurstTiming,
    spawn_particles: bool,
    generation: u64,
    started_at: Option<Instant>,
    particles: Vec<Particle>,
}

impl ParticleBurst {
    pub fn new(timing: BurstTiming) -> Self {
        Self {
            timing,
            spawn_particles: true,
            generation: 0,
            started_at: None,
            particles: Vec::new(),
        }
    }

    pub fn from_motion(motion: MotionConfig) -> Self {
        let mut burst = Self::new(motion.burst);
        burst.spawn_particles = motion.particles_enabled();
        burst
    }

    pub fn timing(&self) -> BurstTiming {
        self.timing
    }

    pub fn activate(&mut self, now: Instant, rng: &mut impl Rng) -> BurstTicket {
        self.generation += 1;
        self.started_at = Some(now);
        self.particles.clear();
        if self.spawn_particles {
            self.particles
                .extend((0..self.timing.particle_count).map(|_| Particle::random(rng)));
        }
        BurstTicket(self.generation)
    }

    /// Clears the batch if `ticket` is still current. Returns whether anything changed.
    pub fn cleanup(&mut self, ticket: BurstTicket) -> bool {
        if ticket.0 != self.generation || self.started_at.is_none() {
            return false;
        }
        self.started_at = None;
        self.particles.clear();
        true
    }

    pub fn ticket(&self) -> Option<BurstTicket> {
        self.started_at.map(|_| BurstTicket(self.generation))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_pulsing(&self, now: Instant) -> bool {
        self.started_at
            .is_some_and(|started| now.saturating_duration_since(started) < self.timing.pulse())
    }
}

/// Entity that owns a button's burst and the timer that clears it.
pub struct BurstAnimator {
    burst: ParticleBurst,
    rng: StdRng,
    cleanup: Option<Task<()>>,
}

impl BurstAnimator {
    pub fn new(cx: &mut Context<Self>) -> Self {
        Self::with_rng(GalleryProvider::motion(cx), StdRng::from_entropy())
    }

    pub fn with_rng(motion: MotionConfig, rng: StdRng) -> Self {
        Self {
            burst: ParticleBurst::from_motion(motion),
            rng,
            cleanup: None,
        }
    }

    pub fn burst(&self) -> &ParticleBurst {
        &self.burst
    }

    pub fn activate(&mut self, cx: &mut Context<Self>) {
        let ticket = self.burst.activate(Instant::now(), &mut self.rng);
        let delay = self.burst.timing().cleanup_after();
        tracing::trace!(?ticket, particles = self.burst.particles().len(), "burst activated");
        self.cleanup = Some(cx.spawn(async move |this, cx| {
            cx.background_executor().timer(delay).await;
            let _ = this.update(cx, |animator, cx| {
                if animator.burst.cleanup(ticket) {
                    animator.cleanup = None;
                    cx.notify();
                }
            });
        }));
        cx.notify();
    }

    /// Absolutely positioned particles, centered on the parent.
    pub fn render_particles(&self, id: &ComponentId, color: Hsla) -> Div {
        let mut layer = div()
            .absolute()
            .top_0()
            .left_0()
            .size_full()
            .flex()
            .items_center()
            .justify_center();
        let Some(ticket) = self.burst.ticket() else {
            return layer;
        };

        let timing = self.burst.timing();
        let lifetime = timing.particle_lifetime();
        for (index, particle) in self.burst.particles().iter().enumerate() {
            let (dx, dy) = particle.offset();
            let icon = Icon::new(IconName::Sparkle)
                .size(PARTICLE_SIZE_PX)
                .color(color)
                .rotate(particle.rotation_deg as f32);
            let easing = timing.easing;
            let element_id = id.slot_index(&format!("particle-{}", ticket.0), index);
            let particle = div().absolute().child(icon).with_animation(
                element_id,
                Animation::new(lifetime),
                move |this, delta| {
                    let progress = easing.apply(delta);
                    this.left(px(dx * progress - PARTICLE_SIZE_PX / 2.0))
                        .top(px(dy * progress - PARTICLE_SIZE_PX / 2.0))
                        .opacity(1.0 - delta)
                },
            );
            // zero-size anchor at the center of the layer
            layer = layer.child(div().relative().size(px(0.0)).child(particle));
        }
        layer
    }

    pub fn pulse_duration(&self) -> Duration {
        self.burst.timing().pulse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::MotionLevel;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn particles_stay_inside_their_ranges() {
        let mut rng = seeded();
        for _ in 0..500 {
            let particle = Particle::random(&mut rng);
            assert!((0..=360).contains(&particle.angle_deg));
            assert!((64..=96).contains(&particle.distance_px));
            assert!((-30..=30).contains(&particle.rotation_deg));
        }
    }

    #[test]
    fn offset_follows_polar_coordinates() {
        let particle = Particle {
            angle_deg: 90,
            distance_px: 80,
            rotation_deg: 0,
        };
        let (x, y) = particle.offset();
        assert!(x.abs() < 1e-3);
        assert!((y - 80.0).abs() < 1e-3);
    }

    #[test]
    fn activation_spawns_configured_particle_count() {
        let mut burst = ParticleBurst::new(BurstTiming::default());
        let ticket = burst.activate(Instant::now(), &mut seeded());
        assert_eq!(burst.particles().len(), 5);
        assert_eq!(burst.ticket(), Some(ticket));
    }

    #[test]
    fn second_activation_supersedes_first_cleanup() {
        let mut rng = seeded();
        let mut burst = ParticleBurst::new(BurstTiming::default());
        let start = Instant::now();
        let first = burst.activate(start, &mut rng);
        let first_batch = burst.particles().to_vec();
        let second = burst.activate(start + Duration::from_millis(400), &mut rng);
        let second_batch = burst.particles().to_vec();

        assert_eq!(second_batch.len(), 5);
        assert_ne!(first_batch, second_batch);
        assert!(!burst.cleanup(first));
        assert_eq!(burst.particles(), second_batch.as_slice());
        assert!(burst.cleanup(second));
        assert!(burst.particles().is_empty());
        assert!(!burst.is_active());
    }

    #[test]
    fn cleanup_is_idempotent() {
        let mut burst = ParticleBurst::new(BurstTiming::default());
        let ticket = burst.activate(Instant::now(), &mut seeded());
        assert!(burst.cleanup(ticket));
        assert!(!burst.cleanup(ticket));
    }

    #[test]
    fn pulse_window_matches_timing() {
        let mut burst = ParticleBurst::new(BurstTiming::default());
        let start = Instant::now();
        burst.activate(start, &mut seeded());
        assert!(burst.is_pulsing(start + Duration::from_millis(299)));
        assert!(!burst.is_pulsing(start + Duration::from_millis(300)));
    }

    #[test]
    fn disabled_motion_keeps_pulse_without_particles() {
        let motion = MotionConfig::default().level(MotionLevel::None);
        let mut burst = ParticleBurst::from_motion(motion);
        let ticket = burst.activate(Instant::now(), &mut seeded());
        assert!(burst.particles().is_empty());
        assert!(burst.cleanup(ticket));
    }
}
