use std::time::Duration;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MotionLevel {
    Full,
    Reduced,
    None,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn apply(self, delta: f32) -> f32 {
        let delta = delta.clamp(0.0, 1.0);
        match self {
            Easing::Linear => gpui::linear(delta),
            Easing::EaseIn => gpui::quadratic(delta),
            Easing::EaseOut => gpui::ease_out_quint()(delta),
            Easing::EaseInOut => gpui::ease_in_out(delta),
        }
    }
}

/// Timing of the submit button pulse and its particle burst.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BurstTiming {
    pub pulse_ms: u64,
    pub particle_ms: u64,
    /// Extra wait after the particles finish before the batch is dropped.
    pub cleanup_grace_ms: u64,
    pub particle_count: usize,
    pub easing: Easing,
}

impl Default for BurstTiming {
    fn default() -> Self {
        Self {
            pulse_ms: 300,
            particle_ms: 1200,
            cleanup_grace_ms: 100,
            particle_count: 5,
            easing: Easing::EaseOut,
        }
    }
}

impl BurstTiming {
    pub fn pulse(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }

    pub fn particle_lifetime(&self) -> Duration {
        Duration::from_millis(self.particle_ms)
    }

    pub fn cleanup_after(&self) -> Duration {
        Duration::from_millis(self.particle_ms + self.cleanup_grace_ms)
    }

    pub fn particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn particle_ms(mut self, particle_ms: u64) -> Self {
        self.particle_ms = particle_ms;
        self
    }
}

/// Timing of the credit card flip; the face swaps at the midpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FlipTiming {
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Default for FlipTiming {
    fn default() -> Self {
        Self {
            duration_ms: 600,
            easing: Easing::EaseInOut,
        }
    }
}

impl FlipTiming {
    pub fn total(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn half(&self) -> Duration {
        Duration::from_millis(self.duration_ms / 2)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MotionConfig {
    pub level: MotionLevel,
    pub burst: BurstTiming,
    pub flip: FlipTiming,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            level: MotionLevel::Full,
            burst: BurstTiming::default(),
            flip: FlipTiming::default(),
        }
    }
}

impl MotionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: MotionLevel) -> Self {
        self.level = level;
        self
    }

    pub fn burst(mut self, burst: BurstTiming) -> Self {
        self.burst = burst;
        self
    }

    pub fn flip(mut self, flip: FlipTiming) -> Self {
        self.flip = flip;
        self
    }

    pub fn particles_enabled(&self) -> bool {
        self.level != MotionLevel::None && self.burst.particle_count > 0
    }

    /// Reduced motion halves the flip; no motion makes it instant.
    pub fn flip_timing(&self) -> FlipTiming {
        match self.level {
            MotionLevel::Full => self.flip,
            MotionLevel::Reduced => FlipTiming {
                duration_ms: self.flip.duration_ms / 2,
                ..self.flip
            },
            MotionLevel::None => FlipTiming {
                duration_ms: 0,
                ..self.flip
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timings_match_the_gallery_animations() {
        let motion = MotionConfig::default();
        assert_eq!(motion.burst.pulse(), Duration::from_millis(300));
        assert_eq!(motion.burst.particle_lifetime(), Duration::from_millis(1200));
        assert_eq!(motion.burst.cleanup_after(), Duration::from_millis(1300));
        assert_eq!(motion.burst.particle_count, 5);
        assert_eq!(motion.flip.total(), Duration::from_millis(600));
        assert_eq!(motion.flip.half(), Duration::from_millis(300));
    }

    #[test]
    fn motion_level_scales_flip_and_particles() {
        let none = MotionConfig::new().level(MotionLevel::None);
        assert!(!none.particles_enabled());
        assert_eq!(none.flip_timing().duration_ms, 0);

        let reduced = MotionConfig::new().level(MotionLevel::Reduced);
        assert!(reduced.particles_enabled());
        assert_eq!(reduced.flip_timing().duration_ms, 300);
    }

    #[test]
    fn easing_is_clamped_to_unit_range() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
        assert!((Easing::EaseOut.apply(1.0) - 1.0).abs() < f32::EPSILON);
    }
}
