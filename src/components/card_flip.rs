use gpui::{Context, Task};

use crate::motion::{Easing, FlipTiming, MotionConfig};
use crate::provider::GalleryProvider;

pub const FLIP_ROTATE_X_DEG: f32 = 87.0;
pub const FLIP_ROTATE_Z_DEG: f32 = 5.0;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CardSide {
    #[default]
    Front,
    Back,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FlipPhase {
    Resting,
    RotatingAway,
    RotatingBack,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct FlipTicket(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardRotation {
    pub x_deg: f32,
    pub z_deg: f32,
}

impl CardRotation {
    pub const REST: Self = Self {
        x_deg: 0.0,
        z_deg: 0.0,
    };

    pub const AWAY: Self = Self {
        x_deg: FLIP_ROTATE_X_DEG,
        z_deg: FLIP_ROTATE_Z_DEG,
    };

    fn scaled(progress: f32) -> Self {
        Self {
            x_deg: FLIP_ROTATE_X_DEG * progress,
            z_deg: FLIP_ROTATE_Z_DEG * progress,
        }
    }

    /// Visible height fraction of a card tilted by `x_deg` around its horizontal axis.
    pub fn height_scale(&self) -> f32 {
        self.x_deg.to_radians().cos().max(0.0)
    }
}

/// Two-half flip between the card faces. The face swaps at the midpoint to whatever side
/// was requested last, so quick focus changes never leave the card on a stale face.
#[derive(Clone, Debug)]
pub struct CardFlip {
    displayed: CardSide,
    desired: CardSide,
    phase: FlipPhase,
    generation: u64,
}

impl Default for CardFlip {
    fn default() -> Self {
        Self::new(CardSide::Front)
    }
}

impl CardFlip {
    pub fn new(side: CardSide) -> Self {
        Self {
            displayed: side,
            desired: side,
            phase: FlipPhase::Resting,
            generation: 0,
        }
    }

    pub fn displayed(&self) -> CardSide {
        self.displayed
    }

    pub fn desired(&self) -> CardSide {
        self.desired
    }

    pub fn phase(&self) -> FlipPhase {
        self.phase
    }

    pub fn ticket(&self) -> FlipTicket {
        FlipTicket(self.generation)
    }

    /// Requests `side`. Returns a ticket when this starts a new transition.
    pub fn set_desired(&mut self, side: CardSide) -> Option<FlipTicket> {
        self.desired = side;
        if self.phase == FlipPhase::Resting && side != self.displayed {
            return Some(self.start());
        }
        None
    }

    pub fn midpoint(&mut self, ticket: FlipTicket) -> bool {
        if ticket != self.ticket() || self.phase != FlipPhase::RotatingAway {
            return false;
        }
        self.displayed = self.desired;
        self.phase = FlipPhase::RotatingBack;
        true
    }

    /// Ends the transition, or starts the next one if the request changed after the midpoint.
    pub fn finish(&mut self, ticket: FlipTicket) -> Option<FlipTicket> {
        if ticket != self.ticket() || self.phase != FlipPhase::RotatingBack {
            return None;
        }
        if self.desired != self.displayed {
            return Some(self.start());
        }
        self.phase = FlipPhase::Resting;
        None
    }

    /// Target rotation of the current phase.
    pub fn rotation(&self) -> CardRotation {
        match self.phase {
            FlipPhase::RotatingAway => CardRotation::AWAY,
            FlipPhase::Resting | FlipPhase::RotatingBack => CardRotation::REST,
        }
    }

    /// Rotation `delta` (0..=1) of the way through the current half.
    pub fn rotation_at(&self, delta: f32, easing: Easing) -> CardRotation {
        let progress = easing.apply(delta);
        match self.phase {
            FlipPhase::Resting => CardRotation::REST,
            FlipPhase::RotatingAway => CardRotation::scaled(progress),
            FlipPhase::RotatingBack => CardRotation::scaled(1.0 - progress),
        }
    }

    fn start(&mut self) -> FlipTicket {
        self.generation += 1;
        self.phase = FlipPhase::RotatingAway;
        self.ticket()
    }
}

/// Entity that drives a `CardFlip` with timers. Dropping it cancels the pending halves.
pub struct CardFlipAnimator {
    flip: CardFlip,
    timing: FlipTiming,
    task: Option<Task<()>>,
}

impl CardFlipAnimator {
    pub fn new(cx: &mut Context<Self>) -> Self {
        Self::with_motion(GalleryProvider::motion(cx))
    }

    pub fn with_motion(motion: MotionConfig) -> Self {
        Self {
            flip: CardFlip::default(),
            timing: motion.flip_timing(),
            task: None,
        }
    }

    pub fn flip(&self) -> &CardFlip {
        &self.flip
    }

    pub fn timing(&self) -> FlipTiming {
        self.timing
    }

    pub fn show(&mut self, side: CardSide, cx: &mut Context<Self>) {
        let Some(ticket) = self.flip.set_desired(side) else {
            return;
        };
        tracing::trace!(?side, ?ticket, "card flip started");
        self.run(ticket, cx);
        cx.notify();
    }

    fn run(&mut self, ticket: FlipTicket, cx: &mut Context<Self>) {
        let half = self.timing.half();
        if half.is_zero() {
            let mut ticket = ticket;
            loop {
                self.flip.midpoint(ticket);
                match self.flip.finish(ticket) {
                    Some(next) => ticket = next,
                    None => break,
                }
            }
            self.task = None;
            return;
        }

        self.task = Some(cx.spawn(async move |this, cx| {
            let mut ticket = ticket;
            loop {
                cx.background_executor().timer(half).await;
                let swapped = this.update(cx, |animator, cx| {
                    animator.flip.midpoint(ticket);
                    cx.notify();
                });
                if swapped.is_err() {
                    return;
                }

                cx.background_executor().timer(half).await;
                let next = this.update(cx, |animator, cx| {
                    let next = animator.flip.finish(ticket);
                    cx.notify();
                    next
                });
                match next {
                    Ok(Some(next)) => ticket = next,
                    _ => return,
                }
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flipping_to_back_swaps_at_midpoint() {
        let mut flip = CardFlip::default();
        let ticket = flip.set_desired(CardSide::Back).expect("starts a flip");
        assert_eq!(flip.phase(), FlipPhase::RotatingAway);
        assert_eq!(flip.displayed(), CardSide::Front);
        assert_eq!(flip.rotation(), CardRotation::AWAY);

        assert!(flip.midpoint(ticket));
        assert_eq!(flip.displayed(), CardSide::Back);
        assert_eq!(flip.finish(ticket), None);
        assert_eq!(flip.phase(), FlipPhase::Resting);
        assert_eq!(flip.rotation(), CardRotation::REST);
    }

    #[test]
    fn back_then_front_before_midpoint_rests_on_front() {
        let mut flip = CardFlip::default();
        let ticket = flip.set_desired(CardSide::Back).expect("starts a flip");
        assert_eq!(flip.set_desired(CardSide::Front), None);

        flip.midpoint(ticket);
        assert_eq!(flip.displayed(), CardSide::Front);
        assert_eq!(flip.finish(ticket), None);
        assert_eq!(flip.displayed(), CardSide::Front);
        assert_eq!(flip.phase(), FlipPhase::Resting);
        assert_eq!(flip.rotation(), CardRotation::REST);
    }

    #[test]
    fn request_after_midpoint_starts_another_flip() {
        let mut flip = CardFlip::default();
        let first = flip.set_desired(CardSide::Back).expect("starts a flip");
        flip.midpoint(first);
        flip.set_desired(CardSide::Front);

        let second = flip.finish(first).expect("re-flips to the latest side");
        assert_ne!(first, second);
        assert!(!flip.midpoint(first));
        assert!(flip.midpoint(second));
        assert_eq!(flip.finish(second), None);
        assert_eq!(flip.displayed(), CardSide::Front);
    }

    #[test]
    fn requesting_displayed_side_while_resting_is_a_no_op() {
        let mut flip = CardFlip::default();
        assert_eq!(flip.set_desired(CardSide::Front), None);
        assert_eq!(flip.phase(), FlipPhase::Resting);
    }

    #[test]
    fn rotation_interpolates_each_half() {
        let mut flip = CardFlip::default();
        let ticket = flip.set_desired(CardSide::Back).expect("starts a flip");
        let halfway = flip.rotation_at(0.5, Easing::Linear);
        assert!((halfway.x_deg - 43.5).abs() < 1e-4);
        assert!((halfway.z_deg - 2.5).abs() < 1e-4);

        flip.midpoint(ticket);
        assert_eq!(flip.rotation_at(1.0, Easing::Linear), CardRotation::REST);
        assert!(CardRotation::AWAY.height_scale() < 0.06);
        assert_eq!(CardRotation::REST.height_scale(), 1.0);
    }

    #[test]
    fn instant_motion_settles_synchronously() {
        use crate::motion::MotionLevel;

        let animator = CardFlipAnimator::with_motion(MotionConfig::new().level(MotionLevel::None));
        assert!(animator.timing().half().is_zero());
    }
}
