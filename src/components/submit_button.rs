use std::rc::Rc;
use std::time::Instant;

use gpui::{
    Animation, AnimationExt, ClickEvent, Entity, IntoElement, ParentElement, RenderOnce,
    SharedString, Styled, Window, div, px,
};

use crate::id::ComponentId;
use crate::provider::GalleryProvider;

use super::burst::BurstAnimator;
use super::button::{Button, PressHandler};

/// Filled submit button that plays the particle burst before forwarding the click.
#[derive(IntoElement)]
pub struct SubmitButton {
    id: ComponentId,
    label: SharedString,
    disabled: bool,
    animator: Entity<BurstAnimator>,
    on_click: Option<PressHandler>,
}

impl SubmitButton {
    #[track_caller]
    pub fn new(animator: Entity<BurstAnimator>) -> Self {
        Self {
            id: ComponentId::default(),
            label: "Submit".into(),
            disabled: false,
            animator,
            on_click: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn label(mut self, label: impl Into<SharedString>) -> Self {
        self.label = label.into();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_click(
        mut self,
        handler: impl Fn(&ClickEvent, &mut Window, &mut gpui::App) + 'static,
    ) -> Self {
        self.on_click = Some(Rc::new(handler));
        self
    }
}

impl RenderOnce for SubmitButton {
    fn render(self, _window: &mut Window, cx: &mut gpui::App) -> impl IntoElement {
        let theme = GalleryProvider::theme(cx);
        let animator = self.animator.read(cx);
        let particles = animator.render_particles(&self.id, theme.particle);
        let pulsing = animator.burst().is_pulsing(Instant::now());
        let ticket = animator.burst().ticket().filter(|_| pulsing);
        let pulse = animator.pulse_duration();

        let animator_for_click = self.animator.clone();
        let on_click = self.on_click.clone();
        let button = Button::new(self.label)
            .with_id(self.id.child("button"))
            .full_width(true)
            .disabled(self.disabled)
            .on_click(move |event, window, cx| {
                animator_for_click.update(cx, |animator, cx| animator.activate(cx));
                if let Some(handler) = on_click.as_ref() {
                    (handler)(event, window, cx);
                }
            });

        let mut root = div().relative().w_full().child(button);
        if let Some(ticket) = ticket {
            let ring = theme.particle;
            let radius = theme.radius_px;
            root = root.child(
                div()
                    .absolute()
                    .top_0()
                    .left_0()
                    .size_full()
                    .rounded(px(radius))
                    .border_2()
                    .border_color(ring)
                    .with_animation(
                        self.id.slot(&format!("pulse-{ticket:?}")),
                        Animation::new(pulse),
                        move |this, delta| this.opacity(1.0 - delta),
                    ),
            );
        }
        root.child(particles)
    }
}
