use gpui::{
    Animation, AnimationExt, Entity, FontWeight, IntoElement, ParentElement, RenderOnce,
    SharedString, Styled, Window, div, linear_color_stop, linear_gradient, prelude::FluentBuilder,
    px,
};

use crate::id::ComponentId;
use crate::provider::GalleryProvider;
use crate::theme::CardColors;

use super::card_flip::{CardFlipAnimator, CardSide, FlipPhase};

pub const CARD_WIDTH_PX: f32 = 300.0;
pub const CARD_ASPECT: f32 = 1.5;
const FILLER_SHORT: &str = "Lorem ipsum dolor sit amet consectetur";
const FILLER_MEDIUM: &str = "Lorem ipsum dolor sit amet consectetur adipisicing elit.";
const FILLER_LONG: &str = "Lorem ipsum dolor, sit amet consectetur adipisicing elit. Natus \
    laborum, reprehenderit, quis nobis similique minus, molestiae id fuga cum nihil nulla";

fn char_slice(value: &str, start: usize, end: usize) -> String {
    value
        .chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

/// `4242424242424242` becomes `4242 4242 4242 4242`; never longer than 19 characters.
pub fn format_card_number(digits: &str) -> String {
    let len = digits.chars().count();
    let groups = [
        char_slice(digits, 0, 4),
        char_slice(digits, 4, 8),
        char_slice(digits, 8, 12),
        char_slice(digits, 12, len.max(12)),
    ];
    char_slice(&groups.join(" "), 0, 19)
}

/// `YY/MM` from a four digit year and a month.
pub fn format_expiry(year: &str, month: &str) -> String {
    format!("{}/{}", char_slice(year, 2, 4), char_slice(month, 0, 2))
}

pub fn format_cvc(cvc: &str) -> String {
    char_slice(cvc, 0, 3)
}

/// Values mirrored on the card.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CardFace {
    pub number: SharedString,
    pub name: SharedString,
    pub year: SharedString,
    pub month: SharedString,
    pub cvc: SharedString,
}

/// Card preview that flips to the back while the cvc is being edited.
#[derive(IntoElement)]
pub struct CreditCardVisualization {
    id: ComponentId,
    face: CardFace,
    flip: Entity<CardFlipAnimator>,
}

impl CreditCardVisualization {
    #[track_caller]
    pub fn new(face: CardFace, flip: Entity<CardFlipAnimator>) -> Self {
        Self {
            id: ComponentId::default(),
            face,
            flip,
        }
    }

    pub fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        self.id = id.into();
        self
    }
}

fn render_front(face: &CardFace, colors: &CardColors) -> gpui::Div {
    let number = format_card_number(&face.number);
    let small_number = char_slice(&number, 0, 4);
    div()
        .flex()
        .flex_col()
        .child(
            div()
                .mt(px(30.0))
                .mb_2()
                .w(px(52.0))
                .h(px(38.0))
                .rounded(px(6.0))
                .bg(colors.chip),
        )
        .child(
            div()
                .min_h(px(32.0))
                .text_2xl()
                .font_weight(FontWeight::BOLD)
                .whitespace_nowrap()
                .child(number),
        )
        .child(
            div()
                .min_h(px(12.0))
                .text_size(px(8.0))
                .opacity(0.7)
                .child(small_number),
        )
        .child(
            div()
                .flex()
                .flex_row()
                .gap_2()
                .map(|mut this| {
                    this.style().align_self = Some(gpui::AlignSelf::Center);
                    this
                })
                .items_center()
                .child(
                    div()
                        .flex()
                        .flex_col()
                        .text_size(px(8.0))
                        .opacity(0.7)
                        .child("VALID")
                        .child("THRU"),
                )
                .child(div().min_h(px(20.0)).child(format_expiry(&face.year, &face.month))),
        )
        .child(
            div()
                .min_h(px(20.0))
                .opacity(0.7)
                .whitespace_nowrap()
                .overflow_hidden()
                .child(face.name.to_uppercase()),
        )
}

fn render_back(face: &CardFace, colors: &CardColors) -> gpui::Div {
    let filler = |text: &'static str| div().text_size(px(7.0)).opacity(0.7).mb_2().child(text);
    div()
        .flex()
        .flex_col()
        .child(filler(FILLER_SHORT))
        .child(div().h(px(50.0)).mx(px(-12.0)).mb_1().bg(colors.magnetic_strip))
        .child(filler(FILLER_MEDIUM).text_center())
        .child(
            div()
                .h(px(35.0))
                .mb_3()
                .pr_4()
                .flex()
                .items_center()
                .justify_end()
                .bg(colors.signature)
                .text_color(colors.signature_text)
                .italic()
                .child(format_cvc(&face.cvc)),
        )
        .child(filler(FILLER_LONG).text_center())
}

impl RenderOnce for CreditCardVisualization {
    fn render(self, _window: &mut Window, cx: &mut gpui::App) -> impl IntoElement {
        let theme = GalleryProvider::theme(cx);
        let colors = theme.card;
        let animator = self.flip.read(cx);
        let flip = animator.flip().clone();
        let timing = animator.timing();

        let content = match flip.displayed() {
            CardSide::Front => render_front(&self.face, &colors),
            CardSide::Back => render_back(&self.face, &colors),
        };

        let height = CARD_WIDTH_PX / CARD_ASPECT;
        let card = div()
            .w(px(CARD_WIDTH_PX))
            .h(px(height))
            .p_3()
            .overflow_hidden()
            .rounded(px(6.0))
            .bg(linear_gradient(
                135.0,
                linear_color_stop(colors.face_start, 0.0),
                linear_color_stop(colors.face_end, 1.0),
            ))
            .text_color(colors.text)
            .font_family("monospace")
            .child(content);

        let frame = div()
            .flex()
            .flex_row()
            .justify_center()
            .items_center()
            .w_full()
            .h(px(height));

        if flip.phase() == FlipPhase::Resting || timing.half().is_zero() {
            return frame.child(card.into_any_element());
        }

        let phase = format!("{:?}-{:?}", flip.ticket(), flip.phase());
        let tilted = card.with_animation(
            self.id.slot(&phase),
            Animation::new(timing.half()),
            move |this, delta| {
                let rotation = flip.rotation_at(delta, timing.easing);
                let skew = rotation.z_deg.to_radians().sin() * CARD_WIDTH_PX;
                this.h(px(height * rotation.height_scale()))
                    .ml(px(skew))
            },
        );
        frame.child(tilted.into_any_element())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_number_is_grouped_in_fours() {
        assert_eq!(format_card_number("4242424242424242"), "4242 4242 4242 4242");
        assert_eq!(format_card_number("424242"), "4242 42  ");
        assert_eq!(format_card_number(""), "   ");
    }

    #[test]
    fn card_number_is_capped_at_nineteen_characters() {
        let formatted = format_card_number("42424242424242421234");
        assert_eq!(formatted, "4242 4242 4242 4242");
        assert_eq!(formatted.chars().count(), 19);
    }

    #[test]
    fn expiry_uses_two_digit_year_and_month() {
        assert_eq!(format_expiry("2031", "7"), "31/7");
        assert_eq!(format_expiry("2031", "123"), "31/12");
        assert_eq!(format_expiry("", ""), "/");
    }

    #[test]
    fn cvc_shows_first_three_characters() {
        assert_eq!(format_cvc("12345"), "123");
        assert_eq!(format_cvc("1"), "1");
    }
}
