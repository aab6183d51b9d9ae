use gpui::{
    AnyElement, InteractiveElement, IntoElement, ParentElement, RenderOnce, Styled, div, px,
};

use crate::id::ComponentId;
use crate::provider::GalleryProvider;

pub const FORM_MAX_WIDTH_PX: f32 = 600.0;
pub const FORM_PADDING_PX: f32 = 24.0;

/// Bordered card that centers a form and caps its width.
#[derive(IntoElement)]
pub struct FormContainer {
    id: ComponentId,
    with_shadow: bool,
    children: Vec<AnyElement>,
}

impl FormContainer {
    #[track_caller]
    pub fn new() -> Self {
        Self {
            id: ComponentId::default(),
            with_shadow: true,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_shadow(mut self, value: bool) -> Self {
        self.with_shadow = value;
        self
    }
}

impl Default for FormContainer {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

impl ParentElement for FormContainer {
    fn extend(&mut self, elements: impl IntoIterator<Item = AnyElement>) {
        self.children.extend(elements);
    }
}

impl RenderOnce for FormContainer {
    fn render(self, _window: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        let theme = GalleryProvider::theme(cx);
        let colors = theme.semantic;
        let mut card = div()
            .id(self.id)
            .flex()
            .flex_col()
            .gap_4()
            .w_full()
            .max_w(px(FORM_MAX_WIDTH_PX))
            .p(px(FORM_PADDING_PX))
            .bg(colors.bg_surface)
            .text_color(colors.text_primary)
            .rounded(px(theme.radius_px * 1.5))
            .border_1()
            .border_color(colors.border_subtle);
        if self.with_shadow {
            card = card.shadow_sm();
        }

        div()
            .flex()
            .flex_row()
            .justify_center()
            .w_full()
            .child(card.children(self.children))
    }
}
