use std::rc::Rc;

use gpui::{
    ClickEvent, InteractiveElement, IntoElement, ParentElement, RenderOnce, SharedString,
    StatefulInteractiveElement, Styled, Window, div, px,
};

use crate::icon::IconName;
use crate::id::ComponentId;
use crate::provider::GalleryProvider;

use super::control;
use super::icon::Icon;

pub(crate) type PressHandler = Rc<dyn Fn(&ClickEvent, &mut Window, &mut gpui::App)>;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ButtonVariant {
    #[default]
    Filled,
    Outline,
    Subtle,
}

#[derive(IntoElement)]
pub struct Button {
    id: ComponentId,
    label: Option<SharedString>,
    left_icon: Option<IconName>,
    variant: ButtonVariant,
    disabled: bool,
    full_width: bool,
    on_click: Option<PressHandler>,
}

impl Button {
    #[track_caller]
    pub fn new(label: impl Into<SharedString>) -> Self {
        Self::without_label().label(label)
    }

    #[track_caller]
    pub fn without_label() -> Self {
        Self {
            id: ComponentId::default(),
            label: None,
            left_icon: None,
            variant: ButtonVariant::Filled,
            disabled: false,
            full_width: false,
            on_click: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn label(mut self, label: impl Into<SharedString>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn left_icon(mut self, icon: IconName) -> Self {
        self.left_icon = Some(icon);
        self
    }

    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn full_width(mut self, full_width: bool) -> Self {
        self.full_width = full_width;
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

impl RenderOnce for Button {
    fn render(self, _window: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        let theme = GalleryProvider::theme(cx);
        let colors = theme.semantic;
        let (bg, hover_bg, fg, border) = match self.variant {
            ButtonVariant::Filled => (
                colors.primary,
                colors.primary_hover,
                colors.on_primary,
                colors.primary,
            ),
            ButtonVariant::Outline => (
                colors.bg_surface,
                colors.bg_soft,
                colors.text_primary,
                colors.border_strong,
            ),
            ButtonVariant::Subtle => (
                gpui::transparent_black(),
                colors.bg_soft,
                colors.text_primary,
                gpui::transparent_black(),
            ),
        };

        let mut root = div()
            .id(self.id.clone())
            .flex()
            .flex_row()
            .items_center()
            .justify_center()
            .gap_2()
            .h(px(36.0))
            .px(px(14.0))
            .rounded(px(theme.radius_px))
            .border_1()
            .border_color(border)
            .bg(bg)
            .text_color(fg)
            .text_sm();
        if self.full_width {
            root = root.w_full();
        }

        if self.disabled {
            root = root.cursor_default().opacity(0.55);
        } else if let Some(handler) = self.on_click.clone() {
            let id = self.id.clone();
            root = root
                .cursor_pointer()
                .hover(move |style| style.bg(hover_bg))
                .on_click(move |event, window, cx| {
                    control::set_focused_state(&id, true);
                    (handler)(event, window, cx);
                });
        } else {
            root = root.cursor_default();
        }

        if let Some(icon) = self.left_icon {
            root = root.child(Icon::new(icon).size(16.0).color(fg));
        }
        if let Some(label) = self.label {
            root = root.child(div().font_weight(gpui::FontWeight::MEDIUM).child(label));
        }
        root
    }
}
