use std::rc::Rc;

use gpui::{
    InteractiveElement, IntoElement, ParentElement, RenderOnce, SharedString,
    StatefulInteractiveElement, Styled, Window, div, px,
};

use crate::icon::IconName;
use crate::id::ComponentId;
use crate::provider::GalleryProvider;

use super::control;
use super::icon::Icon;

type CheckboxChangeHandler = Rc<dyn Fn(bool, &mut Window, &mut gpui::App)>;

#[derive(IntoElement)]
pub struct Checkbox {
    id: ComponentId,
    label: Option<SharedString>,
    checked: bool,
    disabled: bool,
    on_change: Option<CheckboxChangeHandler>,
}

impl Checkbox {
    #[track_caller]
    pub fn new() -> Self {
        Self {
            id: ComponentId::default(),
            label: None,
            checked: false,
            disabled: false,
            on_change: None,
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

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_change(
        mut self,
        handler: impl Fn(bool, &mut Window, &mut gpui::App) + 'static,
    ) -> Self {
        self.on_change = Some(Rc::new(handler));
        self
    }
}

impl Default for Checkbox {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

impl RenderOnce for Checkbox {
    fn render(self, _window: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        let theme = GalleryProvider::theme(cx);
        let colors = theme.semantic;
        let checked = self.checked;
        let is_focused = control::focused_state(&self.id, None, false);

        let border = if is_focused {
            colors.focus_ring
        } else if checked {
            colors.primary
        } else {
            colors.border_strong
        };
        let bg = if checked { colors.primary } else { colors.bg_surface };

        let mut control_box = div()
            .w(px(16.0))
            .h(px(16.0))
            .flex()
            .items_center()
            .justify_center()
            .rounded(px(4.0))
            .border_1()
            .border_color(border)
            .bg(bg);
        if checked {
            control_box = control_box.child(
                Icon::new(IconName::Check)
                    .size(12.0)
                    .color(colors.on_primary),
            );
        }

        let mut row = div()
            .id(self.id.clone())
            .flex()
            .flex_row()
            .items_center()
            .gap_2()
            .child(control_box)
            .children(
                self.label
                    .map(|label| div().text_sm().text_color(colors.text_primary).child(label)),
            );

        if self.disabled {
            return row.cursor_default().opacity(0.55);
        }

        row = row.cursor_pointer();
        let id_for_blur = self.id.clone();
        row = row.on_mouse_down_out(move |_, window, _cx| {
            if control::lose_focus(&id_for_blur) {
                window.refresh();
            }
        });

        if let Some(handler) = self.on_change {
            let id = self.id.clone();
            let handler_for_key = handler.clone();
            let id_for_key = self.id.clone();
            row = row
                .on_click(move |_, window, cx| {
                    control::set_focused_state(&id, true);
                    window.refresh();
                    (handler)(!checked, window, cx);
                })
                .on_key_down(move |event, window, cx| {
                    if control::is_activation_key(event.keystroke.key.as_str()) {
                        control::set_focused_state(&id_for_key, true);
                        window.refresh();
                        (handler_for_key)(!checked, window, cx);
                    }
                });
        }
        row
    }
}
