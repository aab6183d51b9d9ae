use std::rc::Rc;

use gpui::{
    InteractiveElement, IntoElement, ParentElement, RenderOnce, SharedString,
    StatefulInteractiveElement, Styled, Window, deferred, div, px,
};

use crate::icon::IconName;
use crate::id::ComponentId;
use crate::provider::GalleryProvider;

use super::control;
use super::icon::Icon;

type SelectChangeHandler = Rc<dyn Fn(SharedString, &mut Window, &mut gpui::App)>;
type BlurHandler = Rc<dyn Fn(&mut Window, &mut gpui::App)>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectOption {
    pub value: SharedString,
    pub label: SharedString,
}

impl SelectOption {
    pub fn new(value: impl Into<SharedString>, label: impl Into<SharedString>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Controlled single-choice dropdown. Picking an option reports the change and then a blur.
#[derive(IntoElement)]
pub struct Select {
    id: ComponentId,
    value: Option<SharedString>,
    options: Vec<SelectOption>,
    placeholder: Option<SharedString>,
    invalid: bool,
    disabled: bool,
    on_change: Option<SelectChangeHandler>,
    on_blur: Option<BlurHandler>,
}

impl Select {
    #[track_caller]
    pub fn new() -> Self {
        Self {
            id: ComponentId::default(),
            value: None,
            options: Vec::new(),
            placeholder: None,
            invalid: false,
            disabled: false,
            on_change: None,
            on_blur: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn value(mut self, value: impl Into<SharedString>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn option(mut self, option: SelectOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<SharedString>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_change(
        mut self,
        handler: impl Fn(SharedString, &mut Window, &mut gpui::App) + 'static,
    ) -> Self {
        self.on_change = Some(Rc::new(handler));
        self
    }

    pub fn on_blur(mut self, handler: impl Fn(&mut Window, &mut gpui::App) + 'static) -> Self {
        self.on_blur = Some(Rc::new(handler));
        self
    }

    fn selected_label(&self) -> Option<SharedString> {
        let value = self.value.as_ref()?;
        self.options
            .iter()
            .find(|option| &option.value == value)
            .map(|option| option.label.clone())
    }
}

impl Default for Select {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

impl RenderOnce for Select {
    fn render(self, _window: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        let theme = GalleryProvider::theme(cx);
        let colors = theme.semantic;
        let opened =
            !self.disabled && control::bool_state(&self.id, control::OPEN_SLOT, None, false);

        let border = if self.invalid {
            colors.status_error
        } else if opened {
            colors.focus_ring
        } else {
            colors.border_subtle
        };

        let label = match self.selected_label() {
            Some(label) => div().text_color(colors.text_primary).child(label),
            None => div()
                .text_color(colors.text_muted)
                .child(self.placeholder.clone().unwrap_or_default()),
        };

        let mut trigger = div()
            .id(self.id.slot("trigger"))
            .flex()
            .flex_row()
            .items_center()
            .justify_between()
            .gap_2()
            .w_full()
            .h(px(36.0))
            .px(px(12.0))
            .rounded(px(theme.radius_px))
            .border_1()
            .border_color(border)
            .bg(colors.bg_surface)
            .text_sm()
            .child(label)
            .child(Icon::new(IconName::ChevronDown).size(14.0).color(colors.text_muted));

        if self.disabled {
            trigger = trigger.cursor_default().opacity(0.55);
        } else {
            let id = self.id.clone();
            trigger = trigger.cursor_pointer().on_click(move |_, window, _cx| {
                control::set_bool_state(&id, control::OPEN_SLOT, !opened);
                window.refresh();
            });
        }

        let mut root = div()
            .id(self.id.clone())
            .relative()
            .w_full()
            .child(trigger);

        if !opened {
            return root;
        }

        let id_for_out = self.id.clone();
        let on_blur_out = self.on_blur.clone();
        root = root.on_mouse_down_out(move |_, window, cx| {
            control::set_bool_state(&id_for_out, control::OPEN_SLOT, false);
            window.refresh();
            if let Some(handler) = on_blur_out.as_ref() {
                (handler)(window, cx);
            }
        });

        let mut list = div()
            .id(self.id.slot("dropdown"))
            .occlude()
            .absolute()
            .top(px(40.0))
            .left_0()
            .w_full()
            .py(px(4.0))
            .rounded(px(theme.radius_px))
            .border_1()
            .border_color(colors.border_subtle)
            .bg(colors.bg_surface)
            .shadow_md()
            .text_sm();

        for (index, option) in self.options.iter().enumerate() {
            let selected = self.value.as_ref() == Some(&option.value);
            let id = self.id.clone();
            let value = option.value.clone();
            let on_change = self.on_change.clone();
            let on_blur = self.on_blur.clone();
            let hover_bg = colors.bg_soft;
            let mut row = div()
                .id(self.id.slot_index("option", index))
                .flex()
                .flex_row()
                .items_center()
                .justify_between()
                .px(px(12.0))
                .py(px(6.0))
                .cursor_pointer()
                .text_color(colors.text_primary)
                .hover(move |style| style.bg(hover_bg))
                .child(option.label.clone())
                .on_click(move |_, window, cx| {
                    control::set_bool_state(&id, control::OPEN_SLOT, false);
                    window.refresh();
                    if let Some(handler) = on_change.as_ref() {
                        (handler)(value.clone(), window, cx);
                    }
                    if let Some(handler) = on_blur.as_ref() {
                        (handler)(window, cx);
                    }
                });
            if selected {
                row = row.child(
                    Icon::new(IconName::Check)
                        .size(14.0)
                        .color(colors.text_primary),
                );
            }
            list = list.child(row);
        }

        root.child(deferred(list).with_priority(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_label_follows_value() {
        let select = Select::new()
            .with_id("select-test")
            .options([SelectOption::new("usd", "$"), SelectOption::new("eur", "€")])
            .value("eur");
        assert_eq!(select.selected_label(), Some(SharedString::from("€")));
        assert_eq!(Select::new().value("yen").selected_label(), None);
    }
}
