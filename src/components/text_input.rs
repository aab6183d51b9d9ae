use std::rc::Rc;

use gpui::{
    InteractiveElement, IntoElement, KeyDownEvent, MouseButton, ParentElement, RenderOnce,
    SharedString, StatefulInteractiveElement, Styled, Window, div, px,
};

use crate::id::ComponentId;
use crate::provider::GalleryProvider;

use super::control;
use super::input_actions::{
    DeleteBackward, INPUT_KEY_CONTEXT, PasteClipboard, Submit, ensure_text_keybindings,
};

type ChangeHandler = Rc<dyn Fn(SharedString, &mut Window, &mut gpui::App)>;
type FocusHandler = Rc<dyn Fn(&mut Window, &mut gpui::App)>;

/// Single-line controlled input. Edits append at the end of the value.
#[derive(IntoElement)]
pub struct TextInput {
    id: ComponentId,
    value: SharedString,
    placeholder: Option<SharedString>,
    invalid: bool,
    disabled: bool,
    masked: bool,
    max_length: Option<usize>,
    on_change: Option<ChangeHandler>,
    on_focus: Vec<FocusHandler>,
    on_blur: Vec<FocusHandler>,
    on_submit: Option<FocusHandler>,
}

impl TextInput {
    #[track_caller]
    pub fn new() -> Self {
        Self {
            id: ComponentId::default(),
            value: SharedString::default(),
            placeholder: None,
            invalid: false,
            disabled: false,
            masked: false,
            max_length: None,
            on_change: None,
            on_focus: Vec::new(),
            on_blur: Vec::new(),
            on_submit: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn value(mut self, value: impl Into<SharedString>) -> Self {
        self.value = value.into();
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

    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn on_change(
        mut self,
        handler: impl Fn(SharedString, &mut Window, &mut gpui::App) + 'static,
    ) -> Self {
        self.on_change = Some(Rc::new(handler));
        self
    }

    /// Adds a listener for the unfocused to focused edge. Listeners run in insertion order.
    pub fn on_focus(mut self, handler: impl Fn(&mut Window, &mut gpui::App) + 'static) -> Self {
        self.on_focus.push(Rc::new(handler));
        self
    }

    /// Adds a listener for the focused to unfocused edge.
    pub fn on_blur(mut self, handler: impl Fn(&mut Window, &mut gpui::App) + 'static) -> Self {
        self.on_blur.push(Rc::new(handler));
        self
    }

    pub fn on_submit(mut self, handler: impl Fn(&mut Window, &mut gpui::App) + 'static) -> Self {
        self.on_submit = Some(Rc::new(handler));
        self
    }

    fn display_value(&self) -> SharedString {
        if self.masked {
            "•".repeat(self.value.chars().count()).into()
        } else {
            self.value.clone()
        }
    }
}

impl Default for TextInput {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

/// Text a keystroke types into the field, if any.
pub(crate) fn typed_text(event: &KeyDownEvent) -> Option<&str> {
    let modifiers = &event.keystroke.modifiers;
    if modifiers.control || modifiers.platform || modifiers.function {
        return None;
    }
    event
        .keystroke
        .key_char
        .as_deref()
        .filter(|text| !text.is_empty() && text.chars().all(|ch| !ch.is_control()))
}

pub(crate) fn append_text(value: &str, text: &str, max_length: Option<usize>) -> String {
    let sanitized = text.replace(['\r', '\n'], " ");
    let mut next = String::with_capacity(value.len() + sanitized.len());
    next.push_str(value);
    next.push_str(&sanitized);
    match max_length {
        Some(max) => next.chars().take(max).collect(),
        None => next,
    }
}

pub(crate) fn delete_last_char(value: &str) -> String {
    let mut next = value.to_string();
    next.pop();
    next
}

/// What a mouse-down outside the input does.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct OutsidePress {
    /// Window focus still sits on this input and has to be dropped so keystrokes stop arriving.
    pub release_focus: bool,
    pub notify_blur: bool,
}

pub(crate) fn outside_press(id: &str, handle_focused: bool) -> OutsidePress {
    let was_focused = control::lose_focus(id);
    OutsidePress {
        release_focus: handle_focused,
        notify_blur: was_focused || handle_focused,
    }
}

fn emit_change(
    previous: &str,
    next: String,
    on_change: Option<&ChangeHandler>,
    window: &mut Window,
    cx: &mut gpui::App,
) {
    if next == previous {
        return;
    }
    window.refresh();
    if let Some(handler) = on_change {
        (handler)(next.into(), window, cx);
    }
}

impl RenderOnce for TextInput {
    fn render(self, window: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        ensure_text_keybindings(cx);
        let theme = GalleryProvider::theme(cx);
        let colors = theme.semantic;
        let focus_handle = control::focus_handle(&self.id, cx);
        let is_focused =
            focus_handle.is_focused(window) || control::focused_state(&self.id, None, false);

        let border = if self.invalid {
            colors.status_error
        } else if is_focused {
            colors.focus_ring
        } else {
            colors.border_subtle
        };

        let shown = self.display_value();
        let content = if shown.is_empty() {
            div()
                .text_color(colors.text_muted)
                .child(self.placeholder.clone().unwrap_or_default())
        } else {
            div().text_color(colors.text_primary).child(shown)
        };

        let mut input = div()
            .id(self.id.slot("box"))
            .key_context(INPUT_KEY_CONTEXT)
            .track_focus(&focus_handle)
            .flex()
            .flex_row()
            .items_center()
            .w_full()
            .h(px(36.0))
            .px(px(12.0))
            .overflow_hidden()
            .rounded(px(theme.radius_px))
            .border_1()
            .border_color(border)
            .bg(colors.bg_surface)
            .text_sm()
            .child(content);

        if is_focused && !self.disabled {
            input = input.child(div().w(px(1.0)).h(px(16.0)).bg(colors.text_primary));
        }

        if self.disabled {
            return input.cursor_default().opacity(0.55);
        }

        let id_for_focus = self.id.clone();
        let on_focus = self.on_focus.clone();
        let focus_for_mouse = focus_handle.clone();
        let focus_for_blur = focus_handle.clone();
        let id_for_blur = self.id.clone();
        let on_blur = self.on_blur.clone();
        input = input
            .cursor_text()
            .on_mouse_down(MouseButton::Left, move |_, window, cx| {
                window.focus(&focus_for_mouse);
                if control::gain_focus(&id_for_focus) {
                    window.refresh();
                    for handler in &on_focus {
                        (handler)(window, cx);
                    }
                }
            })
            .on_mouse_down_out(move |_, window, cx| {
                let press = outside_press(&id_for_blur, focus_for_blur.is_focused(window));
                if press.release_focus {
                    window.blur();
                }
                if press.notify_blur {
                    window.refresh();
                    for handler in &on_blur {
                        (handler)(window, cx);
                    }
                }
            });

        let max_length = self.max_length;
        input
            .on_key_down({
                let value = self.value.clone();
                let on_change = self.on_change.clone();
                move |event, window, cx| {
                    let Some(text) = typed_text(event) else {
                        return;
                    };
                    let next = append_text(&value, text, max_length);
                    emit_change(&value, next, on_change.as_ref(), window, cx);
                    cx.stop_propagation();
                }
            })
            .on_action({
                let value = self.value.clone();
                let on_change = self.on_change.clone();
                move |_: &DeleteBackward, window, cx| {
                    let next = delete_last_char(&value);
                    emit_change(&value, next, on_change.as_ref(), window, cx);
                }
            })
            .on_action({
                let value = self.value.clone();
                let on_change = self.on_change.clone();
                move |_: &PasteClipboard, window, cx| {
                    let Some(item) = cx.read_from_clipboard() else {
                        return;
                    };
                    let Some(text) = item.text() else {
                        return;
                    };
                    let next = append_text(&value, &text, max_length);
                    emit_change(&value, next, on_change.as_ref(), window, cx);
                }
            })
            .on_action({
                let on_submit = self.on_submit.clone();
                move |_: &Submit, window, cx| {
                    if let Some(handler) = on_submit.as_ref() {
                        (handler)(window, cx);
                    }
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_replaces_line_breaks_and_respects_max_length() {
        assert_eq!(append_text("ab", "c\r\nd", None), "abc  d");
        assert_eq!(append_text("4242", "42424242424242", Some(16)), "4242424242424242");
        assert_eq!(append_text("12", "3", Some(2)), "12");
    }

    #[test]
    fn outside_press_drops_focus_once() {
        assert!(control::gain_focus("text-input-test-a"));
        assert_eq!(
            outside_press("text-input-test-a", true),
            OutsidePress {
                release_focus: true,
                notify_blur: true,
            }
        );
        assert!(!control::focused_state("text-input-test-a", None, true));
        assert_eq!(
            outside_press("text-input-test-a", false),
            OutsidePress {
                release_focus: false,
                notify_blur: false,
            }
        );
    }

    #[test]
    fn delete_removes_whole_characters() {
        assert_eq!(delete_last_char("€5"), "€");
        assert_eq!(delete_last_char("€"), "");
        assert_eq!(delete_last_char(""), "");
    }
}
