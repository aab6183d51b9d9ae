use gpui::{
    AnyElement, IntoElement, ParentElement, RenderOnce, SharedString, Styled, Window, div, px,
};

use crate::form::{FieldApi, FieldKey, FieldLens, ValidationError};
use crate::id::ComponentId;
use crate::provider::GalleryProvider;

use super::checkbox::Checkbox;
use super::select::{Select, SelectOption};
use super::text_input::TextInput;

#[derive(IntoElement)]
pub struct Label {
    text: SharedString,
    required: bool,
}

impl Label {
    pub fn new(text: impl Into<SharedString>) -> Self {
        Self {
            text: text.into(),
            required: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

impl RenderOnce for Label {
    fn render(self, _window: &mut Window, cx: &mut gpui::App) -> impl IntoElement {
        let colors = GalleryProvider::theme(cx).semantic;
        div()
            .flex()
            .flex_row()
            .gap_1()
            .text_sm()
            .font_weight(gpui::FontWeight::MEDIUM)
            .text_color(colors.text_primary)
            .child(self.text)
            .children(
                self.required
                    .then(|| div().text_color(colors.status_error).child("*")),
            )
    }
}

/// Error lines under a field. Keeps one line of height while hidden so the layout does not jump.
#[derive(IntoElement)]
pub struct FieldErrors {
    messages: Vec<SharedString>,
}

impl FieldErrors {
    pub fn new(messages: impl IntoIterator<Item = SharedString>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
        }
    }

    pub fn for_field<T, E, L>(field: &FieldApi<T, E, L>) -> Self
    where
        T: Clone + Send + Sync + 'static,
        E: ValidationError,
        L: FieldLens<T>,
    {
        let messages = field
            .controller()
            .display_errors(field.lens())
            .unwrap_or_else(|error| {
                tracing::warn!(%error, field = %field.name(), "failed to read field errors");
                Vec::new()
            });
        Self::new(messages)
    }

    pub fn is_visible(&self) -> bool {
        !self.messages.is_empty()
    }
}

impl RenderOnce for FieldErrors {
    fn render(self, _window: &mut Window, cx: &mut gpui::App) -> impl IntoElement {
        let colors = GalleryProvider::theme(cx).semantic;
        let line = div()
            .min_h(px(20.0))
            .text_sm()
            .italic()
            .text_color(colors.status_error);
        if self.messages.is_empty() {
            return line.child(div().invisible().child("\u{00a0}"));
        }
        line.children(self.messages.into_iter().map(|message| div().child(message)))
    }
}

/// Control id of a field, scoped to its form instance.
fn field_id<T, E, L>(field: &FieldApi<T, E, L>) -> ComponentId
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
    L: FieldLens<T>,
{
    ComponentId::form_scope(field.controller().form_id()).field(&field.name())
}

/// What a field helper needs from a binding, read once at construction.
struct FieldChrome {
    id: ComponentId,
    key: FieldKey,
    label: SharedString,
    required: bool,
    errors: FieldErrors,
}

impl FieldChrome {
    fn read<T, E, L>(field: &FieldApi<T, E, L>) -> Self
    where
        T: Clone + Send + Sync + 'static,
        E: ValidationError,
        L: FieldLens<T>,
    {
        let key = field.name();
        let required = field.is_required().unwrap_or_else(|error| {
            tracing::warn!(%error, field = %key, "failed to read required flag");
            false
        });
        Self {
            id: field_id(field),
            label: key.label(),
            required,
            errors: FieldErrors::for_field(field),
            key,
        }
    }

    fn render(self, control: AnyElement, hide_label: bool) -> impl IntoElement {
        div()
            .flex()
            .flex_col()
            .gap_2()
            .w_full()
            .children((!hide_label).then(|| Label::new(self.label).required(self.required)))
            .child(control)
            .child(self.errors)
    }
}

/// Label, text input and errors for a string field.
#[derive(IntoElement)]
pub struct FieldInput {
    chrome: FieldChrome,
    input: TextInput,
    hide_label: bool,
}

impl FieldInput {
    pub fn new<T, E, L>(field: &FieldApi<T, E, L>) -> Self
    where
        T: Clone + Send + Sync + 'static,
        E: ValidationError,
        L: FieldLens<T, Value = SharedString>,
    {
        let chrome = FieldChrome::read(field);
        let input = TextInput::new().with_id(chrome.id.clone());
        let input = match field.controller().bind_text_input(field.lens(), input) {
            Ok(bound) => bound,
            Err(error) => {
                tracing::warn!(%error, field = %chrome.key, "failed to bind text input");
                TextInput::new().with_id(chrome.id.clone()).disabled(true)
            }
        };
        Self {
            chrome,
            input,
            hide_label: false,
        }
    }

    pub fn hide_label(mut self, hide_label: bool) -> Self {
        self.hide_label = hide_label;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<SharedString>) -> Self {
        self.input = self.input.placeholder(placeholder);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.input = self.input.disabled(disabled);
        self
    }

    pub fn masked(mut self, masked: bool) -> Self {
        self.input = self.input.masked(masked);
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.input = self.input.max_length(max_length);
        self
    }

    pub fn on_focus(mut self, handler: impl Fn(&mut Window, &mut gpui::App) + 'static) -> Self {
        self.input = self.input.on_focus(handler);
        self
    }

    /// Runs after the field has been marked touched.
    pub fn on_blur(mut self, handler: impl Fn(&mut Window, &mut gpui::App) + 'static) -> Self {
        self.input = self.input.on_blur(handler);
        self
    }

    pub fn on_submit(mut self, handler: impl Fn(&mut Window, &mut gpui::App) + 'static) -> Self {
        self.input = self.input.on_submit(handler);
        self
    }
}

impl RenderOnce for FieldInput {
    fn render(self, _window: &mut Window, _cx: &mut gpui::App) -> impl IntoElement {
        self.chrome
            .render(self.input.into_any_element(), self.hide_label)
    }
}

/// Label, dropdown and errors for a field holding one of a fixed set of values.
#[derive(IntoElement)]
pub struct FieldSelect {
    chrome: FieldChrome,
    select: Select,
}

impl FieldSelect {
    pub fn new<T, E, L>(
        field: &FieldApi<T, E, L>,
        items: impl IntoIterator<Item = SelectOption>,
    ) -> Self
    where
        T: Clone + Send + Sync + 'static,
        E: ValidationError,
        L: FieldLens<T, Value = SharedString>,
    {
        let chrome = FieldChrome::read(field);
        let select = Select::new().with_id(chrome.id.clone()).options(items);
        let select = match field.controller().bind_select(field.lens(), select) {
            Ok(bound) => bound,
            Err(error) => {
                tracing::warn!(%error, field = %chrome.key, "failed to bind select");
                Select::new().with_id(chrome.id.clone()).disabled(true)
            }
        };
        Self { chrome, select }
    }

    pub fn placeholder(mut self, placeholder: impl Into<SharedString>) -> Self {
        self.select = self.select.placeholder(placeholder);
        self
    }
}

impl RenderOnce for FieldSelect {
    fn render(self, _window: &mut Window, _cx: &mut gpui::App) -> impl IntoElement {
        self.chrome.render(self.select.into_any_element(), false)
    }
}

/// Bare checkbox bound to a boolean field.
#[derive(IntoElement)]
pub struct FieldCheckbox {
    checkbox: Checkbox,
}

impl FieldCheckbox {
    pub fn new<T, E, L>(field: &FieldApi<T, E, L>) -> Self
    where
        T: Clone + Send + Sync + 'static,
        E: ValidationError,
        L: FieldLens<T, Value = bool>,
    {
        let key = field.name();
        let id = field_id(field);
        let checkbox = Checkbox::new().with_id(id.clone());
        let checkbox = match field.controller().bind_checkbox(field.lens(), checkbox) {
            Ok(bound) => bound,
            Err(error) => {
                tracing::warn!(%error, field = %key, "failed to bind checkbox");
                Checkbox::new().with_id(id).disabled(true)
            }
        };
        Self { checkbox }
    }

    pub fn label(mut self, label: impl Into<SharedString>) -> Self {
        self.checkbox = self.checkbox.label(label);
        self
    }
}

impl RenderOnce for FieldCheckbox {
    fn render(self, _window: &mut Window, _cx: &mut gpui::App) -> impl IntoElement {
        self.checkbox
    }
}
