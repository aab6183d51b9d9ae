use gpui::SharedString;

use super::controller::{FieldKey, FormController, FormResult, read_lock};
use super::validation::{FieldLens, ValidationError};
use crate::components::{Checkbox, Select, TextInput};

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    /// Messages to render under a field: all of its errors once it is touched, otherwise none.
    pub fn display_errors<L>(&self, lens: L) -> FormResult<Vec<SharedString>>
    where
        L: FieldLens<T>,
    {
        self.display_error_messages(&lens.key())
    }

    /// Wires a text input to a string field: value, invalid styling, change and blur.
    pub fn bind_text_input<L>(&self, lens: L, input: TextInput) -> FormResult<TextInput>
    where
        L: FieldLens<T, Value = SharedString>,
    {
        let key = lens.key();
        let value = self.value(lens)?;
        let invalid = self.is_field_invalid(&key)?;
        let controller = self.clone();
        let blur_controller = self.clone();
        let blur_key = key.clone();
        Ok(input
            .value(value)
            .invalid(invalid)
            .on_change(move |next, window, _cx| {
                if let Err(error) = controller.set(lens, next) {
                    tracing::warn!(%error, field = %key, "failed to apply field change");
                }
                window.refresh();
            })
            .on_blur(move |window, _cx| {
                if let Err(error) = blur_controller.touch(lens) {
                    tracing::warn!(%error, field = %blur_key, "failed to mark field touched");
                }
                window.refresh();
            }))
    }

    pub fn bind_select<L>(&self, lens: L, select: Select) -> FormResult<Select>
    where
        L: FieldLens<T, Value = SharedString>,
    {
        let key = lens.key();
        let value = self.value(lens)?;
        let invalid = self.is_field_invalid(&key)?;
        let controller = self.clone();
        let blur_controller = self.clone();
        let blur_key = key.clone();
        Ok(select
            .value(value)
            .invalid(invalid)
            .on_change(move |next, window, _cx| {
                if let Err(error) = controller.set(lens, next) {
                    tracing::warn!(%error, field = %key, "failed to apply selection");
                }
                window.refresh();
            })
            .on_blur(move |window, _cx| {
                if let Err(error) = blur_controller.touch(lens) {
                    tracing::warn!(%error, field = %blur_key, "failed to mark field touched");
                }
                window.refresh();
            }))
    }

    /// Checkbox changes count as a change and a blur, since there is no text focus to leave.
    pub fn bind_checkbox<L>(&self, lens: L, checkbox: Checkbox) -> FormResult<Checkbox>
    where
        L: FieldLens<T, Value = bool>,
    {
        let key = lens.key();
        let checked = self.value(lens)?;
        let controller = self.clone();
        Ok(checkbox
            .checked(checked)
            .on_change(move |next, window, _cx| {
                let result = controller
                    .set(lens, next)
                    .and_then(|()| controller.touch(lens));
                if let Err(error) = result {
                    tracing::warn!(%error, field = %key, "failed to toggle field");
                }
                window.refresh();
            }))
    }

    fn is_field_invalid(&self, key: &FieldKey) -> FormResult<bool> {
        let state = read_lock(&self.state, "reading field validity for binding")?;
        Ok(state
            .field_meta
            .get(key)
            .is_some_and(|meta| meta.should_show_errors()))
    }

    fn display_error_messages(&self, key: &FieldKey) -> FormResult<Vec<SharedString>> {
        let state = read_lock(&self.state, "reading display error messages")?;
        let Some(meta) = state.field_meta.get(key) else {
            return Ok(Vec::new());
        };
        if !meta.should_show_errors() {
            return Ok(Vec::new());
        }
        Ok(meta.errors.iter().map(ValidationError::message).collect())
    }
}
