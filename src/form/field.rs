use gpui::SharedString;

use super::controller::{FieldKey, FieldMeta, FormController, FormResult};
use super::validation::{Element, FieldLens, FieldLensExt, ValidationError};

/// Per-field handle given to render code: current value, meta and the change/blur handlers.
pub struct FieldApi<T, E, L>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
    L: FieldLens<T>,
{
    controller: FormController<T, E>,
    lens: L,
}

impl<T, E, L> Clone for FieldApi<T, E, L>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
    L: FieldLens<T>,
{
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            lens: self.lens,
        }
    }
}

impl<T, E, L> FieldApi<T, E, L>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
    L: FieldLens<T>,
{
    pub fn name(&self) -> FieldKey {
        self.lens.key()
    }

    pub fn lens(&self) -> L {
        self.lens
    }

    pub fn controller(&self) -> &FormController<T, E> {
        &self.controller
    }

    pub fn value(&self) -> FormResult<L::Value> {
        self.controller.value(self.lens)
    }

    pub fn meta(&self) -> FormResult<FieldMeta<E>> {
        Ok(self.controller.field_meta(self.lens)?.unwrap_or_default())
    }

    pub fn errors(&self) -> FormResult<Vec<E>> {
        Ok(self.meta()?.errors)
    }

    pub fn error_messages(&self) -> FormResult<Vec<SharedString>> {
        Ok(self.errors()?.iter().map(ValidationError::message).collect())
    }

    pub fn is_valid(&self) -> FormResult<bool> {
        Ok(self.meta()?.is_valid())
    }

    pub fn should_show_errors(&self) -> FormResult<bool> {
        Ok(self.meta()?.should_show_errors())
    }

    pub fn is_required(&self) -> FormResult<bool> {
        self.controller.is_required(self.lens)
    }

    pub fn handle_change(&self, value: L::Value) -> FormResult<()> {
        self.controller.set(self.lens, value)
    }

    pub fn handle_blur(&self) -> FormResult<()> {
        self.controller.touch(self.lens)
    }
}

/// Handle for an array-valued field and the fields of its elements.
pub struct ArrayFieldApi<T, E, A>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
    A: FieldLens<T>,
{
    field: FieldApi<T, E, A>,
}

impl<T, E, A> Clone for ArrayFieldApi<T, E, A>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
    A: FieldLens<T>,
{
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
        }
    }
}

impl<T, E, A, I> ArrayFieldApi<T, E, A>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
    A: FieldLens<T, Value = Vec<I>>,
    I: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn field(&self) -> &FieldApi<T, E, A> {
        &self.field
    }

    pub fn len(&self) -> FormResult<usize> {
        self.field.controller.array_len(self.field.lens)
    }

    pub fn is_empty(&self) -> FormResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn item<F>(&self, index: usize, member: F) -> FieldApi<T, E, Element<A, F>>
    where
        F: FieldLens<I>,
    {
        self.field
            .controller
            .field(FieldLensExt::<T>::at(self.field.lens, index, member))
    }

    pub fn push_value(&self, item: I) -> FormResult<()> {
        self.field.controller.push_value(self.field.lens, item)
    }

    pub fn insert_value(&self, index: usize, item: I) -> FormResult<()> {
        self.field.controller.insert_value(self.field.lens, index, item)
    }

    pub fn remove_value(&self, index: usize) -> FormResult<I> {
        self.field.controller.remove_value(self.field.lens, index)
    }

    pub fn swap_values(&self, a: usize, b: usize) -> FormResult<()> {
        self.field.controller.swap_values(self.field.lens, a, b)
    }
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn field<L>(&self, lens: L) -> FieldApi<T, E, L>
    where
        L: FieldLens<T>,
    {
        FieldApi {
            controller: self.clone(),
            lens,
        }
    }

    pub fn array_field<A, I>(&self, array: A) -> ArrayFieldApi<T, E, A>
    where
        A: FieldLens<T, Value = Vec<I>>,
    {
        ArrayFieldApi {
            field: self.field(array),
        }
    }
}
