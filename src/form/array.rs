use std::collections::{BTreeMap, BTreeSet};

use super::controller::{
    FieldEvent, FieldKey, FieldMeta, FormController, FormError, FormResult, FormState, read_lock,
    write_lock,
};
use super::validation::{FieldLens, ValidationError, mark_dirty};

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn array_len<A, I>(&self, array: A) -> FormResult<usize>
    where
        A: FieldLens<T, Value = Vec<I>>,
    {
        Ok(array
            .get(&read_lock(&self.state, "reading array length")?.model)
            .len())
    }

    pub fn push_value<A, I>(&self, array: A, item: I) -> FormResult<()>
    where
        A: FieldLens<T, Value = Vec<I>>,
        I: PartialEq,
    {
        self.mutate_array(
            array,
            |items| {
                items.push(item);
                Ok(())
            },
            Some,
        )
    }

    pub fn insert_value<A, I>(&self, array: A, index: usize, item: I) -> FormResult<()>
    where
        A: FieldLens<T, Value = Vec<I>>,
        I: PartialEq,
    {
        let key = array.key();
        self.mutate_array(
            array,
            |items| {
                if index > items.len() {
                    return Err(FormError::IndexOutOfRange {
                        field: key,
                        index,
                        len: items.len(),
                    });
                }
                items.insert(index, item);
                Ok(())
            },
            |current| Some(if current >= index { current + 1 } else { current }),
        )
    }

    /// Removes one element; later elements move down together with their field state.
    pub fn remove_value<A, I>(&self, array: A, index: usize) -> FormResult<I>
    where
        A: FieldLens<T, Value = Vec<I>>,
        I: PartialEq,
    {
        let key = array.key();
        let mut removed = None;
        self.mutate_array(
            array,
            |items| {
                if index >= items.len() {
                    return Err(FormError::IndexOutOfRange {
                        field: key,
                        index,
                        len: items.len(),
                    });
                }
                removed = Some(items.remove(index));
                Ok(())
            },
            |current| match current.cmp(&index) {
                std::cmp::Ordering::Less => Some(current),
                std::cmp::Ordering::Equal => None,
                std::cmp::Ordering::Greater => Some(current - 1),
            },
        )?;
        removed.ok_or(FormError::IndexOutOfRange {
            field: array.key(),
            index,
            len: 0,
        })
    }

    pub fn swap_values<A, I>(&self, array: A, a: usize, b: usize) -> FormResult<()>
    where
        A: FieldLens<T, Value = Vec<I>>,
        I: PartialEq,
    {
        let key = array.key();
        self.mutate_array(
            array,
            |items| {
                let len = items.len();
                if let Some(index) = [a, b].into_iter().find(|index| *index >= len) {
                    return Err(FormError::IndexOutOfRange {
                        field: key,
                        index,
                        len,
                    });
                }
                items.swap(a, b);
                Ok(())
            },
            |current| {
                Some(if current == a {
                    b
                } else if current == b {
                    a
                } else {
                    current
                })
            },
        )
    }

    /// Applies `mutate` to the array, moves per-element state with `remap` and revalidates.
    ///
    /// `remap` maps an old element index to its new one, or `None` when the element is gone.
    fn mutate_array<A, I>(
        &self,
        array: A,
        mutate: impl FnOnce(&mut Vec<I>) -> FormResult<()>,
        remap: impl Fn(usize) -> Option<usize>,
    ) -> FormResult<()>
    where
        A: FieldLens<T, Value = Vec<I>>,
        I: PartialEq,
    {
        let key = array.key();
        {
            let mut state = write_lock(&self.state, "mutating array field")?;
            if !array.exists(&state.model) {
                return Err(FormError::MissingField(key));
            }
            mutate(array.get_mut(&mut state.model))?;
            reindex_items(&mut state, &key, &remap);
            let is_dirty = !array.exists(&state.initial_model)
                || array.get(&state.model) != array.get(&state.initial_model);
            mark_dirty(&mut state, &key, is_dirty);
            tracing::trace!(field = %key, len = array.get(&state.model).len(), "array field changed");
        }

        self.run_field_event(&key, FieldEvent::Change)
    }
}

fn reindex_items<T, E: Clone>(
    state: &mut FormState<T, E>,
    array: &FieldKey,
    remap: &impl Fn(usize) -> Option<usize>,
) {
    let move_key = |key: &FieldKey| -> Option<Option<FieldKey>> {
        let (index, rest) = key.item_of(array)?;
        Some(remap(index).map(|next| FieldKey::with_item_index(array, next, rest)))
    };

    let field_meta = std::mem::take(&mut state.field_meta);
    state.field_meta = field_meta
        .into_iter()
        .filter_map(|(key, meta)| match move_key(&key) {
            None => Some((key, meta)),
            Some(next) => next.map(|next| (next, meta)),
        })
        .collect::<BTreeMap<FieldKey, FieldMeta<E>>>();

    let dirty_fields = std::mem::take(&mut state.dirty_fields);
    state.dirty_fields = dirty_fields
        .into_iter()
        .filter_map(|key| match move_key(&key) {
            None => Some(key),
            Some(next) => next,
        })
        .collect::<BTreeSet<FieldKey>>();

    for outcome in state.outcomes.values_mut() {
        let errors = std::mem::take(outcome);
        *outcome = errors
            .into_iter()
            .filter_map(|(key, error)| match move_key(&key) {
                None => Some((key, error)),
                Some(next) => next.map(|next| (next, error)),
            })
            .collect();
    }
}
