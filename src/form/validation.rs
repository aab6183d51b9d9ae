use std::collections::BTreeSet;

use gpui::SharedString;

use super::controller::{
    FieldEvent, FieldKey, FormController, FormError, FormOptions, FormResult, FormState,
    RevalidateMode, ValidationMode, read_lock, write_lock,
};
use super::schema::{RuleFilter, Trigger};

pub trait ValidationError: Clone + Send + Sync + 'static {
    fn message(&self) -> SharedString;
}

/// Typed access to one field of a form model.
///
/// Lenses are small `Copy` values; `exists` lets element lenses report
/// when the index they point at is no longer part of the model.
pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn get_mut<'a>(self, model: &'a mut T) -> &'a mut Self::Value;

    fn set(self, model: &mut T, value: Self::Value) {
        *self.get_mut(model) = value;
    }

    fn exists(self, _model: &T) -> bool {
        true
    }
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;
}

/// Lens into a member of a nested record, keyed `parent.child`.
#[derive(Clone, Copy, Debug)]
pub struct Nested<P, C> {
    parent: P,
    child: C,
}

impl<T, P, C> FieldLens<T> for Nested<P, C>
where
    P: FieldLens<T>,
    C: FieldLens<P::Value>,
{
    type Value = C::Value;

    fn key(self) -> FieldKey {
        self.parent.key().child(self.child.key().as_str())
    }

    fn get<'a>(self, model: &'a T) -> &'a Self::Value {
        self.child.get(self.parent.get(model))
    }

    fn get_mut<'a>(self, model: &'a mut T) -> &'a mut Self::Value {
        self.child.get_mut(self.parent.get_mut(model))
    }

    fn exists(self, model: &T) -> bool {
        self.parent.exists(model) && self.child.exists(self.parent.get(model))
    }
}

/// Lens into a member of one array element, keyed `array[index].field`.
///
/// `get` and `get_mut` index the array directly; callers check `exists` first.
#[derive(Clone, Copy, Debug)]
pub struct Element<A, F> {
    array: A,
    index: usize,
    field: F,
}

impl<A, F> Element<A, F> {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T, A, I, F> FieldLens<T> for Element<A, F>
where
    A: FieldLens<T, Value = Vec<I>>,
    I: Clone + PartialEq + Send + Sync + 'static,
    F: FieldLens<I>,
{
    type Value = F::Value;

    fn key(self) -> FieldKey {
        self.array
            .key()
            .index(self.index)
            .child(self.field.key().as_str())
    }

    fn get<'a>(self, model: &'a T) -> &'a Self::Value {
        self.field.get(&self.array.get(model)[self.index])
    }

    fn get_mut<'a>(self, model: &'a mut T) -> &'a mut Self::Value {
        self.field.get_mut(&mut self.array.get_mut(model)[self.index])
    }

    fn exists(self, model: &T) -> bool {
        self.array.exists(model)
            && self
                .array
                .get(model)
                .get(self.index)
                .is_some_and(|item| self.field.exists(item))
    }
}

pub trait FieldLensExt<T>: FieldLens<T> {
    fn then<C>(self, child: C) -> Nested<Self, C>
    where
        C: FieldLens<Self::Value>,
    {
        Nested {
            parent: self,
            child,
        }
    }

    fn at<I, F>(self, index: usize, field: F) -> Element<Self, F>
    where
        Self: FieldLens<T, Value = Vec<I>>,
        F: FieldLens<I>,
    {
        Element {
            array: self,
            index,
            field,
        }
    }
}

impl<T, L> FieldLensExt<T> for L where L: FieldLens<T> {}

pub trait FieldValidator<T, L, E>: Send + Sync
where
    L: FieldLens<T>,
    E: ValidationError,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E>;
}

impl<T, L, E, F> FieldValidator<T, L, E> for F
where
    L: FieldLens<T>,
    E: ValidationError,
    F: for<'a> Fn(&'a T, &'a L::Value) -> Result<(), E> + Send + Sync,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E> {
        (self)(model, value)
    }
}

pub trait FormValidator<T, E>: Send + Sync
where
    E: ValidationError,
{
    fn validate(&self, model: &T) -> Vec<(FieldKey, E)>;
}

impl<T, E, F> FormValidator<T, E> for F
where
    E: ValidationError,
    F: Fn(&T) -> Vec<(FieldKey, E)> + Send + Sync,
{
    fn validate(&self, model: &T) -> Vec<(FieldKey, E)> {
        (self)(model)
    }
}

/// Which rules an edit of a field runs, given whether that field is already being revalidated.
fn rule_filter(options: FormOptions, revalidating: bool, event: FieldEvent) -> Option<RuleFilter> {
    if revalidating {
        return match (options.revalidate_mode, event) {
            (RevalidateMode::OnChange, _) | (RevalidateMode::OnBlur, FieldEvent::Blur) => {
                Some(RuleFilter::Interactive)
            }
            _ => None,
        };
    }
    match (options.validate_mode, event) {
        (ValidationMode::OnChange, FieldEvent::Change) => Some(RuleFilter::Only(Trigger::Change)),
        (ValidationMode::OnChange, FieldEvent::Blur) => Some(RuleFilter::Only(Trigger::Blur)),
        (ValidationMode::OnBlur, FieldEvent::Blur) => Some(RuleFilter::Interactive),
        _ => None,
    }
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn register_field_validator<L, V>(&self, lens: L, validator: V) -> FormResult<()>
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L, E> + 'static,
    {
        self.register_field_validator_on(lens, Trigger::Change, validator)
    }

    pub fn register_field_validator_on<L, V>(
        &self,
        lens: L,
        trigger: Trigger,
        validator: V,
    ) -> FormResult<()>
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L, E> + 'static,
    {
        let mut schema = write_lock(&self.schema, "registering field validator")?;
        schema.add_field_rule(lens, trigger, validator);
        Ok(())
    }

    pub fn register_scoped_validator<V>(
        &self,
        scope: impl Into<FieldKey>,
        trigger: Trigger,
        validator: V,
    ) -> FormResult<()>
    where
        V: FormValidator<T, E> + 'static,
    {
        let mut schema = write_lock(&self.schema, "registering scoped validator")?;
        schema.add_scoped_rule(scope.into(), trigger, validator);
        Ok(())
    }

    pub fn register_dependency<S, D>(&self, source: S, dependent: D) -> FormResult<()>
    where
        S: FieldLens<T>,
        D: FieldLens<T>,
    {
        let mut schema = write_lock(&self.schema, "registering dependency")?;
        schema.add_dependency(source.key(), dependent.key());
        Ok(())
    }

    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        {
            let mut state = write_lock(&self.state, "writing form model")?;
            if !lens.exists(&state.model) {
                return Err(FormError::MissingField(key));
            }
            lens.set(&mut state.model, value);
            let is_dirty = !lens.exists(&state.initial_model)
                || lens.get(&state.model) != lens.get(&state.initial_model);
            mark_dirty(&mut state, &key, is_dirty);
        }

        self.run_field_event(&key, FieldEvent::Change)
    }

    /// Marks a field as touched, which is what a blur does.
    pub fn touch<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        {
            let mut state = write_lock(&self.state, "touching field")?;
            state.ensure_meta(&key).touched = true;
        }

        self.run_field_event(&key, FieldEvent::Blur)
    }

    /// Runs every rule touching the field, whatever its trigger, and reports whether it is valid.
    pub fn validate_field<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        self.apply_rules(&key, RuleFilter::All)?;
        Ok(read_lock(&self.state, "reading field validation result")?
            .field_meta
            .get(&key)
            .is_none_or(|meta| meta.errors.is_empty()))
    }

    pub fn validate_form(&self) -> FormResult<bool> {
        let model = {
            read_lock(&self.state, "reading model for form validation")?
                .model
                .clone()
        };
        let rules = read_lock(&self.schema, "reading rules for form validation")?.all_rules();
        let outcomes = rules
            .iter()
            .map(|rule| (rule.id, (rule.check)(&model)))
            .collect::<Vec<_>>();

        let mut state = write_lock(&self.state, "applying form validation result")?;
        let mut affected = state.field_meta.keys().cloned().collect::<BTreeSet<_>>();
        affected.extend(rules.iter().map(|rule| rule.scope.clone()));
        for (id, outcome) in outcomes {
            affected.extend(state.replace_outcome(id, outcome));
        }
        for key in &affected {
            state.ensure_meta(key).validated = true;
        }
        state.publish(&affected, self.options.validate_first_error_only);
        Ok(state.is_valid())
    }

    pub(super) fn run_field_event(&self, key: &FieldKey, event: FieldEvent) -> FormResult<()> {
        let revalidating = {
            let state = read_lock(&self.state, "reading field validation phase")?;
            state.submit_count > 0
                || state
                    .field_meta
                    .get(key)
                    .is_some_and(|meta| meta.validated)
        };
        if let Some(filter) = rule_filter(self.options, revalidating, event) {
            self.apply_rules(key, filter)?;
        }
        if self.options.revalidates_dependents_on(event) {
            self.revalidate_dependents(key)?;
        }
        Ok(())
    }

    /// Reruns the matching rules for `key` and republishes every field their results touch.
    ///
    /// Returns `false` when no rule matched, leaving the field unvalidated.
    pub(super) fn apply_rules(&self, key: &FieldKey, filter: RuleFilter) -> FormResult<bool> {
        let rules = read_lock(&self.schema, "reading rules for field validation")?
            .rules_for(key, filter);
        if rules.is_empty() {
            return Ok(false);
        }
        let model = {
            read_lock(&self.state, "reading model for field validation")?
                .model
                .clone()
        };
        let outcomes = rules
            .iter()
            .map(|rule| (rule.id, (rule.check)(&model)))
            .collect::<Vec<_>>();

        let mut state = write_lock(&self.state, "writing field validation result")?;
        let mut affected = BTreeSet::from([key.clone()]);
        for (id, outcome) in outcomes {
            affected.extend(state.replace_outcome(id, outcome));
        }
        state.ensure_meta(key).validated = true;
        state.publish(&affected, self.options.validate_first_error_only);
        Ok(true)
    }

    /// Dependents are only revalidated once the user has interacted with them.
    pub(super) fn revalidate_dependents(&self, source: &FieldKey) -> FormResult<()> {
        let dependents =
            read_lock(&self.schema, "reading field dependencies")?.dependents_of(source);
        for dependent in dependents {
            let active =
                read_lock(&self.state, "reading dependent activity")?.is_active(&dependent);
            if active {
                self.apply_rules(&dependent, RuleFilter::Interactive)?;
            }
        }
        Ok(())
    }

    pub(super) fn known_field_keys(&self) -> FormResult<BTreeSet<FieldKey>> {
        let mut keys = BTreeSet::new();
        keys.extend(
            read_lock(&self.schema, "reading rule scopes")?
                .scopes()
                .cloned(),
        );
        keys.extend(
            read_lock(&self.required_fields, "reading required field keys")?
                .iter()
                .cloned(),
        );
        keys.extend(
            read_lock(&self.state, "reading known keys from field metadata")?
                .field_meta
                .keys()
                .cloned(),
        );
        Ok(keys)
    }
}

pub(super) fn mark_dirty<T, E: Clone>(
    state: &mut FormState<T, E>,
    key: &FieldKey,
    is_dirty: bool,
) {
    if is_dirty {
        state.dirty_fields.insert(key.clone());
    } else {
        state.dirty_fields.remove(key);
    }
    state.ensure_meta(key).dirty = is_dirty;
}
