use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use gpui::SharedString;

use super::schema::{RuleId, Schema};
use super::validation::{FieldLens, ValidationError};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

/// Path of a field inside a form model.
///
/// Nested members are joined with `.` and array elements use `[index]`,
/// so the count of the second grocery item is `groceries[1].count`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(Arc<str>);

impl FieldKey {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(Arc::from(value.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn child(&self, name: &str) -> Self {
        Self::new(format!("{}.{name}", self.0))
    }

    pub fn index(&self, index: usize) -> Self {
        Self::new(format!("{}[{index}]", self.0))
    }

    /// True when `self` is `scope` or lives underneath it.
    pub fn is_within(&self, scope: &FieldKey) -> bool {
        match self.as_str().strip_prefix(scope.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with('.') || rest.starts_with('['),
            None => false,
        }
    }

    /// Last path segment with its first letter capitalized, e.g. `Count`.
    pub fn label(&self) -> SharedString {
        let last = self
            .as_str()
            .rsplit('.')
            .find_map(|segment| segment.split('[').next().filter(|name| !name.is_empty()))
            .unwrap_or_default();
        let mut chars = last.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>().into(),
            None => SharedString::default(),
        }
    }

    /// Splits `array[index]rest` into `(index, rest)` relative to `array`.
    pub(super) fn item_of(&self, array: &FieldKey) -> Option<(usize, &str)> {
        let rest = self.as_str().strip_prefix(array.as_str())?.strip_prefix('[')?;
        let (digits, rest) = rest.split_once(']')?;
        Some((digits.parse().ok()?, rest))
    }

    pub(super) fn with_item_index(array: &FieldKey, index: usize, rest: &str) -> Self {
        Self::new(format!("{array}[{index}]{rest}"))
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// When a field is validated before it has ever been validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationMode {
    OnChange,
    OnBlur,
    OnSubmit,
}

/// When a field is validated again once it has been validated or a submit was attempted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RevalidateMode {
    OnChange,
    OnBlur,
    OnSubmit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum FieldEvent {
    Change,
    Blur,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormOptions {
    pub validate_mode: ValidationMode,
    pub revalidate_mode: RevalidateMode,
    pub validate_first_error_only: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_mode: ValidationMode::OnSubmit,
            revalidate_mode: RevalidateMode::OnChange,
            validate_first_error_only: false,
        }
    }
}

impl FormOptions {
    pub fn on_change() -> Self {
        Self {
            validate_mode: ValidationMode::OnChange,
            revalidate_mode: RevalidateMode::OnChange,
            validate_first_error_only: false,
        }
    }

    pub(super) fn revalidates_dependents_on(&self, event: FieldEvent) -> bool {
        matches!(
            (self.revalidate_mode, event),
            (RevalidateMode::OnChange, FieldEvent::Change)
                | (RevalidateMode::OnBlur, FieldEvent::Blur)
        )
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldMeta<E> {
    pub dirty: bool,
    pub touched: bool,
    pub validated: bool,
    pub errors: Vec<E>,
}

impl<E> Default for FieldMeta<E> {
    fn default() -> Self {
        Self {
            dirty: false,
            touched: false,
            validated: false,
            errors: Vec::new(),
        }
    }
}

impl<E> FieldMeta<E> {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn should_show_errors(&self) -> bool {
        self.touched && !self.errors.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct FormSnapshot<T, E> {
    pub model: T,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub is_dirty: bool,
    pub is_valid: bool,
    pub can_submit: bool,
    pub first_error: Option<FieldKey>,
    pub field_meta: BTreeMap<FieldKey, FieldMeta<E>>,
}

impl<T, E> FormSnapshot<T, E> {
    pub fn errors(&self, key: &FieldKey) -> &[E] {
        self.field_meta
            .get(key)
            .map(|meta| meta.errors.as_slice())
            .unwrap_or_default()
    }

    /// Every key that currently carries at least one error.
    pub fn invalid_fields(&self) -> impl Iterator<Item = &FieldKey> {
        self.field_meta
            .iter()
            .filter_map(|(key, meta)| (!meta.errors.is_empty()).then_some(key))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    StatePoisoned(&'static str),
    InvalidStateTransition { from: SubmitState, to: SubmitState },
    AlreadySubmitting,
    MissingField(FieldKey),
    IndexOutOfRange { field: FieldKey, index: usize, len: usize },
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::StatePoisoned(context) => {
                write!(f, "form state lock poisoned while {context}")
            }
            FormError::InvalidStateTransition { from, to } => {
                write!(f, "invalid submit state transition: {from:?} -> {to:?}")
            }
            FormError::AlreadySubmitting => f.write_str("form submit is already in progress"),
            FormError::MissingField(key) => write!(f, "field `{key}` does not exist in the model"),
            FormError::IndexOutOfRange { field, index, len } => {
                write!(f, "index {index} is out of range for `{field}` (len {len})")
            }
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

pub(super) type InvalidSubmitHandler<T, E> = Arc<dyn Fn(&FormSnapshot<T, E>) + Send + Sync>;

pub(super) struct FormState<T, E> {
    pub(super) initial_model: T,
    pub(super) model: T,
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
    pub(super) dirty_fields: BTreeSet<FieldKey>,
    pub(super) field_meta: BTreeMap<FieldKey, FieldMeta<E>>,
    pub(super) outcomes: BTreeMap<RuleId, Vec<(FieldKey, E)>>,
    pub(super) first_error: Option<FieldKey>,
}

impl<T, E: Clone> FormState<T, E> {
    pub(super) fn ensure_meta(&mut self, key: &FieldKey) -> &mut FieldMeta<E> {
        self.field_meta.entry(key.clone()).or_default()
    }

    pub(super) fn is_active(&self, key: &FieldKey) -> bool {
        self.submit_count > 0
            || self
                .field_meta
                .get(key)
                .is_some_and(|meta| meta.touched || meta.validated)
    }

    /// Stores the latest result of one rule and returns every key whose errors may have moved.
    pub(super) fn replace_outcome(
        &mut self,
        rule: RuleId,
        outcome: Vec<(FieldKey, E)>,
    ) -> BTreeSet<FieldKey> {
        let mut affected = outcome
            .iter()
            .map(|(key, _)| key.clone())
            .collect::<BTreeSet<_>>();
        if let Some(previous) = self.outcomes.insert(rule, outcome) {
            affected.extend(previous.into_iter().map(|(key, _)| key));
        }
        affected
    }

    /// Recomputes the published errors of `keys` from the stored rule outcomes.
    pub(super) fn publish<'a>(
        &mut self,
        keys: impl IntoIterator<Item = &'a FieldKey>,
        first_error_only: bool,
    ) {
        for key in keys {
            let mut errors = self
                .outcomes
                .values()
                .flatten()
                .filter(|(owner, _)| owner == key)
                .map(|(_, error)| error.clone())
                .collect::<Vec<_>>();
            if first_error_only {
                errors.truncate(1);
            }
            if errors.is_empty() && !self.field_meta.contains_key(key) {
                continue;
            }
            self.ensure_meta(key).errors = errors;
        }
        self.first_error = first_error_key(&self.field_meta);
    }

    pub(super) fn is_valid(&self) -> bool {
        self.field_meta.values().all(|meta| meta.errors.is_empty())
    }
}

#[derive(Clone)]
pub struct FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub(super) id: FormId,
    pub(super) options: FormOptions,
    pub(super) state: Arc<RwLock<FormState<T, E>>>,
    pub(super) schema: Arc<RwLock<Schema<T, E>>>,
    pub(super) invalid_handler: Arc<RwLock<Option<InvalidSubmitHandler<T, E>>>>,
    pub(super) required_fields: Arc<RwLock<BTreeSet<FieldKey>>>,
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn new(initial: T, options: FormOptions) -> Self {
        Self::with_schema(initial, options, Schema::new())
    }

    pub fn with_schema(initial: T, options: FormOptions, schema: Schema<T, E>) -> Self {
        Self {
            id: FormId::next(),
            options,
            state: Arc::new(RwLock::new(FormState {
                initial_model: initial.clone(),
                model: initial,
                submit_state: SubmitState::Idle,
                submit_count: 0,
                dirty_fields: BTreeSet::new(),
                field_meta: BTreeMap::new(),
                outcomes: BTreeMap::new(),
                first_error: None,
            })),
            schema: Arc::new(RwLock::new(schema)),
            invalid_handler: Arc::new(RwLock::new(None)),
            required_fields: Arc::new(RwLock::new(BTreeSet::new())),
        }
    }

    /// Unique per controller; clones share it.
    pub fn form_id(&self) -> FormId {
        self.id
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    /// Marks a field as required in its label. Required fields are also touched on submit.
    pub fn register_required_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let mut required = write_lock(&self.required_fields, "registering required field")?;
        required.insert(lens.key());
        Ok(())
    }

    /// Replaces the handler run when a submit attempt fails validation.
    pub fn on_submit_invalid(
        &self,
        handler: impl Fn(&FormSnapshot<T, E>) + Send + Sync + 'static,
    ) -> FormResult<()> {
        *write_lock(&self.invalid_handler, "registering invalid submit handler")? =
            Some(Arc::new(handler));
        Ok(())
    }

    pub fn submit(&self, f: impl FnOnce(&T) -> FormResult<()>) -> FormResult<()> {
        if !self.begin_submit()? {
            return Ok(());
        }

        let model = {
            let mut state = write_lock(&self.state, "moving submit state to submitting")?;
            transition_submit_state(&mut state, SubmitState::Submitting)?;
            state.model.clone()
        };
        let submit_result = f(&model);
        self.finish_submit(submit_result)
    }

    pub async fn submit_async<F, Fut>(&self, f: F) -> FormResult<()>
    where
        F: FnOnce(&T) -> Fut,
        Fut: Future<Output = FormResult<()>>,
    {
        if !self.begin_submit()? {
            return Ok(());
        }

        let model = {
            let mut state = write_lock(&self.state, "moving async submit state to submitting")?;
            transition_submit_state(&mut state, SubmitState::Submitting)?;
            state.model.clone()
        };
        let submit_result = f(&model).await;
        self.finish_submit(submit_result)
    }

    /// Counts the attempt, touches every known field and validates the whole form.
    ///
    /// Returns `false` after running the invalid handler when the form has errors.
    fn begin_submit(&self) -> FormResult<bool> {
        {
            let mut state = write_lock(&self.state, "preparing submit")?;
            if state.submit_state == SubmitState::Submitting {
                return Err(FormError::AlreadySubmitting);
            }
            transition_submit_state(&mut state, SubmitState::Validating)?;
            state.submit_count = state.submit_count.saturating_add(1);
        }

        let is_valid = self.validate_form()?;
        self.touch_all()?;
        if is_valid {
            return Ok(true);
        }

        {
            let mut state = write_lock(&self.state, "handling submit validation failure")?;
            transition_submit_state(&mut state, SubmitState::Failed)?;
        }
        let snapshot = self.snapshot()?;
        let handler = read_lock(&self.invalid_handler, "reading invalid submit handler")?.clone();
        match handler {
            Some(handler) => handler(&snapshot),
            None => tracing::debug!(
                submit_count = snapshot.submit_count,
                invalid = ?snapshot.invalid_fields().map(FieldKey::as_str).collect::<Vec<_>>(),
                "submit rejected by validation"
            ),
        }
        Ok(false)
    }

    fn finish_submit(&self, submit_result: FormResult<()>) -> FormResult<()> {
        let mut state = write_lock(&self.state, "completing submit")?;
        if submit_result.is_ok() {
            transition_submit_state(&mut state, SubmitState::Succeeded)?;
        } else {
            transition_submit_state(&mut state, SubmitState::Failed)?;
        }
        submit_result
    }

    fn touch_all(&self) -> FormResult<()> {
        let keys = self.known_field_keys()?;
        let mut state = write_lock(&self.state, "touching all fields")?;
        for key in &keys {
            state.ensure_meta(key);
        }
        for meta in state.field_meta.values_mut() {
            meta.touched = true;
        }
        Ok(())
    }

    pub fn reset_to_initial(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "resetting form")?;
        state.model = state.initial_model.clone();
        state.submit_state = SubmitState::Idle;
        state.submit_count = 0;
        state.dirty_fields.clear();
        state.outcomes.clear();
        state.first_error = None;
        state.field_meta.clear();
        Ok(())
    }

    pub fn reset_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let mut state = write_lock(&self.state, "resetting field")?;
        if !lens.exists(&state.initial_model) || !lens.exists(&state.model) {
            return Err(FormError::MissingField(key));
        }
        let initial_value = lens.get(&state.initial_model).clone();
        lens.set(&mut state.model, initial_value);
        state.dirty_fields.remove(&key);
        for outcome in state.outcomes.values_mut() {
            outcome.retain(|(owner, _)| owner != &key);
        }
        *state.ensure_meta(&key) = FieldMeta::default();
        state.first_error = first_error_key(&state.field_meta);
        Ok(())
    }

    pub fn clear_errors(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "clearing all field errors")?;
        state.outcomes.clear();
        for meta in state.field_meta.values_mut() {
            meta.errors.clear();
        }
        state.first_error = None;
        Ok(())
    }

    pub fn clear_field_errors<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let mut state = write_lock(&self.state, "clearing field errors")?;
        for outcome in state.outcomes.values_mut() {
            outcome.retain(|(owner, _)| owner != &key);
        }
        if let Some(meta) = state.field_meta.get_mut(&key) {
            meta.errors.clear();
        }
        state.first_error = first_error_key(&state.field_meta);
        Ok(())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<T, E>> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        let is_valid = state.is_valid();
        Ok(FormSnapshot {
            model: state.model.clone(),
            submit_state: state.submit_state,
            submit_count: state.submit_count,
            is_dirty: !state.dirty_fields.is_empty(),
            is_valid,
            can_submit: can_submit(state.submit_state, is_valid, state.submit_count),
            first_error: state.first_error.clone(),
            field_meta: state.field_meta.clone(),
        })
    }

    /// A submit is offered unless one is running or an attempted submit left errors behind.
    pub fn can_submit(&self) -> FormResult<bool> {
        let state = read_lock(&self.state, "reading submit availability")?;
        Ok(can_submit(
            state.submit_state,
            state.is_valid(),
            state.submit_count,
        ))
    }

    pub fn value<L>(&self, lens: L) -> FormResult<L::Value>
    where
        L: FieldLens<T>,
    {
        let state = read_lock(&self.state, "reading field value")?;
        if !lens.exists(&state.model) {
            return Err(FormError::MissingField(lens.key()));
        }
        Ok(lens.get(&state.model).clone())
    }

    pub fn field_meta<L>(&self, lens: L) -> FormResult<Option<FieldMeta<E>>>
    where
        L: FieldLens<T>,
    {
        Ok(read_lock(&self.state, "reading field meta")?
            .field_meta
            .get(&lens.key())
            .cloned())
    }

    pub fn is_required<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
    {
        Ok(read_lock(&self.required_fields, "reading required fields")?.contains(&lens.key()))
    }
}

fn can_submit(submit_state: SubmitState, is_valid: bool, submit_count: u32) -> bool {
    let busy = matches!(
        submit_state,
        SubmitState::Validating | SubmitState::Submitting
    );
    !busy && (is_valid || submit_count == 0)
}

pub(super) fn transition_submit_state<T, E>(
    state: &mut FormState<T, E>,
    next: SubmitState,
) -> FormResult<()> {
    let current = state.submit_state;
    if current == next {
        return Ok(());
    }

    let allowed = matches!(
        (current, next),
        (SubmitState::Idle, SubmitState::Validating)
            | (SubmitState::Validating, SubmitState::Submitting)
            | (SubmitState::Validating, SubmitState::Failed)
            | (SubmitState::Submitting, SubmitState::Succeeded)
            | (SubmitState::Submitting, SubmitState::Failed)
            | (SubmitState::Succeeded, SubmitState::Validating)
            | (SubmitState::Failed, SubmitState::Validating)
            | (_, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    state.submit_state = next;
    Ok(())
}

pub(super) fn first_error_key<E>(
    field_meta: &BTreeMap<FieldKey, FieldMeta<E>>,
) -> Option<FieldKey> {
    field_meta
        .iter()
        .find_map(|(key, meta)| (!meta.errors.is_empty()).then(|| key.clone()))
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
