use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::controller::FieldKey;
use super::validation::{FieldLens, FieldValidator, FormValidator, ValidationError};

/// Moment at which a rule is allowed to run during interactive editing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Trigger {
    #[default]
    Change,
    Blur,
    /// Only on an explicit form validation or a submit attempt.
    Submit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum RuleFilter {
    Only(Trigger),
    Interactive,
    All,
}

impl RuleFilter {
    fn admits(self, trigger: Trigger) -> bool {
        match self {
            RuleFilter::Only(only) => only == trigger,
            RuleFilter::Interactive => trigger != Trigger::Submit,
            RuleFilter::All => true,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RuleId(usize);

pub(super) type RuleFn<T, E> = Arc<dyn Fn(&T) -> Vec<(FieldKey, E)> + Send + Sync>;

pub(super) struct RuleEntry<T, E> {
    pub(super) id: RuleId,
    pub(super) scope: FieldKey,
    pub(super) trigger: Trigger,
    pub(super) check: RuleFn<T, E>,
}

impl<T, E> Clone for RuleEntry<T, E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            scope: self.scope.clone(),
            trigger: self.trigger,
            check: self.check.clone(),
        }
    }
}

impl<T, E> RuleEntry<T, E> {
    /// A rule is relevant to an edit of `key` when either path contains the other.
    fn touches(&self, key: &FieldKey) -> bool {
        key.is_within(&self.scope) || self.scope.is_within(key)
    }
}

/// Declarative set of validation rules for a form model.
///
/// A schema is plain data: [`Schema::validate`] checks a whole record without any
/// controller state, and a [`FormController`](super::FormController) built from it
/// decides when each rule runs.
pub struct Schema<T, E> {
    rules: Vec<RuleEntry<T, E>>,
    dependencies: BTreeMap<FieldKey, BTreeSet<FieldKey>>,
}

impl<T, E> Default for Schema<T, E> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            dependencies: BTreeMap::new(),
        }
    }
}

impl<T, E> Clone for Schema<T, E> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            dependencies: self.dependencies.clone(),
        }
    }
}

impl<T, E> Schema<T, E>
where
    T: 'static,
    E: ValidationError,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field rule that runs whenever the field changes.
    pub fn field<L, V>(self, lens: L, validator: V) -> Self
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L, E> + 'static,
    {
        self.field_on(lens, Trigger::Change, validator)
    }

    pub fn field_on<L, V>(mut self, lens: L, trigger: Trigger, validator: V) -> Self
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L, E> + 'static,
    {
        self.add_field_rule(lens, trigger, validator);
        self
    }

    /// Adds a rule over a whole subtree that may report errors on any key inside `scope`.
    pub fn scoped<V>(mut self, scope: impl Into<FieldKey>, trigger: Trigger, validator: V) -> Self
    where
        V: FormValidator<T, E> + 'static,
    {
        self.add_scoped_rule(scope.into(), trigger, validator);
        self
    }

    /// Revalidates `dependent` whenever `source` changes.
    pub fn dependency<S, D>(mut self, source: S, dependent: D) -> Self
    where
        S: FieldLens<T>,
        D: FieldLens<T>,
    {
        self.add_dependency(source.key(), dependent.key());
        self
    }

    pub(super) fn add_field_rule<L, V>(&mut self, lens: L, trigger: Trigger, validator: V) -> RuleId
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L, E> + 'static,
    {
        let check: RuleFn<T, E> = Arc::new(move |model: &T| {
            if !lens.exists(model) {
                return Vec::new();
            }
            match validator.validate(model, lens.get(model)) {
                Ok(()) => Vec::new(),
                Err(error) => vec![(lens.key(), error)],
            }
        });
        self.push_rule(lens.key(), trigger, check)
    }

    pub(super) fn add_scoped_rule<V>(
        &mut self,
        scope: FieldKey,
        trigger: Trigger,
        validator: V,
    ) -> RuleId
    where
        V: FormValidator<T, E> + 'static,
    {
        let within = scope.clone();
        let check: RuleFn<T, E> = Arc::new(move |model: &T| {
            let mut errors = validator.validate(model);
            errors.retain(|(key, _)| key.is_within(&within));
            errors
        });
        self.push_rule(scope, trigger, check)
    }

    pub(super) fn add_dependency(&mut self, source: FieldKey, dependent: FieldKey) {
        self.dependencies.entry(source).or_default().insert(dependent);
    }

    fn push_rule(&mut self, scope: FieldKey, trigger: Trigger, check: RuleFn<T, E>) -> RuleId {
        let id = RuleId(self.rules.len());
        self.rules.push(RuleEntry {
            id,
            scope,
            trigger,
            check,
        });
        id
    }

    /// Runs every rule against `model` and groups the errors by field, in rule order.
    pub fn validate(&self, model: &T) -> BTreeMap<FieldKey, Vec<E>> {
        let mut errors = BTreeMap::<FieldKey, Vec<E>>::new();
        for rule in &self.rules {
            for (key, error) in (rule.check)(model) {
                errors.entry(key).or_default().push(error);
            }
        }
        errors
    }

    pub fn is_valid(&self, model: &T) -> bool {
        self.rules.iter().all(|rule| (rule.check)(model).is_empty())
    }

    /// Fields to revalidate after an edit of `key`.
    pub fn dependents_of(&self, key: &FieldKey) -> BTreeSet<FieldKey> {
        self.dependencies
            .iter()
            .filter(|(source, _)| key.is_within(source))
            .flat_map(|(_, dependents)| dependents.iter().cloned())
            .filter(|dependent| dependent != key)
            .collect()
    }

    pub fn scopes(&self) -> impl Iterator<Item = &FieldKey> {
        self.rules.iter().map(|rule| &rule.scope)
    }

    pub(super) fn rules_for(&self, key: &FieldKey, filter: RuleFilter) -> Vec<RuleEntry<T, E>> {
        self.rules
            .iter()
            .filter(|rule| rule.touches(key) && filter.admits(rule.trigger))
            .cloned()
            .collect()
    }

    pub(super) fn all_rules(&self) -> Vec<RuleEntry<T, E>> {
        self.rules.clone()
    }
}
