use std::fmt::{Display, Formatter};
use std::ops::Deref;

use gpui::{ElementId, SharedString};

use crate::form::{FieldKey, FormId};

/// Stable identifier of a component instance; element ids of its parts are derived with `slot`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ComponentId(SharedString);

impl ComponentId {
    pub fn new(value: impl Into<SharedString>) -> Self {
        Self(value.into())
    }

    /// Id derived from the caller location, so the same call site keeps the same id across frames.
    #[track_caller]
    pub fn auto(prefix: &str) -> Self {
        Self(stable_auto_id(prefix).into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }

    pub fn slot(&self, name: &str) -> ElementId {
        ElementId::Name(format!("{}::{name}", self.0).into())
    }

    pub fn slot_index(&self, name: &str, index: usize) -> ElementId {
        ElementId::Name(format!("{}::{name}::{index}", self.0).into())
    }

    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{name}", self.0).into())
    }

    /// Root id of one form instance. Field ids hang below it, so two instances never share
    /// control state.
    pub fn form_scope(form: FormId) -> Self {
        Self(format!("form-{}", form.0).into())
    }

    pub fn field(&self, key: &FieldKey) -> Self {
        self.child(key.as_str())
    }

    /// Whether `other` is this id or one derived from it with `child` or a slot.
    pub fn contains(&self, other: &str) -> bool {
        other
            .strip_prefix(self.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.') || rest.starts_with("::"))
    }
}

impl Default for ComponentId {
    #[track_caller]
    fn default() -> Self {
        Self::auto("component")
    }
}

impl Deref for ComponentId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl Display for ComponentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ComponentId {
    fn from(value: &str) -> Self {
        Self::new(SharedString::from(value.to_string()))
    }
}

impl From<String> for ComponentId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<SharedString> for ComponentId {
    fn from(value: SharedString) -> Self {
        Self::new(value)
    }
}

impl From<ComponentId> for ElementId {
    fn from(value: ComponentId) -> Self {
        ElementId::Name(value.0)
    }
}

#[track_caller]
pub fn stable_auto_id(prefix: &str) -> String {
    let location = std::panic::Location::caller();
    let seed = format!(
        "{prefix}:{}:{}:{}",
        location.file(),
        location.line(),
        location.column()
    );
    format!("{prefix}-{:016x}", fnv1a64(seed.as_bytes()))
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x00000100000001b3;

    let mut hash = OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
