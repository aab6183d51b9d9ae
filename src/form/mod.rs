mod array;
mod binding;
mod controller;
mod field;
pub mod rules;
mod schema;
mod validation;

#[cfg(test)]
mod tests;

pub use controller::{
    FieldKey, FieldMeta, FormController, FormError, FormId, FormOptions, FormResult, FormSnapshot,
    RevalidateMode, SubmitState, ValidationMode,
};
pub use field::{ArrayFieldApi, FieldApi};
pub use form_gallery_derive::FormModel;
pub use rules::{Coerced, FieldIssue};
pub use schema::{RuleId, Schema, Trigger};
pub use validation::{
    Element, FieldLens, FieldLensExt, FieldValidator, FormModel, FormValidator, Nested,
    ValidationError,
};
