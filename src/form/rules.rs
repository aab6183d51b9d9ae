use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use gpui::SharedString;
use regex::Regex;
use rust_decimal::Decimal;

use super::validation::ValidationError;

// Local part of dot-separated atoms, then one or more domain labels and an alphabetic TLD.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
    )
    .expect("EMAIL_REGEX: invalid regex pattern")
});

/// Error attached to a field: a single user-facing message.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldIssue(SharedString);

impl FieldIssue {
    pub fn new(message: impl Into<SharedString>) -> Self {
        Self(message.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl ValidationError for FieldIssue {
    fn message(&self) -> SharedString {
        self.0.clone()
    }
}

impl Display for FieldIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of reading free text as a number.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Coerced {
    Number(Decimal),
    NotANumber,
}

impl Coerced {
    pub fn number(self) -> Option<Decimal> {
        match self {
            Coerced::Number(value) => Some(value),
            Coerced::NotANumber => None,
        }
    }
}

/// Reads `text` as a number after trimming: blank text is zero, anything unparsable is not a number.
pub fn coerce_number(text: &str) -> Coerced {
    let text = text.trim();
    if text.is_empty() {
        return Coerced::Number(Decimal::ZERO);
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_or(Coerced::NotANumber, Coerced::Number)
}

pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// True when `value` is made of ASCII digits and its length is within `min..=max`.
pub fn is_digits(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.len()) && value.bytes().all(|byte| byte.is_ascii_digit())
}

pub fn required<T: 'static>(
    message: impl Into<SharedString>,
) -> impl Fn(&T, &SharedString) -> Result<(), FieldIssue> + Send + Sync + 'static {
    let message = message.into();
    move |_: &T, value: &SharedString| {
        if value.is_empty() {
            Err(FieldIssue::new(message.clone()))
        } else {
            Ok(())
        }
    }
}

pub fn min_chars<T: 'static>(
    min: usize,
    message: impl Into<SharedString>,
) -> impl Fn(&T, &SharedString) -> Result<(), FieldIssue> + Send + Sync + 'static {
    let message = message.into();
    move |_: &T, value: &SharedString| {
        if value.chars().count() < min {
            Err(FieldIssue::new(message.clone()))
        } else {
            Ok(())
        }
    }
}

pub fn email<T: 'static>(
    message: impl Into<SharedString>,
) -> impl Fn(&T, &SharedString) -> Result<(), FieldIssue> + Send + Sync + 'static {
    let message = message.into();
    move |_: &T, value: &SharedString| {
        if is_email(value) {
            Ok(())
        } else {
            Err(FieldIssue::new(message.clone()))
        }
    }
}

/// Exactly `len` ASCII digits.
pub fn digits<T: 'static>(
    len: usize,
    message: impl Into<SharedString>,
) -> impl Fn(&T, &SharedString) -> Result<(), FieldIssue> + Send + Sync + 'static {
    let message = message.into();
    move |_: &T, value: &SharedString| {
        if is_digits(value, len, len) {
            Ok(())
        } else {
            Err(FieldIssue::new(message.clone()))
        }
    }
}

pub fn one_of<T: 'static>(
    options: &'static [&'static str],
) -> impl Fn(&T, &SharedString) -> Result<(), FieldIssue> + Send + Sync + 'static {
    move |_: &T, value: &SharedString| {
        if options.iter().any(|option| **option == *value.as_ref()) {
            return Ok(());
        }
        let expected = options
            .iter()
            .map(|option| format!("\"{option}\""))
            .collect::<Vec<_>>()
            .join("|");
        Err(FieldIssue::new(format!("Invalid option: expected one of {expected}")))
    }
}

/// Rejects text that does not read as a number.
pub fn number<T: 'static>()
-> impl Fn(&T, &SharedString) -> Result<(), FieldIssue> + Send + Sync + 'static {
    move |_: &T, value: &SharedString| match coerce_number(value) {
        Coerced::Number(_) => Ok(()),
        Coerced::NotANumber => Err(FieldIssue::new("Invalid input: expected number, received NaN")),
    }
}

/// Numeric text that must be at least `min`; text that is not a number fails too.
pub fn number_at_least<T: 'static>(
    min: Decimal,
    message: impl Into<SharedString>,
) -> impl Fn(&T, &SharedString) -> Result<(), FieldIssue> + Send + Sync + 'static {
    let message = message.into();
    move |_: &T, value: &SharedString| match coerce_number(value) {
        Coerced::Number(number) if number >= min => Ok(()),
        _ => Err(FieldIssue::new(message.clone())),
    }
}
