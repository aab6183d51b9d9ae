//! The four example forms shown on the index page.

mod credit_card;
mod groceries;
mod login;
mod salary;

use gpui::{Div, FontWeight, ParentElement, Styled, Window, div};

use crate::form::{FieldIssue, FieldKey, FormController, FormResult, FormSnapshot};

pub use credit_card::{
    CreditCardForm, CreditCardFormExample, ExpirationDate, YearMonth, credit_card_controller,
    credit_card_schema,
};
pub use groceries::{
    GroceriesForm, GroceriesFormExample, GroceryItem, groceries_controller, groceries_schema,
};
pub use login::{LoginForm, LoginFormExample, login_controller, login_schema};
pub use salary::{
    CURRENCY_CHOICES, SalaryForm, SalaryFormExample, salary_controller, salary_schema,
};

pub(crate) fn heading(text: &'static str) -> Div {
    div().text_2xl().font_weight(FontWeight::BOLD).child(text)
}

/// Handler for submits rejected by validation: records which fields blocked the attempt.
pub(crate) fn log_rejected_submit<T: 'static>(
    form: &'static str,
) -> impl Fn(&FormSnapshot<T, FieldIssue>) + Send + Sync + 'static {
    move |snapshot| {
        tracing::info!(
            form,
            submit_count = snapshot.submit_count,
            invalid = ?snapshot.invalid_fields().map(FieldKey::as_str).collect::<Vec<_>>(),
            "submit blocked by validation"
        );
    }
}

pub(crate) fn install_rejected_submit_log<T>(
    controller: &FormController<T, FieldIssue>,
    form: &'static str,
) where
    T: Clone + Send + Sync + 'static,
{
    if let Err(error) = controller.on_submit_invalid(log_rejected_submit(form)) {
        tracing::warn!(%error, form, "failed to install invalid submit handler");
    }
}

/// Submits `controller`, handing the validated record to `on_valid`, then redraws.
pub(crate) fn submit_form<T>(
    controller: &FormController<T, FieldIssue>,
    form: &'static str,
    on_valid: impl FnOnce(&T),
    window: &mut Window,
) where
    T: Clone + Send + Sync + 'static,
{
    let result = controller.submit(|model| {
        on_valid(model);
        Ok(())
    });
    if let Err(error) = result {
        tracing::warn!(%error, form, "submit failed");
    }
    window.refresh();
}

pub(crate) fn or_warn<V: Default>(result: FormResult<V>, form: &'static str, what: &str) -> V {
    result.unwrap_or_else(|error| {
        tracing::warn!(%error, form, "failed to read {what}");
        V::default()
    })
}
