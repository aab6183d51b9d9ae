use gpui::{
    AppContext, Context, Entity, IntoElement, ParentElement, Render, SharedString, Styled, Window,
    div,
};
use rust_decimal::Decimal;

use crate::components::{
    BurstAnimator, FieldInput, FieldSelect, FormContainer, SelectOption, SubmitButton, control,
};
use crate::form::rules::{self, coerce_number};
use crate::form::{FieldIssue, FormController, FormModel, FormOptions, Schema};
use crate::id::ComponentId;

use super::{heading, install_rejected_submit_log, or_warn, submit_form};

const FORM: &str = "salary";

/// `(label, value)` pairs offered by the currency select. `yen` is offered but not accepted.
pub const CURRENCY_CHOICES: [(&str, &str); 3] = [("$", "usd"), ("€", "eur"), ("¥", "yen")];
const ACCEPTED_CURRENCIES: &[&str] = &["usd", "eur"];

#[derive(Clone, Debug, PartialEq, FormModel)]
pub struct SalaryForm {
    pub min: SharedString,
    pub max: SharedString,
    pub currency: SharedString,
}

impl Default for SalaryForm {
    fn default() -> Self {
        Self {
            min: "0".into(),
            max: "0".into(),
            currency: "usd".into(),
        }
    }
}

/// Both bounds as numbers, or `None` when either side is not a number.
fn bounds(model: &SalaryForm) -> Option<(Decimal, Decimal)> {
    Some((
        coerce_number(&model.min).number()?,
        coerce_number(&model.max).number()?,
    ))
}

fn min_not_above_max(model: &SalaryForm, _value: &SharedString) -> Result<(), FieldIssue> {
    match bounds(model) {
        Some((min, max)) if min > max => Err(FieldIssue::new("Min can't be bigger than max")),
        _ => Ok(()),
    }
}

fn max_not_below_min(model: &SalaryForm, _value: &SharedString) -> Result<(), FieldIssue> {
    match bounds(model) {
        Some((min, max)) if max < min => Err(FieldIssue::new("Max can't be smaller than min")),
        _ => Ok(()),
    }
}

/// Each bound rechecks the other whenever it changes.
pub fn salary_schema() -> Schema<SalaryForm, FieldIssue> {
    let fields = SalaryForm::fields();
    Schema::new()
        .field(fields.min(), rules::number::<SalaryForm>())
        .field(fields.min(), min_not_above_max)
        .field(fields.max(), rules::number::<SalaryForm>())
        .field(fields.max(), max_not_below_min)
        .field(
            fields.currency(),
            rules::one_of::<SalaryForm>(ACCEPTED_CURRENCIES),
        )
        .dependency(fields.max(), fields.min())
        .dependency(fields.min(), fields.max())
}

pub fn salary_controller() -> FormController<SalaryForm, FieldIssue> {
    let controller = FormController::with_schema(
        SalaryForm::default(),
        FormOptions::on_change(),
        salary_schema(),
    );
    install_rejected_submit_log(&controller, FORM);
    controller
}

pub struct SalaryFormExample {
    id: ComponentId,
    form: FormController<SalaryForm, FieldIssue>,
    burst: Entity<BurstAnimator>,
}

impl SalaryFormExample {
    pub fn new(cx: &mut Context<Self>) -> Self {
        let form = salary_controller();
        Self {
            id: ComponentId::form_scope(form.form_id()),
            form,
            burst: cx.new(BurstAnimator::new),
        }
    }

    pub fn form(&self) -> &FormController<SalaryForm, FieldIssue> {
        &self.form
    }
}

impl Drop for SalaryFormExample {
    fn drop(&mut self) {
        control::release_scope(&self.id);
    }
}

impl Render for SalaryFormExample {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        let fields = SalaryForm::fields();
        let (min, max) = (self.form.field(fields.min()), self.form.field(fields.max()));
        let currency = self.form.field(fields.currency());
        let can_submit = or_warn(self.form.can_submit(), FORM, "submit availability");
        let currencies = CURRENCY_CHOICES
            .iter()
            .map(|(label, value)| SelectOption::new(*value, *label));

        let form = self.form.clone();
        let submit = SubmitButton::new(self.burst.clone())
            .with_id(self.id.child("submit"))
            .disabled(!can_submit)
            .on_click(move |_, window, _cx| {
                submit_form(
                    &form,
                    FORM,
                    |model| {
                        tracing::info!(
                            form = FORM,
                            min = %model.min,
                            max = %model.max,
                            currency = %model.currency,
                            "salary range submitted"
                        )
                    },
                    window,
                );
            });

        FormContainer::new().with_id(self.id.clone()).child(
            div()
                .flex()
                .flex_col()
                .gap_2()
                .child(heading("Salary form"))
                .child(
                    div()
                        .flex()
                        .flex_row()
                        .gap_2()
                        .child(div().flex_1().child(FieldInput::new(&min)))
                        .child(div().flex_1().child(FieldInput::new(&max)))
                        .child(div().flex_1().child(FieldSelect::new(&currency, currencies))),
                )
                .child(submit),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldKey;

    fn salary(min: &str, max: &str) -> SalaryForm {
        SalaryForm {
            min: min.to_string().into(),
            max: max.to_string().into(),
            ..SalaryForm::default()
        }
    }

    fn issues(form: &FormController<SalaryForm, FieldIssue>, key: &str) -> Vec<FieldIssue> {
        form.snapshot()
            .expect("snapshot")
            .errors(&FieldKey::new(key))
            .to_vec()
    }

    #[test]
    fn min_above_max_fails_both_bounds() {
        let errors = salary_schema().validate(&salary("10", "5"));
        assert_eq!(
            errors.get(&FieldKey::new("min")),
            Some(&vec![FieldIssue::new("Min can't be bigger than max")])
        );
        assert_eq!(
            errors.get(&FieldKey::new("max")),
            Some(&vec![FieldIssue::new("Max can't be smaller than min")])
        );
    }

    #[test]
    fn equal_bounds_are_valid() {
        assert!(salary_schema().is_valid(&salary("7", "7")));
        assert!(salary_schema().is_valid(&SalaryForm::default()));
    }

    #[test]
    fn non_numbers_skip_the_cross_check() {
        let errors = salary_schema().validate(&salary("abc", "5"));
        assert_eq!(
            errors.get(&FieldKey::new("min")),
            Some(&vec![FieldIssue::new(
                "Invalid input: expected number, received NaN"
            )])
        );
        assert!(!errors.contains_key(&FieldKey::new("max")));
    }

    #[test]
    fn lowering_max_invalidates_an_untouched_min() {
        let fields = SalaryForm::fields();
        let form = salary_controller();
        form.set(fields.max(), "10".into()).expect("raise max");
        form.set(fields.min(), "5".into()).expect("set min");
        assert!(issues(&form, "min").is_empty());

        form.set(fields.max(), "3".into()).expect("lower max");
        assert_eq!(
            issues(&form, "min"),
            vec![FieldIssue::new("Min can't be bigger than max")]
        );
        assert_eq!(
            issues(&form, "max"),
            vec![FieldIssue::new("Max can't be smaller than min")]
        );
        assert!(
            form.field_meta(fields.min())
                .expect("meta")
                .is_some_and(|meta| !meta.touched)
        );

        form.set(fields.max(), "5".into()).expect("match min");
        assert!(issues(&form, "min").is_empty());
        assert!(issues(&form, "max").is_empty());
    }

    #[test]
    fn unedited_max_is_flagged_by_the_submit_attempt() {
        let fields = SalaryForm::fields();
        let form = salary_controller();
        form.set(fields.min(), "10".into()).expect("raise min");
        assert_eq!(
            issues(&form, "min"),
            vec![FieldIssue::new("Min can't be bigger than max")]
        );
        assert!(issues(&form, "max").is_empty());

        form.submit(|_| Ok(())).expect("rejected submit");
        assert_eq!(
            issues(&form, "max"),
            vec![FieldIssue::new("Max can't be smaller than min")]
        );
        let max = form.field(fields.max());
        assert!(max.should_show_errors().expect("max display"));

        form.set(fields.max(), "10".into()).expect("raise max");
        assert!(issues(&form, "min").is_empty());
        assert!(issues(&form, "max").is_empty());
    }

    #[test]
    fn yen_is_offered_but_rejected() {
        assert!(CURRENCY_CHOICES.iter().any(|(_, value)| *value == "yen"));
        let model = SalaryForm {
            currency: "yen".into(),
            ..SalaryForm::default()
        };
        assert_eq!(
            salary_schema().validate(&model).get(&FieldKey::new("currency")),
            Some(&vec![FieldIssue::new(
                "Invalid option: expected one of \"usd\"|\"eur\""
            )])
        );
    }
}
