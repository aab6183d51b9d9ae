use chrono::Datelike;
use gpui::{
    AppContext, Context, Entity, IntoElement, ParentElement, Render, SharedString, Styled, Window,
    div,
};

use crate::components::{
    BurstAnimator, CardFace, CardFlipAnimator, CardSide, CreditCardVisualization, FieldErrors,
    FieldInput, FormContainer, SubmitButton, control,
};
use crate::form::rules::{self, is_digits};
use crate::form::{
    FieldIssue, FieldKey, FieldLens, FieldLensExt, FormController, FormModel, FormOptions, Schema,
    Trigger,
};
use crate::id::ComponentId;

use super::{heading, install_rejected_submit_log, or_warn, submit_form};

const FORM: &str = "credit-card";
const LATEST_EXPIRY_YEAR: i32 = 2100;

/// Calendar month used as "now" by the expiry rules.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Month of the local clock, 1 to 12.
    pub fn current() -> Self {
        let now = chrono::Local::now();
        Self::new(now.year(), now.month())
    }
}

#[derive(Clone, Debug, Default, PartialEq, FormModel)]
pub struct ExpirationDate {
    pub year: SharedString,
    pub month: SharedString,
}

#[derive(Clone, Debug, Default, PartialEq, FormModel)]
pub struct CreditCardForm {
    #[form(key = "nameOnCard")]
    pub name_on_card: SharedString,
    #[form(key = "sixteenDigitNumber")]
    pub sixteen_digit_number: SharedString,
    pub cvc: SharedString,
    #[form(key = "expirationDate")]
    pub expiration_date: ExpirationDate,
}

impl CreditCardForm {
    fn face(&self) -> CardFace {
        CardFace {
            number: self.sixteen_digit_number.clone(),
            name: self.name_on_card.clone(),
            year: self.expiration_date.year.clone(),
            month: self.expiration_date.month.clone(),
            cvc: self.cvc.clone(),
        }
    }
}

fn year_field() -> impl FieldLens<CreditCardForm, Value = SharedString> {
    FieldLensExt::<CreditCardForm>::then(
        CreditCardForm::fields().expiration_date(),
        ExpirationDate::fields().year(),
    )
}

fn month_field() -> impl FieldLens<CreditCardForm, Value = SharedString> {
    FieldLensExt::<CreditCardForm>::then(
        CreditCardForm::fields().expiration_date(),
        ExpirationDate::fields().month(),
    )
}

fn parse_year(value: &str) -> Result<i32, FieldIssue> {
    if !is_digits(value, 4, 4) {
        return Err(FieldIssue::new("Must be four digits"));
    }
    value
        .parse()
        .map_err(|_| FieldIssue::new("Invalid year"))
}

fn parse_month(value: &str) -> Result<u32, FieldIssue> {
    if !is_digits(value, 1, 2) {
        return Err(FieldIssue::new("Must be 1 or 2 digits"));
    }
    let month = value
        .parse::<u32>()
        .map_err(|_| FieldIssue::new("Invalid month"))?;
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(FieldIssue::new("Must be a number from 1 to 12"))
    }
}

fn expiry_year(
    now: YearMonth,
) -> impl Fn(&CreditCardForm, &SharedString) -> Result<(), FieldIssue> + Send + Sync + 'static {
    move |_, value| {
        let year = parse_year(value)?;
        if year < now.year {
            Err(FieldIssue::new("expiry year must be current year or later"))
        } else if year > LATEST_EXPIRY_YEAR {
            Err(FieldIssue::new("yeah right"))
        } else {
            Ok(())
        }
    }
}

fn expiry_month(_model: &CreditCardForm, value: &SharedString) -> Result<(), FieldIssue> {
    parse_month(value).map(|_| ())
}

/// Whole-date check, skipped until both parts parse. Past years are left to the year rule.
fn expiry_not_in_past(
    now: YearMonth,
) -> impl Fn(&CreditCardForm) -> Vec<(FieldKey, FieldIssue)> + Send + Sync + 'static {
    move |model| {
        let date = &model.expiration_date;
        let (Ok(year), Ok(month)) = (parse_year(&date.year), parse_month(&date.month)) else {
            return Vec::new();
        };
        if year != now.year || month >= now.month {
            return Vec::new();
        }
        vec![(
            CreditCardForm::fields().expiration_date().key(),
            FieldIssue::new("Month cannot be earlier than current month"),
        )]
    }
}

pub fn credit_card_schema(now: YearMonth) -> Schema<CreditCardForm, FieldIssue> {
    let fields = CreditCardForm::fields();
    Schema::new()
        .field(
            fields.sixteen_digit_number(),
            rules::digits::<CreditCardForm>(16, "Must be 16 digits"),
        )
        .field(
            fields.name_on_card(),
            rules::required::<CreditCardForm>("This field is required"),
        )
        .field(
            fields.cvc(),
            rules::digits::<CreditCardForm>(3, "Must be 3 digits"),
        )
        .field(year_field(), expiry_year(now))
        .field(month_field(), expiry_month)
        .scoped(
            fields.expiration_date().key(),
            Trigger::Change,
            expiry_not_in_past(now),
        )
}

pub fn credit_card_controller(now: YearMonth) -> FormController<CreditCardForm, FieldIssue> {
    let controller = FormController::with_schema(
        CreditCardForm::default(),
        FormOptions::on_change(),
        credit_card_schema(now),
    );
    let fields = CreditCardForm::fields();
    let marked = [
        controller.register_required_field(fields.name_on_card()),
        controller.register_required_field(fields.sixteen_digit_number()),
        controller.register_required_field(fields.cvc()),
        controller.register_required_field(year_field()),
        controller.register_required_field(month_field()),
    ];
    for error in marked.into_iter().filter_map(Result::err) {
        tracing::warn!(%error, form = FORM, "failed to mark required field");
    }
    install_rejected_submit_log(&controller, FORM);
    controller
}

pub struct CreditCardFormExample {
    id: ComponentId,
    form: FormController<CreditCardForm, FieldIssue>,
    burst: Entity<BurstAnimator>,
    flip: Entity<CardFlipAnimator>,
}

impl CreditCardFormExample {
    pub fn new(cx: &mut Context<Self>) -> Self {
        Self::with_clock(YearMonth::current(), cx)
    }

    pub fn with_clock(now: YearMonth, cx: &mut Context<Self>) -> Self {
        let form = credit_card_controller(now);
        Self {
            id: ComponentId::form_scope(form.form_id()),
            form,
            burst: cx.new(BurstAnimator::new),
            flip: cx.new(CardFlipAnimator::new),
        }
    }

    pub fn form(&self) -> &FormController<CreditCardForm, FieldIssue> {
        &self.form
    }

    /// Blurring either date part also marks the whole date touched so its own error shows.
    fn date_part(&self, field: FieldInput, placeholder: &'static str) -> FieldInput {
        let form = self.form.clone();
        field.placeholder(placeholder).on_blur(move |window, _cx| {
            let date = CreditCardForm::fields().expiration_date();
            if let Err(error) = form.touch(date) {
                tracing::warn!(%error, field = %date.key(), "failed to mark field touched");
            }
            window.refresh();
        })
    }
}

impl Drop for CreditCardFormExample {
    fn drop(&mut self) {
        control::release_scope(&self.id);
    }
}

impl Render for CreditCardFormExample {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        let fields = CreditCardForm::fields();
        let date = fields.expiration_date();
        let values = or_warn(
            self.form.snapshot().map(|snapshot| snapshot.model),
            FORM,
            "values",
        );
        let can_submit = or_warn(self.form.can_submit(), FORM, "submit availability");

        let show_back = self.flip.clone();
        let show_front = self.flip.clone();
        let cvc = FieldInput::new(&self.form.field(fields.cvc()))
            .placeholder("123")
            .on_focus(move |_window, cx| {
                show_back.update(cx, |flip, cx| flip.show(CardSide::Back, cx));
            })
            .on_blur(move |_window, cx| {
                show_front.update(cx, |flip, cx| flip.show(CardSide::Front, cx));
            });

        let year = self.date_part(FieldInput::new(&self.form.field(year_field())), "2025");
        let month = self.date_part(FieldInput::new(&self.form.field(month_field())), "7");

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
                            name = %model.name_on_card,
                            "credit card submitted"
                        )
                    },
                    window,
                );
            });

        FormContainer::new().with_id(self.id.clone()).child(
            div()
                .flex()
                .flex_col()
                .gap_4()
                .child(heading("Credit card form"))
                .child(
                    CreditCardVisualization::new(values.face(), self.flip.clone())
                        .with_id(self.id.child("card")),
                )
                .child(
                    FieldInput::new(&self.form.field(fields.name_on_card()))
                        .placeholder("John Doe"),
                )
                .child(
                    FieldInput::new(&self.form.field(fields.sixteen_digit_number()))
                        .placeholder("0000 0000 0000 0000"),
                )
                .child(cvc)
                .child(
                    div()
                        .flex()
                        .flex_col()
                        .child(div().flex().flex_row().gap_2().child(year).child(month))
                        .child(FieldErrors::for_field(&self.form.field(date))),
                )
                .child(submit),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: YearMonth = YearMonth::new(2030, 6);

    fn card(year: &str, month: &str) -> CreditCardForm {
        CreditCardForm {
            name_on_card: "Ada Lovelace".into(),
            sixteen_digit_number: "4242424242424242".into(),
            cvc: "123".into(),
            expiration_date: ExpirationDate {
                year: year.to_string().into(),
                month: month.to_string().into(),
            },
        }
    }

    fn messages(model: &CreditCardForm) -> Vec<(String, String)> {
        credit_card_schema(NOW)
            .validate(model)
            .into_iter()
            .flat_map(|(key, issues)| {
                issues
                    .into_iter()
                    .map(move |issue| (key.to_string(), issue.to_string()))
            })
            .collect()
    }

    #[test]
    fn past_year_is_rejected() {
        assert_eq!(
            messages(&card("2029", "12")),
            vec![(
                "expirationDate.year".to_string(),
                "expiry year must be current year or later".to_string()
            )]
        );
    }

    #[test]
    fn earlier_month_of_current_year_is_rejected() {
        assert_eq!(
            messages(&card("2030", "5")),
            vec![(
                "expirationDate".to_string(),
                "Month cannot be earlier than current month".to_string()
            )]
        );
    }

    #[test]
    fn current_month_and_later_dates_are_accepted() {
        assert!(messages(&card("2030", "6")).is_empty());
        assert!(messages(&card("2030", "06")).is_empty());
        assert!(messages(&card("2031", "1")).is_empty());
    }

    #[test]
    fn year_and_month_shapes_are_checked_in_order() {
        let issue = |year: &str, month: &str, key: &str| {
            messages(&card(year, month))
                .into_iter()
                .find(|(owner, _)| owner == key)
                .map(|(_, message)| message)
        };
        assert_eq!(
            issue("30", "6", "expirationDate.year").as_deref(),
            Some("Must be four digits")
        );
        assert_eq!(
            issue("2101", "6", "expirationDate.year").as_deref(),
            Some("yeah right")
        );
        assert_eq!(
            issue("2030", "abc", "expirationDate.month").as_deref(),
            Some("Must be 1 or 2 digits")
        );
        assert_eq!(
            issue("2030", "13", "expirationDate.month").as_deref(),
            Some("Must be a number from 1 to 12")
        );
        assert_eq!(issue("2030", "13", "expirationDate"), None);
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = credit_card_schema(NOW).validate(&CreditCardForm::default());
        let keys = errors.keys().map(FieldKey::as_str).collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                "cvc",
                "expirationDate.month",
                "expirationDate.year",
                "nameOnCard",
                "sixteenDigitNumber",
            ]
        );
    }

    #[test]
    fn card_fields_are_marked_required_and_touched_on_submit() {
        let fields = CreditCardForm::fields();
        let form = credit_card_controller(NOW);
        assert!(form.is_required(fields.name_on_card()).expect("name flag"));
        assert!(form.is_required(fields.cvc()).expect("cvc flag"));
        assert!(form.is_required(year_field()).expect("year flag"));
        assert!(!form.is_required(fields.expiration_date()).expect("date flag"));

        form.submit(|_| Ok(())).expect("rejected submit");
        let name = form.field(fields.name_on_card());
        assert!(name.should_show_errors().expect("name display"));
        assert_eq!(
            name.error_messages().expect("name errors"),
            vec![SharedString::from("This field is required")]
        );
    }

    #[test]
    fn editing_a_date_part_reruns_the_whole_date_check() {
        let date = CreditCardForm::fields().expiration_date();
        let form = credit_card_controller(NOW);
        form.set(year_field(), "2030".into()).expect("set year");
        form.set(month_field(), "4".into()).expect("set month");
        let snapshot = form.snapshot().expect("snapshot");
        assert_eq!(
            snapshot.errors(&date.key()),
            &[FieldIssue::new("Month cannot be earlier than current month")]
        );

        form.set(month_field(), "9".into()).expect("set later month");
        assert!(form.snapshot().expect("snapshot").errors(&date.key()).is_empty());
    }

    #[test]
    fn face_mirrors_the_entered_values() {
        let face = card("2031", "7").face();
        assert_eq!(face.number, "4242424242424242");
        assert_eq!(face.name, "Ada Lovelace");
        assert_eq!(face.year, "2031");
        assert_eq!(face.cvc, "123");
    }
}
