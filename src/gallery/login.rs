use gpui::{
    AppContext, Context, Entity, IntoElement, ParentElement, Render, SharedString, Styled, Window,
    div,
};

use crate::components::{BurstAnimator, FieldInput, FormContainer, SubmitButton, control};
use crate::form::{FieldIssue, FormController, FormModel, FormOptions, Schema, Trigger, rules};
use crate::id::ComponentId;

use super::{install_rejected_submit_log, or_warn, submit_form};

const FORM: &str = "login";

#[derive(Clone, Debug, Default, PartialEq, FormModel)]
pub struct LoginForm {
    pub email: SharedString,
    pub password: SharedString,
    #[form(key = "confirmPassword")]
    pub confirm_password: SharedString,
}

fn passwords_match(model: &LoginForm, value: &SharedString) -> Result<(), FieldIssue> {
    if *value == model.password {
        Ok(())
    } else {
        Err(FieldIssue::new("Passwords do not match"))
    }
}

/// `confirmPassword` is only checked once it has been blurred, then again whenever `password` changes.
pub fn login_schema() -> Schema<LoginForm, FieldIssue> {
    let fields = LoginForm::fields();
    Schema::new()
        .field(
            fields.email(),
            rules::email::<LoginForm>("Invalid email address"),
        )
        .field(
            fields.password(),
            rules::min_chars::<LoginForm>(8, "Password must have 8+ characters"),
        )
        .field_on(fields.confirm_password(), Trigger::Blur, passwords_match)
        .dependency(fields.password(), fields.confirm_password())
}

pub fn login_controller() -> FormController<LoginForm, FieldIssue> {
    let controller = FormController::with_schema(
        LoginForm::default(),
        FormOptions::on_change(),
        login_schema(),
    );
    install_rejected_submit_log(&controller, FORM);
    controller
}

pub struct LoginFormExample {
    id: ComponentId,
    form: FormController<LoginForm, FieldIssue>,
    burst: Entity<BurstAnimator>,
}

impl LoginFormExample {
    pub fn new(cx: &mut Context<Self>) -> Self {
        let form = login_controller();
        Self {
            id: ComponentId::form_scope(form.form_id()),
            form,
            burst: cx.new(BurstAnimator::new),
        }
    }

    pub fn form(&self) -> &FormController<LoginForm, FieldIssue> {
        &self.form
    }
}

impl Drop for LoginFormExample {
    fn drop(&mut self) {
        control::release_scope(&self.id);
    }
}

impl Render for LoginFormExample {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        let fields = LoginForm::fields();
        let values = or_warn(
            self.form.snapshot().map(|snapshot| snapshot.model),
            FORM,
            "values",
        );
        let can_submit = or_warn(self.form.can_submit(), FORM, "submit availability");

        let form = self.form.clone();
        let submit = SubmitButton::new(self.burst.clone())
            .with_id(self.id.child("submit"))
            .disabled(!can_submit)
            .on_click(move |_, window, _cx| {
                submit_form(
                    &form,
                    FORM,
                    |model| tracing::info!(form = FORM, email = %model.email, "login submitted"),
                    window,
                );
            });

        FormContainer::new().with_id(self.id.clone()).child(
            div()
                .flex()
                .flex_col()
                .gap_2()
                .child(
                    FieldInput::new(&self.form.field(fields.email()))
                        .placeholder("you@example.com"),
                )
                .child(FieldInput::new(&self.form.field(fields.password())).masked(true))
                .child(
                    FieldInput::new(&self.form.field(fields.confirm_password())).masked(true),
                )
                .child(submit)
                .child(
                    div()
                        .mt_6()
                        .flex()
                        .flex_col()
                        .child("Form values")
                        .child(format!("Email: {}", values.email))
                        .child(format!("Password: {}", values.password)),
                ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldKey;

    fn issues(controller: &FormController<LoginForm, FieldIssue>, key: &str) -> Vec<FieldIssue> {
        controller
            .snapshot()
            .expect("snapshot")
            .errors(&key.into())
            .to_vec()
    }

    #[test]
    fn short_password_is_rejected() {
        let fields = LoginForm::fields();
        let form = login_controller();
        form.set(fields.password(), "short".into()).expect("set password");
        assert_eq!(
            issues(&form, "password"),
            vec![FieldIssue::new("Password must have 8+ characters")]
        );
        form.set(fields.password(), "long enough".into()).expect("set password");
        assert!(issues(&form, "password").is_empty());
    }

    #[test]
    fn email_must_look_like_an_address() {
        let schema = login_schema();
        let model = LoginForm {
            email: "not-an-email".into(),
            password: "password1".into(),
            confirm_password: "password1".into(),
        };
        let errors = schema.validate(&model);
        assert_eq!(
            errors.get(&FieldKey::new("email")),
            Some(&vec![FieldIssue::new("Invalid email address")])
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn confirmation_waits_for_blur_then_follows_password() {
        let fields = LoginForm::fields();
        let form = login_controller();

        form.set(fields.confirm_password(), "password1".into())
            .expect("type confirmation first");
        assert!(issues(&form, "confirmPassword").is_empty());

        form.touch(fields.confirm_password()).expect("blur confirmation");
        assert_eq!(
            issues(&form, "confirmPassword"),
            vec![FieldIssue::new("Passwords do not match")]
        );

        form.set(fields.password(), "password1".into())
            .expect("type matching password");
        assert!(issues(&form, "confirmPassword").is_empty());
    }

    #[test]
    fn matching_passwords_are_valid_in_either_order() {
        let fields = LoginForm::fields();
        let form = login_controller();
        form.set(fields.password(), "password1".into()).expect("set password");
        form.set(fields.confirm_password(), "password1".into())
            .expect("set confirmation");
        form.touch(fields.confirm_password()).expect("blur confirmation");
        assert!(issues(&form, "confirmPassword").is_empty());
    }

    #[test]
    fn submit_marks_every_field_touched() {
        let form = login_controller();
        form.submit(|_| Ok(())).expect("rejected submit");
        let snapshot = form.snapshot().expect("snapshot");
        assert_eq!(snapshot.submit_count, 1);
        assert!(!snapshot.can_submit);
        for key in ["email", "password", "confirmPassword"] {
            assert!(
                snapshot
                    .field_meta
                    .get(&FieldKey::new(key))
                    .is_some_and(|meta| meta.touched),
                "{key} should be touched"
            );
        }
        assert_eq!(
            snapshot.errors(&"email".into()),
            &[FieldIssue::new("Invalid email address")]
        );
    }
}
