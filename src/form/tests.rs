use super::*;
use futures::executor::block_on;
use gpui::SharedString;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, Eq, PartialEq)]
struct TestError(&'static str);

impl ValidationError for TestError {
    fn message(&self) -> SharedString {
        self.0.into()
    }
}

#[derive(Clone, Debug, PartialEq, FormModel)]
struct LineItem {
    name: SharedString,
    count: SharedString,
}

#[derive(Clone, Debug, PartialEq, FormModel)]
struct ProfileForm {
    email: SharedString,
    password: SharedString,
    #[form(key = "confirmPassword")]
    confirm_password: SharedString,
    accepted: bool,
    items: Vec<LineItem>,
}

fn item(name: &'static str, count: &'static str) -> LineItem {
    LineItem {
        name: name.into(),
        count: count.into(),
    }
}

fn base_form() -> ProfileForm {
    ProfileForm {
        email: "user@example.com".into(),
        password: "pass".into(),
        confirm_password: "pass".into(),
        accepted: false,
        items: vec![item("apple", "1"), item("pear", "2"), item("fig", "3")],
    }
}

fn required(_model: &ProfileForm, value: &SharedString) -> Result<(), TestError> {
    if value.is_empty() {
        Err(TestError("required"))
    } else {
        Ok(())
    }
}

fn passwords_match(model: &ProfileForm, value: &SharedString) -> Result<(), TestError> {
    if value != &model.password {
        Err(TestError("password mismatch"))
    } else {
        Ok(())
    }
}

fn errors_of(controller: &FormController<ProfileForm, TestError>, key: &str) -> Vec<TestError> {
    controller
        .snapshot()
        .expect("snapshot")
        .errors(&FieldKey::new(key))
        .to_vec()
}

#[derive(Clone)]
struct PerfForm {
    values: BTreeMap<&'static str, SharedString>,
}

impl FormModel for PerfForm {
    type Fields = ();

    fn fields() -> Self::Fields {}
}

#[derive(Clone, Copy)]
struct MapLens {
    key: &'static str,
}

impl FieldLens<PerfForm> for MapLens {
    type Value = SharedString;

    fn key(self) -> FieldKey {
        FieldKey::new(self.key)
    }

    fn get<'a>(self, model: &'a PerfForm) -> &'a Self::Value {
        model
            .values
            .get(self.key)
            .expect("perf key must exist in model values")
    }

    fn get_mut<'a>(self, model: &'a mut PerfForm) -> &'a mut Self::Value {
        model
            .values
            .get_mut(self.key)
            .expect("perf key must exist in model values")
    }
}

#[test]
fn field_lens_updates_model_and_dirty_state() {
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    let fields = ProfileForm::fields();

    controller
        .set(fields.email(), "changed@example.com".into())
        .expect("set must succeed");
    let snapshot = controller.snapshot().expect("snapshot must succeed");
    assert!(snapshot.is_dirty);
    assert_eq!(snapshot.model.email, "changed@example.com");
    assert!(
        snapshot
            .field_meta
            .get(&fields.email().key())
            .is_some_and(|meta| meta.dirty)
    );

    controller
        .set(fields.email(), "user@example.com".into())
        .expect("restoring the initial value must succeed");
    let snapshot = controller.snapshot().expect("snapshot must succeed");
    assert!(!snapshot.is_dirty);
}

#[test]
fn validation_mode_controls_when_errors_appear() {
    let fields = ProfileForm::fields();
    let on_change =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::on_change());
    on_change
        .register_field_validator(fields.email(), required)
        .expect("register validator");
    on_change
        .set(fields.email(), "".into())
        .expect("set should trigger validation");
    assert_eq!(errors_of(&on_change, "email"), vec![TestError("required")]);

    let on_submit =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    on_submit
        .register_field_validator(fields.email(), required)
        .expect("register validator");
    on_submit
        .set(fields.email(), "".into())
        .expect("set should not trigger validation immediately");
    assert!(errors_of(&on_submit, "email").is_empty());
    assert!(!on_submit.validate_form().expect("validate form"));
    assert_eq!(errors_of(&on_submit, "email"), vec![TestError("required")]);
}

#[test]
fn blur_rules_wait_for_the_first_blur() {
    let fields = ProfileForm::fields();
    let schema = Schema::new().field_on(fields.confirm_password(), Trigger::Blur, passwords_match);
    let controller = FormController::with_schema(base_form(), FormOptions::on_change(), schema);

    controller
        .set(fields.confirm_password(), "pas".into())
        .expect("typing before the first blur");
    assert!(errors_of(&controller, "confirmPassword").is_empty());

    controller
        .touch(fields.confirm_password())
        .expect("blur runs the rule");
    assert_eq!(
        errors_of(&controller, "confirmPassword"),
        vec![TestError("password mismatch")]
    );

    controller
        .set(fields.confirm_password(), "pass".into())
        .expect("typing after the first blur revalidates");
    assert!(errors_of(&controller, "confirmPassword").is_empty());
}

#[test]
fn dependencies_revalidate_only_active_dependents() {
    let fields = ProfileForm::fields();
    let schema = Schema::new()
        .field(fields.confirm_password(), passwords_match)
        .dependency(fields.password(), fields.confirm_password());
    let controller = FormController::with_schema(base_form(), FormOptions::on_change(), schema);

    controller
        .set(fields.password(), "new-pass".into())
        .expect("set source field");
    assert!(
        controller
            .field_meta(fields.confirm_password())
            .expect("meta")
            .is_none(),
        "untouched dependents are left alone"
    );

    controller
        .touch(fields.confirm_password())
        .expect("touch dependent");
    controller
        .set(fields.password(), "newer-pass".into())
        .expect("set source field again");
    assert_eq!(
        errors_of(&controller, "confirmPassword"),
        vec![TestError("password mismatch")]
    );

    controller
        .set(fields.password(), "pass".into())
        .expect("matching again");
    assert!(errors_of(&controller, "confirmPassword").is_empty());
}

#[test]
fn scoped_rules_report_on_nested_keys() {
    let fields = ProfileForm::fields();
    let schema = Schema::new().scoped(
        fields.items().key(),
        Trigger::Change,
        |model: &ProfileForm| {
            model
                .items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.count.is_empty())
                .map(|(index, _)| {
                    (
                        FieldKey::new("items").index(index).child("count"),
                        TestError("count is required"),
                    )
                })
                .collect::<Vec<_>>()
        },
    );
    let controller = FormController::with_schema(base_form(), FormOptions::on_change(), schema);
    let count = LineItem::fields().count();

    controller
        .set(FieldLensExt::<ProfileForm>::at(fields.items(), 1, count), "".into())
        .expect("clear second count");
    assert_eq!(
        errors_of(&controller, "items[1].count"),
        vec![TestError("count is required")]
    );

    controller
        .set(FieldLensExt::<ProfileForm>::at(fields.items(), 1, count), "4".into())
        .expect("refill second count");
    assert!(errors_of(&controller, "items[1].count").is_empty());
}

fn missing_names_schema() -> Schema<ProfileForm, TestError> {
    Schema::new().scoped(
        ProfileForm::fields().items().key(),
        Trigger::Change,
        |model: &ProfileForm| {
            model
                .items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.name.is_empty())
                .map(|(index, _)| {
                    (
                        FieldKey::new("items").index(index).child("name"),
                        TestError("name is required"),
                    )
                })
                .collect::<Vec<_>>()
        },
    )
}

#[test]
fn removing_an_element_moves_later_field_state_down() {
    let fields = ProfileForm::fields();
    let controller = FormController::with_schema(
        base_form(),
        FormOptions::on_change(),
        missing_names_schema(),
    );
    let groceries = controller.array_field(fields.items());
    let name = LineItem::fields().name();

    groceries
        .item(2, name)
        .handle_change("".into())
        .expect("clear third name");
    groceries.item(2, name).handle_blur().expect("blur third name");

    let removed = groceries.remove_value(0).expect("remove first item");
    assert_eq!(removed, item("apple", "1"));
    assert_eq!(groceries.len().expect("len"), 2);

    let moved = groceries.item(1, name).meta().expect("meta");
    assert!(moved.touched);
    assert!(moved.dirty);
    assert_eq!(moved.errors, vec![TestError("name is required")]);
    assert!(
        controller
            .field_meta(FieldLensExt::<ProfileForm>::at(fields.items(), 2, name))
            .expect("meta")
            .is_none()
    );
    assert_eq!(
        groceries.remove_value(5),
        Err(FormError::IndexOutOfRange {
            field: FieldKey::new("items"),
            index: 5,
            len: 2,
        })
    );
}

#[test]
fn inserting_an_element_moves_later_field_state_up() {
    let fields = ProfileForm::fields();
    let controller = FormController::with_schema(
        base_form(),
        FormOptions::on_change(),
        missing_names_schema(),
    );
    let groceries = controller.array_field(fields.items());
    let name = LineItem::fields().name();

    groceries
        .item(0, name)
        .handle_change("".into())
        .expect("clear first name");
    groceries.item(0, name).handle_blur().expect("blur first name");

    groceries
        .insert_value(0, item("kiwi", "1"))
        .expect("insert at front");
    assert_eq!(groceries.len().expect("len"), 4);
    assert_eq!(groceries.item(0, name).value().expect("value"), "kiwi");

    let moved = groceries.item(1, name).meta().expect("meta");
    assert!(moved.touched);
    assert!(moved.dirty);
    assert_eq!(moved.errors, vec![TestError("name is required")]);
    assert!(
        controller
            .field_meta(FieldLensExt::<ProfileForm>::at(fields.items(), 0, name))
            .expect("meta")
            .is_none()
    );
    assert!(errors_of(&controller, "items[0].name").is_empty());
    assert_eq!(
        groceries.insert_value(9, item("late", "1")),
        Err(FormError::IndexOutOfRange {
            field: FieldKey::new("items"),
            index: 9,
            len: 4,
        })
    );
}

#[test]
fn swapping_elements_exchanges_their_field_state() {
    let fields = ProfileForm::fields();
    let controller = FormController::with_schema(
        base_form(),
        FormOptions::on_change(),
        missing_names_schema(),
    );
    let groceries = controller.array_field(fields.items());
    let name = LineItem::fields().name();

    groceries
        .item(0, name)
        .handle_change("".into())
        .expect("clear first name");
    groceries.item(0, name).handle_blur().expect("blur first name");

    groceries.swap_values(0, 2).expect("swap first and last");
    assert_eq!(groceries.item(0, name).value().expect("value"), "fig");
    assert!(errors_of(&controller, "items[0].name").is_empty());
    assert_eq!(
        errors_of(&controller, "items[2].name"),
        vec![TestError("name is required")]
    );
    let swapped = groceries.item(2, name).meta().expect("meta");
    assert!(swapped.touched);
    assert!(swapped.dirty);
    assert!(
        controller
            .field_meta(FieldLensExt::<ProfileForm>::at(fields.items(), 0, name))
            .expect("meta")
            .is_none()
    );
    assert_eq!(
        groceries.swap_values(1, 3),
        Err(FormError::IndexOutOfRange {
            field: FieldKey::new("items"),
            index: 3,
            len: 3,
        })
    );
}

#[test]
fn pushing_an_element_keeps_existing_state() {
    let fields = ProfileForm::fields();
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::on_change());
    let groceries = controller.array_field(fields.items());

    groceries
        .push_value(item("untitled", "1"))
        .expect("push item");
    assert_eq!(groceries.len().expect("len"), 4);
    assert_eq!(
        groceries
            .item(3, LineItem::fields().name())
            .value()
            .expect("value"),
        "untitled"
    );
    assert!(controller.snapshot().expect("snapshot").is_dirty);
}

#[test]
fn submit_state_transitions_are_enforced() {
    let fields = ProfileForm::fields();
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::on_change());
    controller
        .register_field_validator(fields.email(), required)
        .expect("register validator");

    let submit_count = Arc::new(AtomicUsize::new(0));
    let rejected = Arc::new(Mutex::new(Vec::new()));
    {
        let rejected = rejected.clone();
        controller
            .on_submit_invalid(move |snapshot| {
                rejected
                    .lock()
                    .expect("rejected lock")
                    .extend(snapshot.invalid_fields().cloned());
            })
            .expect("register invalid handler");
    }

    controller
        .set(fields.email(), "".into())
        .expect("set invalid email");
    {
        let submit_count = submit_count.clone();
        controller
            .submit(move |_model| {
                submit_count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .expect("submit should return Ok when validation fails");
    }
    assert_eq!(submit_count.load(Ordering::SeqCst), 0);
    assert_eq!(
        *rejected.lock().expect("rejected lock"),
        vec![FieldKey::new("email")]
    );
    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.submit_state, SubmitState::Failed);
    assert_eq!(snapshot.submit_count, 1);
    assert!(!snapshot.can_submit);
    assert!(
        snapshot
            .field_meta
            .get(&fields.email().key())
            .is_some_and(|meta| meta.touched)
    );

    controller
        .set(fields.email(), "valid@example.com".into())
        .expect("set valid email");
    {
        let submit_count = submit_count.clone();
        controller
            .submit(move |_model| {
                submit_count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .expect("submit should succeed");
    }
    assert_eq!(submit_count.load(Ordering::SeqCst), 1);
    assert_eq!(
        controller.snapshot().expect("snapshot").submit_state,
        SubmitState::Succeeded
    );
}

#[test]
fn async_submit_receives_the_current_model() {
    let fields = ProfileForm::fields();
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    controller
        .set(fields.accepted(), true)
        .expect("accept terms");

    let seen = Arc::new(Mutex::new(None));
    let result = {
        let seen = seen.clone();
        block_on(controller.submit_async(move |model: &ProfileForm| {
            let model = model.clone();
            async move {
                *seen.lock().expect("seen lock") = Some(model.accepted);
                Ok(())
            }
        }))
    };
    assert_eq!(result, Ok(()));
    assert_eq!(*seen.lock().expect("seen lock"), Some(true));
    assert_eq!(
        controller.snapshot().expect("snapshot").submit_state,
        SubmitState::Succeeded
    );
}

#[test]
fn error_visibility_requires_touch() {
    let fields = ProfileForm::fields();
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::on_change());
    controller
        .register_field_validator(fields.email(), required)
        .expect("register validator");

    controller
        .set(fields.email(), "".into())
        .expect("set invalid");
    assert!(
        controller
            .display_errors(fields.email())
            .expect("display errors")
            .is_empty()
    );

    controller.touch(fields.email()).expect("touch field");
    assert_eq!(
        controller
            .display_errors(fields.email())
            .expect("display errors"),
        vec![SharedString::from("required")]
    );
}

#[test]
fn every_failing_rule_is_reported_unless_first_error_only() {
    let fields = ProfileForm::fields();
    let schema = || {
        Schema::new()
            .field(fields.password(), required)
            .field(fields.password(), |_: &ProfileForm, value: &SharedString| {
                if value.chars().count() < 8 {
                    Err(TestError("too short"))
                } else {
                    Ok(())
                }
            })
    };

    let all = FormController::with_schema(base_form(), FormOptions::on_change(), schema());
    all.set(fields.password(), "".into()).expect("clear password");
    assert_eq!(
        errors_of(&all, "password"),
        vec![TestError("required"), TestError("too short")]
    );

    let first_only = FormController::with_schema(
        base_form(),
        FormOptions {
            validate_first_error_only: true,
            ..FormOptions::on_change()
        },
        schema(),
    );
    first_only
        .set(fields.password(), "".into())
        .expect("clear password");
    assert_eq!(errors_of(&first_only, "password"), vec![TestError("required")]);
}

#[test]
fn reset_to_initial_forgets_everything() {
    let fields = ProfileForm::fields();
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::on_change());
    controller
        .register_field_validator(fields.email(), required)
        .expect("register validator");
    controller.set(fields.email(), "".into()).expect("set");
    controller.submit(|_| Ok(())).expect("rejected submit");

    controller.reset_to_initial().expect("reset");
    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.model, base_form());
    assert_eq!(snapshot.submit_state, SubmitState::Idle);
    assert_eq!(snapshot.submit_count, 0);
    assert!(snapshot.field_meta.is_empty());
    assert!(snapshot.can_submit);
}

#[test]
fn reset_field_drops_its_rule_outcome_and_dirty_flag() {
    let fields = ProfileForm::fields();
    let controller = FormController::with_schema(
        base_form(),
        FormOptions::on_change(),
        missing_names_schema(),
    );
    let second_name =
        FieldLensExt::<ProfileForm>::at(fields.items(), 1, LineItem::fields().name());

    controller
        .set(second_name, "".into())
        .expect("clear second name");
    controller.touch(second_name).expect("touch second name");
    assert_eq!(
        errors_of(&controller, "items[1].name"),
        vec![TestError("name is required")]
    );

    controller.reset_field(second_name).expect("reset second name");
    assert_eq!(controller.value(second_name).expect("value"), "pear");
    assert!(errors_of(&controller, "items[1].name").is_empty());
    let meta = controller
        .field_meta(second_name)
        .expect("meta")
        .expect("reset keeps an entry");
    assert!(!meta.dirty);
    assert!(!meta.touched);
    assert!(controller.snapshot().expect("snapshot").is_valid);
}

#[test]
fn clearing_one_field_keeps_sibling_errors() {
    let fields = ProfileForm::fields();
    let schema = missing_names_schema().field(fields.email(), required);
    let controller = FormController::with_schema(base_form(), FormOptions::on_change(), schema);
    let second_name =
        FieldLensExt::<ProfileForm>::at(fields.items(), 1, LineItem::fields().name());

    controller.set(fields.email(), "".into()).expect("clear email");
    controller
        .set(second_name, "".into())
        .expect("clear second name");

    controller
        .clear_field_errors(second_name)
        .expect("clear name errors");
    assert!(errors_of(&controller, "items[1].name").is_empty());
    assert_eq!(errors_of(&controller, "email"), vec![TestError("required")]);
    assert_eq!(controller.value(second_name).expect("value"), "");

    controller.clear_errors().expect("clear all errors");
    let snapshot = controller.snapshot().expect("snapshot");
    assert!(snapshot.is_valid);
    assert_eq!(snapshot.first_error, None);
    assert!(snapshot.is_dirty);
}

#[test]
fn required_fields_are_flagged_and_touched_by_submit() {
    let fields = ProfileForm::fields();
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());

    controller
        .register_required_field(fields.email())
        .expect("register required");

    assert!(controller.is_required(fields.email()).expect("is required"));
    assert!(!controller.is_required(fields.password()).expect("not required"));
    assert!(controller.field_meta(fields.email()).expect("meta").is_none());

    controller.submit(|_| Ok(())).expect("submit");
    let meta = controller
        .field_meta(fields.email())
        .expect("meta")
        .expect("required field gains meta on submit");
    assert!(meta.touched);
}

#[test]
fn two_hundred_fields_update_invokes_single_validator_path() {
    let keys = (0..200)
        .map(|index| Box::leak(format!("field-{index}").into_boxed_str()) as &'static str)
        .collect::<Vec<_>>();

    let model = PerfForm {
        values: keys
            .iter()
            .map(|key| (*key, SharedString::from("")))
            .collect(),
    };

    let invoke_count = Arc::new(AtomicUsize::new(0));
    let controller = FormController::<PerfForm, TestError>::new(model, FormOptions::on_change());

    for key in &keys {
        let counter = invoke_count.clone();
        controller
            .register_field_validator(
                MapLens { key: *key },
                move |_model: &PerfForm, _value: &SharedString| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
            )
            .expect("register validator");
    }

    let target = keys[137];
    controller
        .set(MapLens { key: target }, "changed".into())
        .expect("update single field");

    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(invoke_count.load(Ordering::SeqCst), 1);
    assert_eq!(snapshot.field_meta.len(), 1);
}

#[test]
fn derive_macro_generates_field_lenses() {
    let fields = ProfileForm::fields();
    assert_eq!(fields.email().key().as_str(), "email");
    assert_eq!(fields.confirm_password().key().as_str(), "confirmPassword");
    assert_eq!(
        FieldLensExt::<ProfileForm>::at(fields.items(), 2, LineItem::fields().count())
            .key()
            .as_str(),
        "items[2].count"
    );
    assert_eq!(FieldKey::new("items[2].count").label(), "Count");
}
