use gpui::{
    AppContext, Context, Entity, IntoElement, ParentElement, Render, SharedString, Styled, Window,
    div, px,
};
use rust_decimal::Decimal;

use crate::components::{
    BurstAnimator, Button, ButtonVariant, FieldCheckbox, FieldErrors, FieldInput, FormContainer,
    SubmitButton, control,
};
use crate::form::rules::coerce_number;
use crate::form::{
    ArrayFieldApi, FieldIssue, FieldKey, FieldLens, FormController, FormModel, FormOptions, Schema,
    Trigger,
};
use crate::icon::IconName;
use crate::id::ComponentId;

use super::{heading, install_rejected_submit_log, or_warn, submit_form};

const FORM: &str = "groceries";

#[derive(Clone, Debug, PartialEq, FormModel)]
pub struct GroceryItem {
    pub name: SharedString,
    pub count: SharedString,
    #[form(key = "isChecked")]
    pub is_checked: bool,
}

impl GroceryItem {
    pub fn new(name: impl Into<SharedString>, count: u32, is_checked: bool) -> Self {
        Self {
            name: name.into(),
            count: count.to_string().into(),
            is_checked,
        }
    }

    /// What the add button appends.
    pub fn untitled() -> Self {
        Self::new("untitled", 1, false)
    }
}

#[derive(Clone, Debug, PartialEq, FormModel)]
pub struct GroceriesForm {
    pub groceries: Vec<GroceryItem>,
}

impl Default for GroceriesForm {
    fn default() -> Self {
        Self {
            groceries: vec![
                GroceryItem::new("Milk", 1, true),
                GroceryItem::new("Coffee", 2, false),
            ],
        }
    }
}

fn has_count(count: &str) -> bool {
    coerce_number(count)
        .number()
        .is_some_and(|count| count >= Decimal::ONE)
}

/// List length plus the name and count of every item; reported on `groceries[i].*` keys.
fn check_groceries(model: &GroceriesForm) -> Vec<(FieldKey, FieldIssue)> {
    let list = GroceriesForm::fields().groceries().key();
    let mut issues = Vec::new();
    if model.groceries.is_empty() {
        issues.push((
            list.clone(),
            FieldIssue::new("Must have at least one item in your grocery list"),
        ));
    }
    for (index, item) in model.groceries.iter().enumerate() {
        let item_key = list.index(index);
        if item.name.is_empty() {
            issues.push((item_key.child("name"), FieldIssue::new("name is required")));
        }
        if !has_count(&item.count) {
            issues.push((item_key.child("count"), FieldIssue::new("count is required")));
        }
    }
    issues
}

pub fn groceries_schema() -> Schema<GroceriesForm, FieldIssue> {
    Schema::new().scoped(
        GroceriesForm::fields().groceries().key(),
        Trigger::Change,
        check_groceries,
    )
}

pub fn groceries_controller() -> FormController<GroceriesForm, FieldIssue> {
    let controller = FormController::with_schema(
        GroceriesForm::default(),
        FormOptions::on_change(),
        groceries_schema(),
    );
    install_rejected_submit_log(&controller, FORM);
    controller
}

pub struct GroceriesFormExample {
    id: ComponentId,
    form: FormController<GroceriesForm, FieldIssue>,
    burst: Entity<BurstAnimator>,
}

impl GroceriesFormExample {
    pub fn new(cx: &mut Context<Self>) -> Self {
        let form = groceries_controller();
        Self {
            id: ComponentId::form_scope(form.form_id()),
            form,
            burst: cx.new(BurstAnimator::new),
        }
    }

    pub fn form(&self) -> &FormController<GroceriesForm, FieldIssue> {
        &self.form
    }

    fn render_item<A>(
        &self,
        list: &ArrayFieldApi<GroceriesForm, FieldIssue, A>,
        index: usize,
        item: &GroceryItem,
    ) -> impl IntoElement
    where
        A: FieldLens<GroceriesForm, Value = Vec<GroceryItem>>,
    {
        let members = GroceryItem::fields();
        let remover = list.clone();
        let remove = Button::without_label()
            .with_id(self.id.child(&format!("remove-{index}")))
            .left_icon(IconName::Trash)
            .variant(ButtonVariant::Subtle)
            .on_click(move |_, window, _cx| {
                if let Err(error) = remover.remove_value(index) {
                    tracing::warn!(%error, index, "failed to remove grocery item");
                }
                window.refresh();
            });

        div()
            .flex()
            .flex_row()
            .items_center()
            .gap_2()
            .child(FieldCheckbox::new(&list.item(index, members.is_checked())))
            .child(
                div().flex_1().child(
                    FieldInput::new(&list.item(index, members.name()))
                        .disabled(item.is_checked),
                ),
            )
            .child(
                div().w(px(72.0)).child(
                    FieldInput::new(&list.item(index, members.count()))
                        .disabled(item.is_checked),
                ),
            )
            .child(remove)
    }
}

impl Drop for GroceriesFormExample {
    fn drop(&mut self) {
        control::release_scope(&self.id);
    }
}

impl Render for GroceriesFormExample {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        let list = self.form.array_field(GroceriesForm::fields().groceries());
        let values = or_warn(
            self.form.snapshot().map(|snapshot| snapshot.model),
            FORM,
            "values",
        );
        let can_submit = or_warn(self.form.can_submit(), FORM, "submit availability");

        let rows = values
            .groceries
            .iter()
            .enumerate()
            .map(|(index, item)| self.render_item(&list, index, item).into_any_element())
            .collect::<Vec<_>>();

        let adder = list.clone();
        let add = Button::without_label()
            .with_id(self.id.child("add"))
            .left_icon(IconName::Plus)
            .variant(ButtonVariant::Outline)
            .full_width(true)
            .on_click(move |_, window, _cx| {
                if let Err(error) = adder.push_value(GroceryItem::untitled()) {
                    tracing::warn!(%error, "failed to add grocery item");
                }
                window.refresh();
            });

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
                            items = model.groceries.len(),
                            "grocery list submitted"
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
                .child(heading("Groceries list form"))
                .child(div().flex().flex_col().children(rows))
                .child(div().mb_4().child(FieldErrors::for_field(list.field())))
                .child(div().mb_4().child(add))
                .child(submit),
        )
    }
}
