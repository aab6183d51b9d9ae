use gpui::{
    AppContext, Context, Entity, InteractiveElement, IntoElement, ParentElement, Render,
    StatefulInteractiveElement, Styled, Window, div, px,
};

use crate::gallery::{
    CreditCardFormExample, GroceriesFormExample, LoginFormExample, SalaryFormExample,
};
use crate::provider::GalleryProvider;

/// Scrollable page stacking the example forms: login, credit card, groceries, salary.
pub struct IndexPage {
    login: Entity<LoginFormExample>,
    credit_card: Entity<CreditCardFormExample>,
    groceries: Entity<GroceriesFormExample>,
    salary: Entity<SalaryFormExample>,
}

impl IndexPage {
    pub fn new(cx: &mut Context<Self>) -> Self {
        Self {
            login: cx.new(LoginFormExample::new),
            credit_card: cx.new(CreditCardFormExample::new),
            groceries: cx.new(GroceriesFormExample::new),
            salary: cx.new(SalaryFormExample::new),
        }
    }
}

impl Render for IndexPage {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let colors = GalleryProvider::theme(cx).semantic;
        div()
            .id("index-page")
            .size_full()
            .overflow_y_scroll()
            .bg(colors.bg_canvas)
            .text_color(colors.text_primary)
            .child(
                div()
                    .flex()
                    .flex_col()
                    .gap_8()
                    .py(px(32.0))
                    .px_4()
                    .child(self.login.clone())
                    .child(self.credit_card.clone())
                    .child(self.groceries.clone())
                    .child(self.salary.clone()),
            )
    }
}
