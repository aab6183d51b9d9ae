use form_gallery::form::{FieldLens, FormModel};
use gpui::SharedString;

#[derive(Clone, form_gallery::form::FormModel)]
struct SignUp {
    email: SharedString,
    #[form(key = "confirmPassword")]
    confirm_password: SharedString,
}

fn main() {
    let fields = SignUp::fields();
    let mut model = SignUp {
        email: "a@b.co".into(),
        confirm_password: SharedString::default(),
    };
    fields.email().set(&mut model, "c@d.io".into());
    assert_eq!(fields.email().key().as_str(), "email");
    assert_eq!(fields.email().get(&model), "c@d.io");
    assert_eq!(fields.confirm_password().key().as_str(), "confirmPassword");
}
