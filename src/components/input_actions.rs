use std::sync::Once;

use gpui::{App, KeyBinding, actions};

pub const INPUT_KEY_CONTEXT: &str = "form_gallery_text_input";

actions!(form_gallery_text_input, [DeleteBackward, PasteClipboard, Submit]);

static BINDINGS_INIT: Once = Once::new();

pub fn ensure_text_keybindings(cx: &mut App) {
    BINDINGS_INIT.call_once(|| {
        cx.bind_keys(input_bindings());
    });
}

fn input_bindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding::new("backspace", DeleteBackward, Some(INPUT_KEY_CONTEXT)),
        KeyBinding::new("cmd-v", PasteClipboard, Some(INPUT_KEY_CONTEXT)),
        KeyBinding::new("ctrl-v", PasteClipboard, Some(INPUT_KEY_CONTEXT)),
        KeyBinding::new("enter", Submit, Some(INPUT_KEY_CONTEXT)),
    ]
}
