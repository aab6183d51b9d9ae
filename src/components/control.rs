use std::{
    collections::HashMap,
    sync::{LazyLock, Mutex},
};

use gpui::FocusHandle;

use crate::id::ComponentId;

static BOOL_STATE: LazyLock<Mutex<HashMap<String, bool>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));
static FOCUS_HANDLES: LazyLock<Mutex<HashMap<String, FocusHandle>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));
pub const FOCUSED_SLOT: &str = "focused";
pub const OPEN_SLOT: &str = "open";

fn key(id: &str, slot: &str) -> String {
    format!("{id}::{slot}")
}

pub fn bool_state(id: &str, slot: &str, controlled: Option<bool>, default: bool) -> bool {
    if let Some(value) = controlled {
        return value;
    }

    let composed = key(id, slot);
    if let Ok(mut state) = BOOL_STATE.lock() {
        return *state.entry(composed).or_insert(default);
    }
    default
}

pub fn set_bool_state(id: &str, slot: &str, value: bool) {
    let composed = key(id, slot);
    if let Ok(mut state) = BOOL_STATE.lock() {
        state.insert(composed, value);
    }
}

pub fn focused_state(id: &str, controlled: Option<bool>, default: bool) -> bool {
    bool_state(id, FOCUSED_SLOT, controlled, default)
}

pub fn set_focused_state(id: &str, value: bool) {
    set_bool_state(id, FOCUSED_SLOT, value);
}

/// Marks `id` focused and reports whether it was unfocused before.
pub fn gain_focus(id: &str) -> bool {
    let was_focused = focused_state(id, None, false);
    set_focused_state(id, true);
    !was_focused
}

/// Marks `id` unfocused and reports whether it held focus before.
pub fn lose_focus(id: &str) -> bool {
    let was_focused = focused_state(id, None, false);
    set_focused_state(id, false);
    was_focused
}

pub fn is_activation_key(key: &str) -> bool {
    key == "space" || key == "enter"
}

/// Focus handle shared by every render of the component with this id.
pub fn focus_handle(id: &str, cx: &gpui::App) -> FocusHandle {
    if let Ok(mut handles) = FOCUS_HANDLES.lock() {
        return handles
            .entry(id.to_string())
            .or_insert_with(|| cx.focus_handle())
            .clone();
    }
    cx.focus_handle()
}

/// Forgets the state of every control under `scope`. Called when the owning view is dropped.
pub fn release_scope(scope: &ComponentId) {
    if let Ok(mut state) = BOOL_STATE.lock() {
        state.retain(|key, _| !scope.contains(key));
    }
    if let Ok(mut handles) = FOCUS_HANDLES.lock() {
        handles.retain(|key, _| !scope.contains(key));
    }
}
