//! State Module - Runtime state management systems
//!
//! - **Focus** - Focused element, Tab cycling, focus/blur callbacks
//! - **Keyboard** - Event types, dispatch, handler registry
//! - **Mouse** - Mouse events, click bubbling through element trees
//! - **Input** - crossterm event conversion and routing

pub mod focus;
pub mod keyboard;
pub mod mouse;
pub mod input;

pub use focus::{
    blur, blur_index, focus, focus_first, focus_last, focus_next, focus_previous,
    get_focusable_indices, get_focused_index, has_focus, is_focused, register_callbacks,
    reset_focus_state, FocusCallbacks, FocusEvent, FocusHandler,
};
pub use keyboard::{
    dispatch as dispatch_keyboard, last_event, last_key, on as on_keyboard, on_focused,
    reset_keyboard_state, KeyHandler, KeyState, KeyboardEvent, Modifiers,
};
pub use mouse::{dispatch_click, ClickEvent, MouseAction, MouseButton, MouseEvent};
