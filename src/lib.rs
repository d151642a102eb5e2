//! # spark-tokenizer
//!
//! Tokenizer input components for reactive terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for focus state.
//!
//! ## Architecture
//!
//! Components are plain functions (or, for the stateful tokenizer, a small
//! handle) that turn props into an [`primitives::Element`] tree. Elements are
//! indices in the engine registry, so focus, keyboard routing and click
//! bubbling address them the same way across renders.
//!
//! ```text
//! Props → Element tree → renderer::Frame → terminal
//!           ↑                   │
//!           └── state (focus, keyboard, mouse) ← input events
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Colors, attributes, sizes, class lists, style overrides
//! - [`engine`] - Element index registry and parent context
//! - [`state`] - Focus, keyboard, mouse and crossterm input routing
//! - [`primitives`] - Token, TokenizerInput, MenuItem
//! - [`renderer`] - Single-line styled rendering with hit regions
//! - [`error`] - Crate error type

pub mod engine;
pub mod error;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{Error, Result};

pub use engine::{
    allocate_index, get_allocated_indices, get_current_parent_index, get_id, get_index,
    is_allocated, on_destroy, pop_parent_context, push_parent_context, release_index,
    reset_registry,
};

pub use primitives::{
    menu_item, option_label, token, Cleanup, Element, ElementKind, ItemFlags, LabelKey,
    MenuItemProps, TokenProps, TokenVariant, TokenizerInput, TokenizerInputProps,
    TokenizerState,
};

pub use renderer::{render, Frame, HitRegion};

pub use state::{
    // Focus
    blur, focus, focus_first, focus_last, focus_next, focus_previous, get_focusable_indices,
    get_focused_index, has_focus, is_focused, register_callbacks, reset_focus_state,
    FocusCallbacks, FocusEvent,
    // Keyboard
    dispatch_keyboard, last_event, last_key, on_focused, on_keyboard, reset_keyboard_state,
    KeyState, KeyboardEvent, Modifiers,
    // Mouse
    dispatch_click, ClickEvent, MouseAction, MouseButton, MouseEvent,
};

pub use state::input::{poll_event, route_event, InputEvent, Routed};
