//! Primitive types - Props, callbacks and cleanup.
//!
//! These types define the interface between components and their owner.
//! Every handler is optional; a missing handler is a no-op.

use std::fmt;
use std::rc::Rc;

use super::element::Element;
use super::label::LabelKey;
use crate::state::focus::FocusEvent;
use crate::state::keyboard::KeyboardEvent;
use crate::state::mouse::ClickEvent;
use crate::types::{Size, StyleOverrides};

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by registrations.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Token removal request (already bound to its entry).
pub type RemoveCallback = Rc<dyn Fn()>;

/// Click forwarded from a menu item.
pub type ClickCallback = Rc<dyn Fn(&ClickEvent)>;

/// Raw text change from the embedded field.
pub type ChangeCallback = Rc<dyn Fn(&str)>;

/// Focus or blur of the embedded field.
pub type FocusEventCallback = Rc<dyn Fn(&FocusEvent)>;

/// Key press forwarded from the embedded field.
pub type KeyDownCallback = Rc<dyn Fn(&KeyboardEvent)>;

/// Called with one selected entry (removal request).
pub type EntryCallback<T> = Rc<dyn Fn(&T)>;

/// Custom token renderer: entry, bound removal, position.
pub type RenderTokenFn<T> = Rc<dyn Fn(&T, RemoveCallback, usize) -> Element>;

/// Update observer: previous props, previous state, props, state.
pub type UpdateCallback<T> = Rc<
    dyn Fn(&TokenizerInputProps<T>, &TokenizerState, &TokenizerInputProps<T>, &TokenizerState),
>;

// =============================================================================
// Token Props
// =============================================================================

/// Properties for a single token.
#[derive(Clone, Default)]
pub struct TokenProps {
    /// Element index to render into. Allocated fresh when `None`.
    pub index: Option<usize>,
    /// Display content (the entry's label).
    pub content: String,
    /// Removal handler. Without one the token is read-only.
    pub on_remove: Option<RemoveCallback>,
    pub disabled: bool,
    pub selected: bool,
    /// Renders a read-only token as a link.
    pub href: Option<String>,
    pub class_name: Option<String>,
    pub styles: StyleOverrides,
    pub tab_index: i32,
    /// Forwarded onto the removable container.
    pub attrs: Vec<(String, String)>,
}

// =============================================================================
// Menu Item Props
// =============================================================================

/// Properties for a menu item.
#[derive(Clone, Default)]
pub struct MenuItemProps {
    /// Element index to render into. Allocated fresh when `None`.
    pub index: Option<usize>,
    pub content: String,
    pub active: bool,
    pub disabled: bool,
    pub class_name: Option<String>,
    pub styles: StyleOverrides,
    pub on_click: Option<ClickCallback>,
}

// =============================================================================
// Tokenizer Input Props & State
// =============================================================================

/// Local state of a tokenizer input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizerState {
    pub is_focused: bool,
}

/// Properties for the tokenizer input.
///
/// `selected` and `value` are owned by the caller; the component only
/// reads them and requests changes through the handlers.
///
/// # Example
///
/// ```ignore
/// let props = TokenizerInputProps {
///     selected: vec![json!({"id": 1, "label": "A"})],
///     placeholder: Some("Choose...".into()),
///     on_remove: Some(Rc::new(|entry: &Value| println!("remove {entry}"))),
///     ..Default::default()
/// };
/// ```
pub struct TokenizerInputProps<T> {
    /// Optional element ID of the container.
    pub id: Option<String>,
    pub selected: Vec<T>,
    pub value: String,
    pub label_key: LabelKey<T>,
    /// Shown only while nothing is selected.
    pub placeholder: Option<String>,
    pub disabled: bool,
    pub size: Size,
    /// Auxiliary content (e.g. a clear button) sits beside the control.
    pub has_aux: bool,
    pub styles: StyleOverrides,
    pub tab_index: i32,

    pub on_change: Option<ChangeCallback>,
    pub on_blur: Option<FocusEventCallback>,
    pub on_focus: Option<FocusEventCallback>,
    pub on_key_down: Option<KeyDownCallback>,
    pub on_remove: Option<EntryCallback<T>>,
    pub on_component_update: Option<UpdateCallback<T>>,
    /// Replaces the default token renderer.
    pub render_token: Option<RenderTokenFn<T>>,
}

impl<T> Default for TokenizerInputProps<T> {
    fn default() -> Self {
        Self {
            id: None,
            selected: Vec::new(),
            value: String::new(),
            label_key: LabelKey::default(),
            placeholder: None,
            disabled: false,
            size: Size::default(),
            has_aux: false,
            styles: StyleOverrides::default(),
            tab_index: 0,
            on_change: None,
            on_blur: None,
            on_focus: None,
            on_key_down: None,
            on_remove: None,
            on_component_update: None,
            render_token: None,
        }
    }
}

impl<T: Clone> Clone for TokenizerInputProps<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            selected: self.selected.clone(),
            value: self.value.clone(),
            label_key: self.label_key.clone(),
            placeholder: self.placeholder.clone(),
            disabled: self.disabled,
            size: self.size,
            has_aux: self.has_aux,
            styles: self.styles,
            tab_index: self.tab_index,
            on_change: self.on_change.clone(),
            on_blur: self.on_blur.clone(),
            on_focus: self.on_focus.clone(),
            on_key_down: self.on_key_down.clone(),
            on_remove: self.on_remove.clone(),
            on_component_update: self.on_component_update.clone(),
            render_token: self.render_token.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for TokenizerInputProps<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenizerInputProps")
            .field("id", &self.id)
            .field("selected", &self.selected)
            .field("value", &self.value)
            .field("label_key", &self.label_key)
            .field("placeholder", &self.placeholder)
            .field("disabled", &self.disabled)
            .field("size", &self.size)
            .field("has_aux", &self.has_aux)
            .field("tab_index", &self.tab_index)
            .finish_non_exhaustive()
    }
}
