//! Tokenizer Input - Selected values as tokens plus an embedded text field.
//!
//! The component owns exactly one piece of state: whether the control is
//! focused. Everything else (the selected entries, the text value) belongs
//! to the owner and arrives through props; the component only asks for
//! changes through the owner's handlers.
//!
//! # Interaction
//!
//! - A click anywhere in the container, or focus landing on the container
//!   itself, moves focus into the text field and marks the control focused.
//!   While disabled this instead blurs whatever received the event.
//! - Blur of the text field marks the control unfocused and is always
//!   forwarded to `on_blur`.
//! - Backspace in an empty, focused text field moves focus to the last
//!   token and prevents the key's default action. Every key press is then
//!   forwarded to `on_key_down`.
//! - A key whose default action is not prevented edits the text and the
//!   result goes to `on_change`. The displayed text never changes until
//!   the owner passes a new `value`.
//!
//! # Example
//!
//! ```ignore
//! use spark_tokenizer::primitives::{TokenizerInput, TokenizerInputProps};
//!
//! let tokenizer = TokenizerInput::new(TokenizerInputProps {
//!     selected: vec![json!({"id": 1, "label": "A"})],
//!     on_remove: Some(Rc::new(|entry: &Value| println!("remove {entry}"))),
//!     ..Default::default()
//! });
//!
//! let tree = tokenizer.render()?;
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::Serialize;
use spark_signals::{signal, Signal};

use crate::engine::{
    allocate_index, pop_parent_context, push_parent_context, release_index, set_focusable,
    set_tab_index,
};
use crate::error::Result;
use crate::state::focus::{self, FocusCallbacks, FocusEvent};
use crate::state::keyboard::{self, KeyboardEvent};
use crate::state::mouse::{dispatch_click, ClickEvent};
use crate::types::ClassList;
use super::element::{Element, ElementKind};
use super::label::option_label;
use super::text_field;
use super::token::token;
use super::types::{Cleanup, RemoveCallback, TokenProps, TokenizerInputProps, TokenizerState};

// =============================================================================
// Component
// =============================================================================

/// Handle to a mounted tokenizer input.
///
/// Cloning the handle shares the component.
pub struct TokenizerInput<T: 'static> {
    inner: Rc<Inner<T>>,
}

impl<T: 'static> Clone for TokenizerInput<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

struct Inner<T: 'static> {
    props: RefCell<TokenizerInputProps<T>>,
    is_focused: Signal<bool>,
    container: usize,
    input: usize,
    /// Element index per token position, reused across renders.
    token_slots: RefCell<Vec<usize>>,
    /// Focus target of each rendered token, in display order.
    focus_targets: RefCell<Vec<usize>>,
    registrations: RefCell<Vec<Cleanup>>,
}

impl<T: Clone + Serialize + 'static> TokenizerInput<T> {
    /// Mount a tokenizer input: allocates the container and text field
    /// and registers their focus and keyboard handlers.
    pub fn new(props: TokenizerInputProps<T>) -> Self {
        let container = allocate_index(props.id.as_deref());
        set_focusable(container, true);
        set_tab_index(container, -1);

        push_parent_context(container);
        let input = allocate_index(None);
        pop_parent_context();
        set_focusable(input, !props.disabled);
        set_tab_index(input, props.tab_index);

        let inner = Rc::new(Inner {
            props: RefCell::new(props),
            is_focused: signal(false),
            container,
            input,
            token_slots: RefCell::new(Vec::new()),
            focus_targets: RefCell::new(Vec::new()),
            registrations: RefCell::new(Vec::new()),
        });
        Inner::register(&inner);

        tracing::debug!(container, input, "tokenizer input mounted");
        Self { inner }
    }

    /// Render the current props and state to an element tree.
    pub fn render(&self) -> Result<Element> {
        Inner::render(&self.inner)
    }

    /// Replace the props. Notifies the update observer.
    pub fn set_props(&self, props: TokenizerInputProps<T>) {
        self.inner.set_props(props);
    }

    /// Snapshot of the current props.
    pub fn props(&self) -> TokenizerInputProps<T> {
        self.inner.props.borrow().clone()
    }

    /// Current local state.
    pub fn state(&self) -> TokenizerState {
        self.inner.state()
    }

    pub fn is_focused(&self) -> bool {
        self.inner.is_focused.get()
    }

    /// Same action as clicking the control.
    pub fn focus(&self) {
        self.inner.handle_input_focus(None);
    }

    /// Blur the text field directly.
    pub fn blur(&self) {
        focus::blur_index(self.inner.input);
    }

    /// Index of the container element.
    pub fn container_index(&self) -> usize {
        self.inner.container
    }

    /// Index of the embedded text field.
    pub fn input_index(&self) -> usize {
        self.inner.input
    }

    /// Focus targets of the tokens from the last render, in order.
    pub fn focus_targets(&self) -> Vec<usize> {
        self.inner.focus_targets.borrow().clone()
    }

    /// Render and dispatch a click on `target`.
    pub fn click(&self, target: usize) -> Result<ClickEvent> {
        let tree = self.render()?;
        Ok(dispatch_click(&tree, target, None))
    }

    /// Handle a key press as if it arrived at the text field.
    pub fn key_down(&self, event: &KeyboardEvent) {
        self.inner.handle_key_down(event);
    }

    /// Report raw text from the text field.
    pub fn change(&self, text: &str) {
        self.inner.handle_change(text);
    }

    /// Unregister handlers and release every element index.
    pub fn unmount(self) {
        for cleanup in self.inner.registrations.borrow_mut().drain(..) {
            cleanup();
        }
        for slot in self.inner.token_slots.borrow_mut().drain(..) {
            release_slot(slot);
        }
        self.inner.focus_targets.borrow_mut().clear();
        focus::cleanup_index(self.inner.input);
        focus::cleanup_index(self.inner.container);
        release_index(self.inner.container);
        tracing::debug!(container = self.inner.container, "tokenizer input unmounted");
    }
}

fn release_slot(index: usize) {
    focus::cleanup_index(index);
    keyboard::cleanup_index(index);
    release_index(index);
}

impl<T: Clone + Serialize + 'static> Inner<T> {
    fn register(this: &Rc<Self>) {
        let weak = Rc::downgrade(this);
        let container_focus = {
            let weak = weak.clone();
            focus::register_callbacks(this.container, FocusCallbacks {
                on_focus: Some(Rc::new(move |event: &FocusEvent| {
                    if let Some(inner) = weak.upgrade() {
                        inner.handle_input_focus(Some(event.target));
                    }
                })),
                on_blur: None,
            })
        };

        let input_focus = {
            let on_focus_weak = weak.clone();
            let on_blur_weak = weak.clone();
            focus::register_callbacks(this.input, FocusCallbacks {
                on_focus: Some(Rc::new(move |event: &FocusEvent| {
                    if let Some(inner) = on_focus_weak.upgrade() {
                        let on_focus = inner.props.borrow().on_focus.clone();
                        if let Some(on_focus) = on_focus {
                            on_focus(event);
                        }
                    }
                })),
                on_blur: Some(Rc::new(move |event: &FocusEvent| {
                    if let Some(inner) = on_blur_weak.upgrade() {
                        inner.handle_blur(event);
                    }
                })),
            })
        };

        let input_keys = {
            let weak = weak.clone();
            keyboard::on_focused(this.input, move |event: &KeyboardEvent| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_key_down(event);
                }
                false
            })
        };

        this.registrations.borrow_mut().extend([
            Box::new(container_focus) as Cleanup,
            Box::new(input_focus) as Cleanup,
            Box::new(input_keys) as Cleanup,
        ]);
    }

    fn state(&self) -> TokenizerState {
        TokenizerState { is_focused: self.is_focused.get() }
    }

    // =========================================================================
    // Updates
    // =========================================================================

    fn set_props(&self, props: TokenizerInputProps<T>) {
        set_focusable(self.input, !props.disabled);
        set_tab_index(self.input, props.tab_index);
        let prev_state = self.state();
        let prev_props = self.props.replace(props);
        self.notify_update(&prev_props, &prev_state);
    }

    fn set_focused(&self, focused: bool) {
        let prev_state = self.state();
        self.is_focused.set(focused);
        tracing::debug!(container = self.container, focused, "tokenizer focus state");
        let props = self.props.borrow().clone();
        self.notify_update(&props, &prev_state);
    }

    fn notify_update(&self, prev_props: &TokenizerInputProps<T>, prev_state: &TokenizerState) {
        let props = self.props.borrow().clone();
        if let Some(on_update) = props.on_component_update.clone() {
            on_update(prev_props, prev_state, &props, &self.state());
        }
    }

    // =========================================================================
    // Event Handlers
    // =========================================================================

    /// Focus intent from a click, a focus event on the container, or
    /// the public `focus()`.
    fn handle_input_focus(&self, target: Option<usize>) {
        if self.props.borrow().disabled {
            if let Some(target) = target {
                focus::blur_index(target);
            }
            return;
        }

        focus::focus(self.input);
        self.set_focused(true);
    }

    fn handle_blur(&self, event: &FocusEvent) {
        self.set_focused(false);
        let on_blur = self.props.borrow().on_blur.clone();
        if let Some(on_blur) = on_blur {
            on_blur(event);
        }
    }

    fn handle_change(&self, text: &str) {
        let on_change = self.props.borrow().on_change.clone();
        if let Some(on_change) = on_change {
            on_change(text);
        }
    }

    fn handle_key_down(&self, event: &KeyboardEvent) {
        let (value, on_key_down) = {
            let props = self.props.borrow();
            (props.value.clone(), props.on_key_down.clone())
        };

        if event.key == "Backspace" && value.is_empty() && focus::is_focused(self.input) {
            if let Some(target) = self.preceding_focus_target() {
                tracing::debug!(token = target, "backspace on empty field, focusing last token");
                focus::focus(target);
                event.prevent_default();
            }
        }

        if let Some(on_key_down) = on_key_down {
            on_key_down(event);
        }

        if !event.is_default_prevented() {
            if let Some(next) = text_field::default_edit(&value, event) {
                self.handle_change(&next);
            }
        }
    }

    /// The token rendered immediately before the text field.
    fn preceding_focus_target(&self) -> Option<usize> {
        self.focus_targets.borrow().last().copied()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn render(this: &Rc<Self>) -> Result<Element> {
        let props = this.props.borrow().clone();
        let focused = this.is_focused.get();

        // Resolve labels first so a bad label key fails before any
        // registry changes.
        let labels = match props.render_token {
            Some(_) => Vec::new(),
            None => props
                .selected
                .iter()
                .map(|entry| option_label(entry, &props.label_key))
                .collect::<Result<Vec<_>>>()?,
        };

        push_parent_context(this.container);
        let tokens: Vec<Element> = props
            .selected
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                let on_remove = bind_remove(&props, entry);
                match &props.render_token {
                    Some(render_token) => render_token(entry, on_remove, position),
                    None => token(TokenProps {
                        index: Some(this.slot(position)),
                        content: labels[position].clone(),
                        on_remove: Some(on_remove),
                        disabled: props.disabled,
                        styles: props.styles,
                        tab_index: props.tab_index,
                        ..Default::default()
                    }),
                }
            })
            .collect();
        pop_parent_context();

        let rendered: Vec<usize> = tokens.iter().map(|t| t.index).collect();
        if props.render_token.is_some() {
            this.adopt_slots(&rendered);
        } else {
            this.trim_slots(rendered.len());
        }
        *this.focus_targets.borrow_mut() = rendered;

        let placeholder = if props.selected.is_empty() {
            props.placeholder.clone()
        } else {
            None
        };
        let field = Element::new(this.input, ElementKind::TextField {
            width: text_field::field_width(&props.value, placeholder.as_deref()),
            value: props.value.clone(),
            placeholder,
        })
        .classes(ClassList::new(&["bootstrap-tokenizer-input"]))
        .style(props.styles.input)
        .tab_index(props.tab_index)
        .disabled(props.disabled);

        let mut classes = ClassList::new(&["bootstrap-tokenizer", "clearfix", "form-control"])
            .with("focus", focused)
            .with("has-aux", props.has_aux);
        if let Some(size_class) = props.size.class() {
            classes.push(size_class);
        }

        let weak: Weak<Self> = Rc::downgrade(this);
        Ok(Element::new(this.container, ElementKind::Container)
            .classes(classes)
            .style(props.styles.tokenizer)
            .tab_index(-1)
            .disabled(props.disabled)
            .children(tokens)
            .child(field)
            .on_click(move |event: &ClickEvent| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_input_focus(Some(event.target));
                }
            }))
    }

    /// Element index for the token at `position`, allocating on first use.
    fn slot(&self, position: usize) -> usize {
        let mut slots = self.token_slots.borrow_mut();
        if let Some(&index) = slots.get(position) {
            return index;
        }
        let index = allocate_index(None);
        slots.push(index);
        index
    }

    /// Take over the indices a custom token renderer produced this pass.
    ///
    /// Renderers may key indices by entry, so an index can move between
    /// positions; only indices no longer rendered anywhere are released.
    fn adopt_slots(&self, rendered: &[usize]) {
        let previous = self.token_slots.replace(rendered.to_vec());
        for index in previous {
            if !rendered.contains(&index) {
                release_slot(index);
            }
        }
    }

    /// Release slots past the rendered token count.
    fn trim_slots(&self, len: usize) {
        let stale: Vec<usize> = {
            let mut slots = self.token_slots.borrow_mut();
            if slots.len() <= len {
                return;
            }
            slots.drain(len..).collect()
        };
        for index in stale {
            release_slot(index);
        }
    }
}

/// Removal callback for one entry, closed over a clone of it.
fn bind_remove<T: Clone + 'static>(props: &TokenizerInputProps<T>, entry: &T) -> RemoveCallback {
    let on_remove = props.on_remove.clone();
    let entry = entry.clone();
    Rc::new(move || {
        if let Some(on_remove) = &on_remove {
            on_remove(&entry);
        }
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{get_focusable, is_allocated, reset_registry};
    use crate::error::Error;
    use crate::primitives::label::LabelKey;
    use crate::types::Size;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use std::cell::Cell;

    fn setup() {
        reset_registry();
        focus::reset_focus_state();
        keyboard::reset_keyboard_state();
    }

    fn entries() -> Vec<Value> {
        vec![json!({"id": 1, "label": "A"}), json!({"id": 2, "label": "B"})]
    }

    /// Owner stand-in recording every callback.
    #[derive(Default)]
    struct Owner {
        removed: RefCell<Vec<Value>>,
        changes: RefCell<Vec<String>>,
        keys: RefCell<Vec<(String, bool)>>,
        blurs: Cell<u32>,
        focuses: Cell<u32>,
        updates: RefCell<Vec<(TokenizerState, TokenizerState)>>,
    }

    fn props(owner: &Rc<Owner>, selected: Vec<Value>, value: &str) -> TokenizerInputProps<Value> {
        let (o1, o2, o3, o4, o5, o6) =
            (owner.clone(), owner.clone(), owner.clone(), owner.clone(), owner.clone(), owner.clone());
        TokenizerInputProps {
            selected,
            value: value.to_string(),
            placeholder: Some("Choose...".into()),
            on_remove: Some(Rc::new(move |entry: &Value| o1.removed.borrow_mut().push(entry.clone()))),
            on_change: Some(Rc::new(move |text: &str| o2.changes.borrow_mut().push(text.to_string()))),
            on_key_down: Some(Rc::new(move |event: &KeyboardEvent| {
                o3.keys.borrow_mut().push((event.key.clone(), event.is_default_prevented()))
            })),
            on_blur: Some(Rc::new(move |_: &FocusEvent| o4.blurs.set(o4.blurs.get() + 1))),
            on_focus: Some(Rc::new(move |_: &FocusEvent| o5.focuses.set(o5.focuses.get() + 1))),
            on_component_update: Some(Rc::new(
                move |_: &TokenizerInputProps<Value>, prev: &TokenizerState, _: &TokenizerInputProps<Value>, next: &TokenizerState| {
                    o6.updates.borrow_mut().push((*prev, *next))
                },
            )),
            ..Default::default()
        }
    }

    fn token_labels(tree: &Element) -> Vec<String> {
        tree.find_by_class("token")
            .iter()
            .map(|t| t.text.clone().unwrap_or_default())
            .collect()
    }

    fn close_button(tree: &Element, position: usize) -> usize {
        tree.find_by_class("token")[position].children[0].index
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    #[test]
    fn test_renders_tokens_in_order() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, entries(), ""));
        let tree = tokenizer.render().unwrap();

        assert_eq!(token_labels(&tree), vec!["A", "B"]);
        assert_eq!(tree.children.last().map(|e| e.index), Some(tokenizer.input_index()));
        assert_eq!(tokenizer.focus_targets().len(), 2);
    }

    #[test]
    fn test_container_classes() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(TokenizerInputProps {
            size: Size::Large,
            has_aux: true,
            ..props(&owner, vec![], "")
        });
        let tree = tokenizer.render().unwrap();

        for class in ["bootstrap-tokenizer", "clearfix", "form-control", "has-aux", "input-lg"] {
            assert!(tree.classes.contains(class), "missing {class}");
        }
        assert!(!tree.classes.contains("focus"));
        assert_eq!(tree.tab_index, Some(-1));

        tokenizer.focus();
        assert!(tokenizer.render().unwrap().classes.contains("focus"));
    }

    #[test]
    fn test_placeholder_only_when_empty() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, vec![], ""));
        let placeholder_of = |tree: &Element| match &tree.children.last().unwrap().kind {
            ElementKind::TextField { placeholder, .. } => placeholder.clone(),
            other => panic!("expected text field, got {other:?}"),
        };

        assert_eq!(placeholder_of(&tokenizer.render().unwrap()).as_deref(), Some("Choose..."));
        tokenizer.set_props(props(&owner, entries(), ""));
        assert_eq!(placeholder_of(&tokenizer.render().unwrap()), None);
    }

    #[test]
    fn test_label_key_field_and_missing_label() {
        setup();
        let owner = Rc::new(Owner::default());
        let selected = vec![json!({"id": 1, "name": "Ann"})];
        let tokenizer = TokenizerInput::new(TokenizerInputProps {
            label_key: LabelKey::field("name"),
            ..props(&owner, selected.clone(), "")
        });
        assert_eq!(token_labels(&tokenizer.render().unwrap()), vec!["Ann"]);

        tokenizer.set_props(props(&owner, selected, ""));
        assert!(matches!(tokenizer.render(), Err(Error::MissingLabel { .. })));
    }

    #[test]
    fn test_token_slots_are_stable_and_released() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, entries(), ""));
        tokenizer.render().unwrap();
        let first = tokenizer.focus_targets();

        tokenizer.render().unwrap();
        assert_eq!(tokenizer.focus_targets(), first);

        tokenizer.set_props(props(&owner, vec![json!({"id": 1, "label": "A"})], ""));
        tokenizer.render().unwrap();
        assert_eq!(tokenizer.focus_targets(), vec![first[0]]);
        assert!(!is_allocated(first[1]));
    }

    #[test]
    fn test_custom_token_renderer() {
        setup();
        let owner = Rc::new(Owner::default());
        let positions = Rc::new(RefCell::new(Vec::new()));
        let positions_clone = positions.clone();
        let tokenizer = TokenizerInput::new(TokenizerInputProps {
            render_token: Some(Rc::new(move |entry: &Value, on_remove: RemoveCallback, position: usize| {
                positions_clone.borrow_mut().push(position);
                let index = allocate_index(Some(format!("custom-{}", entry["id"]).as_str()));
                Element::new(index, ElementKind::Container)
                    .text(entry["label"].as_str().unwrap_or_default())
                    .on_click(move |_: &ClickEvent| on_remove())
            })),
            ..props(&owner, entries(), "")
        });

        let tree = tokenizer.render().unwrap();
        assert_eq!(*positions.borrow(), vec![0, 1]);
        assert!(tree.find_by_class("token").is_empty());

        let custom_b = tokenizer.focus_targets()[1];
        tokenizer.click(custom_b).unwrap();
        assert_eq!(*owner.removed.borrow(), vec![json!({"id": 2, "label": "B"})]);
    }

    /// Props whose custom renderer keys element indices by entry id.
    fn keyed_props(owner: &Rc<Owner>, selected: Vec<Value>) -> TokenizerInputProps<Value> {
        TokenizerInputProps {
            render_token: Some(Rc::new(|entry: &Value, _: RemoveCallback, _: usize| {
                let index = allocate_index(Some(format!("keyed-{}", entry["id"]).as_str()));
                set_focusable(index, true);
                Element::new(index, ElementKind::Container).text(entry["label"].as_str().unwrap_or_default())
            })),
            ..props(owner, selected, "")
        }
    }

    #[test]
    fn test_custom_keyed_indices_survive_removing_first_entry() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(keyed_props(&owner, entries()));
        tokenizer.render().unwrap();
        let before = tokenizer.focus_targets();

        tokenizer.set_props(keyed_props(&owner, vec![json!({"id": 2, "label": "B"})]));
        let tree = tokenizer.render().unwrap();
        let targets = tokenizer.focus_targets();

        assert_eq!(targets, vec![before[1]]);
        assert_eq!(tree.children[0].index, before[1]);
        assert!(is_allocated(targets[0]));
        assert!(!is_allocated(before[0]));

        tokenizer.focus();
        let mut event = KeyboardEvent::new("Backspace");
        keyboard::dispatch(&mut event);
        assert!(focus::is_focused(targets[0]));
        assert!(event.is_default_prevented());
    }

    #[test]
    fn test_custom_keyed_indices_survive_reorder() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(keyed_props(&owner, entries()));
        tokenizer.render().unwrap();
        let before = tokenizer.focus_targets();

        let reversed: Vec<Value> = entries().into_iter().rev().collect();
        tokenizer.set_props(keyed_props(&owner, reversed));
        tokenizer.render().unwrap();

        assert_eq!(tokenizer.focus_targets(), vec![before[1], before[0]]);
        assert!(before.iter().all(|&index| is_allocated(index)));
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    #[test]
    fn test_close_click_removes_exactly_that_entry() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, entries(), ""));
        let tree = tokenizer.render().unwrap();

        dispatch_click(&tree, close_button(&tree, 1), None);
        assert_eq!(*owner.removed.borrow(), vec![json!({"id": 2, "label": "B"})]);
    }

    #[test]
    fn test_duplicate_labels_remove_distinct_entries() {
        setup();
        let owner = Rc::new(Owner::default());
        let selected = vec![json!({"id": 1, "label": "Same"}), json!({"id": 2, "label": "Same"})];
        let tokenizer = TokenizerInput::new(props(&owner, selected, ""));
        let tree = tokenizer.render().unwrap();

        dispatch_click(&tree, close_button(&tree, 0), None);
        assert_eq!(*owner.removed.borrow(), vec![json!({"id": 1, "label": "Same"})]);
    }

    #[test]
    fn test_disabled_tokens_have_no_close_affordance() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(TokenizerInputProps { disabled: true, ..props(&owner, entries(), "") });
        let tree = tokenizer.render().unwrap();

        assert!(tree.find_by_class("close-button").is_empty());
        assert_eq!(tree.find_by_class("token-disabled").len(), 2);
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    #[test]
    fn test_click_focuses_field() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, entries(), ""));
        assert!(!tokenizer.is_focused());

        let token_a = tokenizer.render().unwrap().find_by_class("token")[0].index;
        tokenizer.click(token_a).unwrap();

        assert!(tokenizer.is_focused());
        assert!(focus::is_focused(tokenizer.input_index()));
        assert_eq!(owner.focuses.get(), 1);
    }

    #[test]
    fn test_container_focus_event_redirects_to_field() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, vec![], ""));

        assert!(focus::focus(tokenizer.container_index()));
        assert!(focus::is_focused(tokenizer.input_index()));
        assert!(tokenizer.is_focused());
    }

    #[test]
    fn test_disabled_click_does_not_focus() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(TokenizerInputProps { disabled: true, ..props(&owner, vec![], "") });

        tokenizer.click(tokenizer.container_index()).unwrap();
        assert!(!tokenizer.is_focused());
        assert!(!focus::has_focus());
        assert!(!get_focusable(tokenizer.input_index()));

        // Focus arriving at the container is thrown back
        focus::focus(tokenizer.container_index());
        assert!(!focus::has_focus());
        assert!(!tokenizer.is_focused());
    }

    #[test]
    fn test_disabled_click_blurs_focused_token() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, entries(), ""));
        tokenizer.render().unwrap();
        let token_a = tokenizer.focus_targets()[0];
        assert!(focus::focus(token_a));

        tokenizer.set_props(TokenizerInputProps { disabled: true, ..props(&owner, entries(), "") });
        tokenizer.click(token_a).unwrap();

        assert!(!focus::has_focus());
        assert!(!tokenizer.is_focused());
    }

    #[test]
    fn test_blur_clears_state_and_forwards() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, vec![], ""));

        tokenizer.focus();
        assert!(tokenizer.is_focused());
        tokenizer.blur();

        assert!(!tokenizer.is_focused());
        assert!(!focus::has_focus());
        assert_eq!(owner.blurs.get(), 1);
    }

    #[test]
    fn test_blur_forwarded_after_becoming_disabled() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, vec![], ""));
        tokenizer.focus();

        tokenizer.set_props(TokenizerInputProps { disabled: true, ..props(&owner, vec![], "") });
        focus::blur();

        assert!(!tokenizer.is_focused());
        assert_eq!(owner.blurs.get(), 1);
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    #[test]
    fn test_backspace_on_empty_focuses_last_token() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, entries(), ""));
        tokenizer.render().unwrap();
        tokenizer.focus();

        let mut event = KeyboardEvent::new("Backspace");
        keyboard::dispatch(&mut event);

        let last = *tokenizer.focus_targets().last().unwrap();
        assert!(focus::is_focused(last));
        assert!(event.is_default_prevented());
        assert!(!tokenizer.is_focused());
        assert_eq!(owner.blurs.get(), 1);
        assert_eq!(*owner.keys.borrow(), vec![("Backspace".to_string(), true)]);
        assert!(owner.changes.borrow().is_empty());
    }

    #[test]
    fn test_backspace_without_tokens_keeps_default() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, vec![], ""));
        tokenizer.render().unwrap();
        tokenizer.focus();

        let mut event = KeyboardEvent::new("Backspace");
        keyboard::dispatch(&mut event);

        assert!(!event.is_default_prevented());
        assert!(focus::is_focused(tokenizer.input_index()));
        assert_eq!(owner.keys.borrow().len(), 1);
    }

    #[test]
    fn test_backspace_with_text_edits_instead() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, entries(), "abc"));
        tokenizer.render().unwrap();
        tokenizer.focus();

        let mut event = KeyboardEvent::new("Backspace");
        keyboard::dispatch(&mut event);

        assert!(!event.is_default_prevented());
        assert!(focus::is_focused(tokenizer.input_index()));
        assert_eq!(*owner.changes.borrow(), vec!["ab".to_string()]);
    }

    #[test]
    fn test_backspace_ignored_when_field_not_focused() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, entries(), ""));
        tokenizer.render().unwrap();

        let event = KeyboardEvent::new("Backspace");
        tokenizer.key_down(&event);

        assert!(!event.is_default_prevented());
        assert!(!focus::has_focus());
        assert_eq!(owner.keys.borrow().len(), 1);
    }

    #[test]
    fn test_every_key_forwarded_once() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, vec![], ""));
        tokenizer.render().unwrap();
        tokenizer.focus();

        for key in ["a", "Enter", "ArrowDown", "Escape"] {
            keyboard::dispatch(&mut KeyboardEvent::new(key));
        }
        let keys: Vec<String> = owner.keys.borrow().iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["a", "Enter", "ArrowDown", "Escape"]);
    }

    #[test]
    fn test_typing_requests_change_without_applying_it() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, vec![], "ab"));
        tokenizer.focus();

        keyboard::dispatch(&mut KeyboardEvent::new("c"));
        assert_eq!(*owner.changes.borrow(), vec!["abc".to_string()]);
        assert_eq!(tokenizer.props().value, "ab");
    }

    #[test]
    fn test_owner_can_prevent_default_edit() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(TokenizerInputProps {
            on_key_down: Some(Rc::new(|event: &KeyboardEvent| event.prevent_default())),
            ..props(&owner, vec![], "")
        });
        tokenizer.focus();

        keyboard::dispatch(&mut KeyboardEvent::new("x"));
        assert!(owner.changes.borrow().is_empty());
    }

    #[test]
    fn test_change_forwards_raw_text() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, vec![], ""));
        tokenizer.change("hello");
        assert_eq!(*owner.changes.borrow(), vec!["hello".to_string()]);
    }

    // -------------------------------------------------------------------------
    // Update observer
    // -------------------------------------------------------------------------

    #[test]
    fn test_update_observer_sees_state_and_props_changes() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, vec![], ""));

        tokenizer.focus();
        tokenizer.set_props(props(&owner, entries(), ""));
        tokenizer.blur();

        let focused = TokenizerState { is_focused: true };
        let unfocused = TokenizerState { is_focused: false };
        assert_eq!(
            *owner.updates.borrow(),
            vec![(unfocused, focused), (focused, focused), (focused, unfocused)]
        );
    }

    #[test]
    fn test_unmount_releases_everything() {
        setup();
        let owner = Rc::new(Owner::default());
        let tokenizer = TokenizerInput::new(props(&owner, entries(), ""));
        tokenizer.render().unwrap();
        tokenizer.focus();
        let input = tokenizer.input_index();

        tokenizer.unmount();
        assert!(crate::engine::get_allocated_indices().is_empty());
        assert!(!focus::has_focus());

        keyboard::dispatch(&mut KeyboardEvent::new("a"));
        assert!(owner.changes.borrow().is_empty());
        assert!(!is_allocated(input));
    }

    proptest! {
        #[test]
        fn prop_token_count_matches_selection(labels in proptest::collection::vec("[a-z]{1,8}", 0..12)) {
            setup();
            let owner = Rc::new(Owner::default());
            let selected: Vec<Value> = labels.iter().map(|l| json!({"label": l})).collect();
            let tokenizer = TokenizerInput::new(props(&owner, selected, ""));
            let tree = tokenizer.render().unwrap();

            prop_assert_eq!(token_labels(&tree), labels.clone());
            prop_assert_eq!(tokenizer.focus_targets().len(), labels.len());
            tokenizer.unmount();
        }
    }
}
