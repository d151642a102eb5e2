//! Focus System - Focused element and focus navigation
//!
//! Manages focus state and navigation:
//! - `focused_index` signal (currently focused element)
//! - Focus cycling (Tab/Shift+Tab) over focusable elements
//! - Focus callbacks (on_focus/on_blur) carrying a [`FocusEvent`]
//!
//! # Example
//!
//! ```ignore
//! use spark_tokenizer::state::focus;
//!
//! focus::focus(field_index);
//! focus::focus_previous();
//!
//! let cleanup = focus::register_callbacks(index, FocusCallbacks {
//!     on_blur: Some(Rc::new(|event| println!("{} blurred", event.target))),
//!     ..Default::default()
//! });
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::engine::{get_allocated_indices, get_focusable, get_tab_index, is_allocated};

// =============================================================================
// FOCUSED INDEX SIGNAL
// =============================================================================

thread_local! {
    static FOCUSED_INDEX: Signal<i32> = signal(-1);
}

/// Get the currently focused element index (-1 if none)
pub fn get_focused_index() -> i32 {
    FOCUSED_INDEX.with(|s| s.get())
}

/// Check if any element is focused
pub fn has_focus() -> bool {
    get_focused_index() >= 0
}

/// Check if specific element is focused
pub fn is_focused(index: usize) -> bool {
    get_focused_index() == index as i32
}

// =============================================================================
// FOCUS EVENTS & CALLBACKS
// =============================================================================

/// Focus or blur notification for one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusEvent {
    /// Element gaining (focus) or losing (blur) focus.
    pub target: usize,
    /// The other side of the transition, if any.
    pub related: Option<usize>,
}

pub type FocusHandler = Rc<dyn Fn(&FocusEvent)>;

/// Callbacks fired when focus changes
#[derive(Default)]
pub struct FocusCallbacks {
    pub on_focus: Option<FocusHandler>,
    pub on_blur: Option<FocusHandler>,
}

struct CallbackRegistry {
    by_index: HashMap<usize, Vec<(usize, FocusCallbacks)>>,
    next_id: usize,
}

thread_local! {
    static FOCUS_CALLBACK_REGISTRY: RefCell<CallbackRegistry> = RefCell::new(CallbackRegistry {
        by_index: HashMap::new(),
        next_id: 0,
    });
}

/// Register focus callbacks for an element.
/// Returns cleanup function to unregister.
pub fn register_callbacks(index: usize, callbacks: FocusCallbacks) -> impl FnOnce() {
    let id = FOCUS_CALLBACK_REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.by_index.entry(index).or_default().push((id, callbacks));
        id
    });

    move || {
        FOCUS_CALLBACK_REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(list) = reg.by_index.get_mut(&index) {
                list.retain(|(callback_id, _)| *callback_id != id);
                if list.is_empty() {
                    reg.by_index.remove(&index);
                }
            }
        });
    }
}

/// Snapshot handlers so callbacks may re-enter the focus API.
fn collect_handlers(index: usize, pick: fn(&FocusCallbacks) -> Option<FocusHandler>) -> Vec<FocusHandler> {
    FOCUS_CALLBACK_REGISTRY.with(|reg| {
        reg.borrow()
            .by_index
            .get(&index)
            .map(|list| list.iter().filter_map(|(_, cb)| pick(cb)).collect())
            .unwrap_or_default()
    })
}

/// Internal: Set focus and fire callbacks at the source
fn set_focus_with_callbacks(new_index: i32) {
    let old_index = get_focused_index();

    if old_index == new_index {
        return;
    }

    let related_of = |i: i32| (i >= 0).then_some(i as usize);
    tracing::trace!(from = old_index, to = new_index, "focus transition");

    FOCUSED_INDEX.with(|s| s.set(new_index));

    if old_index >= 0 {
        let event = FocusEvent { target: old_index as usize, related: related_of(new_index) };
        for on_blur in collect_handlers(event.target, |cb| cb.on_blur.clone()) {
            on_blur(&event);
        }
    }

    // A blur handler may already have moved focus elsewhere.
    if new_index >= 0 && get_focused_index() == new_index {
        let event = FocusEvent { target: new_index as usize, related: related_of(old_index) };
        for on_focus in collect_handlers(event.target, |cb| cb.on_focus.clone()) {
            on_focus(&event);
        }
    }
}

// =============================================================================
// FOCUSABLE QUERIES
// =============================================================================

/// Get all Tab-reachable element indices, sorted by tab index.
///
/// Elements with a negative tab index are focusable programmatically
/// but skipped by Tab navigation.
pub fn get_focusable_indices() -> Vec<usize> {
    let mut result: Vec<usize> = get_allocated_indices()
        .into_iter()
        .filter(|&i| get_focusable(i) && get_tab_index(i) >= 0)
        .collect();

    // Same tab index keeps allocation order
    result.sort_by(|&a, &b| get_tab_index(a).cmp(&get_tab_index(b)).then(a.cmp(&b)));
    result
}

// =============================================================================
// FOCUS NAVIGATION
// =============================================================================

/// Find next focusable element
fn find_next_focusable(from_index: i32, direction: i32) -> i32 {
    let focusables = get_focusable_indices();
    if focusables.is_empty() {
        return -1;
    }

    let current_pos = if from_index >= 0 {
        focusables.iter().position(|&i| i == from_index as usize)
    } else {
        None
    };

    match current_pos {
        None => {
            if direction == 1 {
                focusables[0] as i32
            } else {
                focusables[focusables.len() - 1] as i32
            }
        }
        Some(pos) => {
            let len = focusables.len() as i32;
            let next_pos = ((pos as i32 + direction) % len + len) % len;
            focusables[next_pos as usize] as i32
        }
    }
}

/// Move focus to next focusable element
pub fn focus_next() -> bool {
    let current = get_focused_index();
    let next = find_next_focusable(current, 1);
    if next != -1 && next != current {
        set_focus_with_callbacks(next);
        return true;
    }
    false
}

/// Move focus to previous focusable element
pub fn focus_previous() -> bool {
    let current = get_focused_index();
    let prev = find_next_focusable(current, -1);
    if prev != -1 && prev != current {
        set_focus_with_callbacks(prev);
        return true;
    }
    false
}

/// Focus a specific element by index.
///
/// Returns false if the element is not allocated or not focusable.
pub fn focus(index: usize) -> bool {
    if is_allocated(index) && get_focusable(index) {
        set_focus_with_callbacks(index as i32);
        return true;
    }
    false
}

/// Clear focus (no element focused)
pub fn blur() {
    if get_focused_index() >= 0 {
        set_focus_with_callbacks(-1);
    }
}

/// Blur a specific element. No-op unless it holds focus.
pub fn blur_index(index: usize) {
    if is_focused(index) {
        set_focus_with_callbacks(-1);
    }
}

/// Focus the first focusable element
pub fn focus_first() -> bool {
    get_focusable_indices().first().is_some_and(|&i| focus(i))
}

/// Focus the last focusable element
pub fn focus_last() -> bool {
    get_focusable_indices().last().is_some_and(|&i| focus(i))
}

// =============================================================================
// CLEANUP
// =============================================================================

/// Drop callbacks for a released element and clear focus from it
/// without firing blur.
pub fn cleanup_index(index: usize) {
    FOCUS_CALLBACK_REGISTRY.with(|reg| {
        reg.borrow_mut().by_index.remove(&index);
    });
    if is_focused(index) {
        FOCUSED_INDEX.with(|s| s.set(-1));
    }
}

/// Reset all focus state (for testing)
pub fn reset_focus_state() {
    FOCUSED_INDEX.with(|s| s.set(-1));
    FOCUS_CALLBACK_REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.by_index.clear();
        reg.next_id = 0;
    });
}

// =============================================================================
// TESTS
// =============================================================================
