//! Element Registry - Index allocation for rendered elements.
//!
//! Manages the lifecycle of element indices:
//! - ID ↔ Index bidirectional mapping
//! - Free index pool for reuse
//! - Parent links (for click bubbling) and a parent context stack
//! - Per-index focusability and tab index
//! - Destroy callbacks (focus/keyboard registrations hang off these)

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Registry State
// =============================================================================

/// Interaction data stored per allocated index.
#[derive(Debug, Clone, Copy, Default)]
struct Interaction {
    parent: Option<usize>,
    focusable: bool,
    tab_index: i32,
}

thread_local! {
    /// Map element ID to index.
    static ID_TO_INDEX: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// Map index to element ID.
    static INDEX_TO_ID: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());

    /// Currently allocated indices, in ascending order.
    static ALLOCATED_INDICES: RefCell<BTreeSet<usize>> = RefCell::new(BTreeSet::new());

    /// Interaction data per index.
    static INTERACTION: RefCell<HashMap<usize, Interaction>> = RefCell::new(HashMap::new());

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Next index to allocate if pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Counter for generating unique IDs.
    static ID_COUNTER: RefCell<usize> = const { RefCell::new(0) };

    /// Stack of parent indices for nested element creation.
    static PARENT_STACK: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Destroy callbacks registered per index.
    static DESTROY_CALLBACKS: RefCell<HashMap<usize, Vec<Box<dyn FnOnce()>>>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Parent Context Stack
// =============================================================================

/// Get current parent index (None if at root).
pub fn get_current_parent_index() -> Option<usize> {
    PARENT_STACK.with(|stack| stack.borrow().last().copied())
}

/// Push a parent index onto the stack.
pub fn push_parent_context(index: usize) {
    PARENT_STACK.with(|stack| stack.borrow_mut().push(index));
}

/// Pop a parent index from the stack.
pub fn pop_parent_context() {
    PARENT_STACK.with(|stack| {
        stack.borrow_mut().pop();
    });
}

// =============================================================================
// Index Allocation
// =============================================================================

/// Allocate an index for a new element.
///
/// The element's parent is the current parent context. If `id` is already
/// allocated, its existing index is returned.
pub fn allocate_index(id: Option<&str>) -> usize {
    let element_id = match id {
        Some(id) => id.to_string(),
        None => ID_COUNTER.with(|counter| {
            let mut counter = counter.borrow_mut();
            let id = format!("e{}", *counter);
            *counter += 1;
            id
        }),
    };

    let existing = ID_TO_INDEX.with(|map| map.borrow().get(&element_id).copied());
    if let Some(index) = existing {
        return index;
    }

    let index = FREE_INDICES.with(|free| {
        free.borrow_mut().pop().unwrap_or_else(|| {
            NEXT_INDEX.with(|next| {
                let mut next = next.borrow_mut();
                let index = *next;
                *next += 1;
                index
            })
        })
    });

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().insert(element_id.clone(), index);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().insert(index, element_id);
    });
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().insert(index);
    });
    let parent = get_current_parent_index();
    INTERACTION.with(|map| {
        map.borrow_mut().insert(index, Interaction { parent, ..Interaction::default() });
    });

    index
}

/// Release an index back to the pool.
///
/// Also recursively releases all children.
pub fn release_index(index: usize) {
    let id = INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned());
    let Some(id) = id else { return };

    let children: Vec<usize> = INTERACTION.with(|map| {
        map.borrow()
            .iter()
            .filter(|(_, info)| info.parent == Some(index))
            .map(|(&child, _)| child)
            .collect()
    });
    for child in children {
        release_index(child);
    }

    run_destroy_callbacks(index);

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().remove(&id);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().remove(&index);
    });
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().remove(&index);
    });
    INTERACTION.with(|map| {
        map.borrow_mut().remove(&index);
    });
    FREE_INDICES.with(|free| free.borrow_mut().push(index));
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Register a callback to run when the element at `index` is released.
pub fn on_destroy(index: usize, callback: impl FnOnce() + 'static) {
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .entry(index)
            .or_default()
            .push(Box::new(callback));
    });
}

fn run_destroy_callbacks(index: usize) {
    let callbacks = DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().remove(&index));
    if let Some(callbacks) = callbacks {
        for callback in callbacks {
            callback();
        }
    }
}

// =============================================================================
// Interaction
// =============================================================================

/// Mark an element as focusable (or not).
pub fn set_focusable(index: usize, focusable: bool) {
    INTERACTION.with(|map| {
        if let Some(info) = map.borrow_mut().get_mut(&index) {
            info.focusable = focusable;
        }
    });
}

/// Set the tab index used for Tab-order navigation.
pub fn set_tab_index(index: usize, tab_index: i32) {
    INTERACTION.with(|map| {
        if let Some(info) = map.borrow_mut().get_mut(&index) {
            info.tab_index = tab_index;
        }
    });
}

pub fn get_focusable(index: usize) -> bool {
    INTERACTION.with(|map| map.borrow().get(&index).is_some_and(|info| info.focusable))
}

pub fn get_tab_index(index: usize) -> i32 {
    INTERACTION.with(|map| map.borrow().get(&index).map_or(0, |info| info.tab_index))
}

/// Get the parent index of an element.
pub fn get_parent_index(index: usize) -> Option<usize> {
    INTERACTION.with(|map| map.borrow().get(&index).and_then(|info| info.parent))
}

/// Check whether `index` is `ancestor` or one of its descendants.
pub fn is_within(index: usize, ancestor: usize) -> bool {
    let mut current = Some(index);
    while let Some(i) = current {
        if i == ancestor {
            return true;
        }
        current = get_parent_index(i);
    }
    false
}

// =============================================================================
// Lookups
// =============================================================================

/// Get index for an element ID.
pub fn get_index(id: &str) -> Option<usize> {
    ID_TO_INDEX.with(|map| map.borrow().get(id).copied())
}

/// Get ID for an index.
pub fn get_id(index: usize) -> Option<String> {
    INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned())
}

/// Get all currently allocated indices in ascending order.
pub fn get_allocated_indices() -> Vec<usize> {
    ALLOCATED_INDICES.with(|set| set.borrow().iter().copied().collect())
}

/// Check if an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    ALLOCATED_INDICES.with(|set| set.borrow().contains(&index))
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state.
pub fn reset_registry() {
    ID_TO_INDEX.with(|map| map.borrow_mut().clear());
    INDEX_TO_ID.with(|map| map.borrow_mut().clear());
    ALLOCATED_INDICES.with(|set| set.borrow_mut().clear());
    INTERACTION.with(|map| map.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    ID_COUNTER.with(|counter| *counter.borrow_mut() = 0);
    PARENT_STACK.with(|stack| stack.borrow_mut().clear());
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().clear());
}

// =============================================================================
// Tests
// =============================================================================
