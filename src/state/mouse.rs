//! Mouse Module - Mouse events and click dispatch
//!
//! Clicks are dispatched against a rendered element tree: the handler on
//! the target runs first, then each ancestor's handler, until one stops
//! propagation.
//!
//! # Example
//!
//! ```ignore
//! use spark_tokenizer::state::mouse;
//!
//! let event = mouse::dispatch_click(&root, close_button_index, None);
//! assert!(event.is_default_prevented());
//! ```

use std::cell::Cell;

use super::keyboard::Modifiers;
use crate::primitives::Element;

// =============================================================================
// TYPES
// =============================================================================

/// Mouse action type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Up,
    Move,
    Drag,
    Scroll,
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

/// Mouse event
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    /// Action type (down, up, move, drag, scroll)
    pub action: MouseAction,
    /// Button pressed
    pub button: MouseButton,
    /// X coordinate (0-indexed)
    pub x: u16,
    /// Y coordinate (0-indexed)
    pub y: u16,
    /// Modifier keys state
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Create a new mouse event
    pub fn new(action: MouseAction, button: MouseButton, x: u16, y: u16) -> Self {
        Self {
            action,
            button,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    /// Left-button press, the only action that produces a click.
    pub fn is_click(&self) -> bool {
        self.action == MouseAction::Down && self.button == MouseButton::Left
    }
}

// =============================================================================
// CLICK EVENT
// =============================================================================

/// A click travelling from its target element up through its ancestors.
#[derive(Debug)]
pub struct ClickEvent {
    /// Element that was clicked.
    pub target: usize,
    /// Raw mouse event, when the click came from the terminal.
    pub mouse: Option<MouseEvent>,
    current_target: Cell<usize>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl ClickEvent {
    pub fn new(target: usize, mouse: Option<MouseEvent>) -> Self {
        Self {
            target,
            mouse,
            current_target: Cell::new(target),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Element whose handler is currently running.
    pub fn current_target(&self) -> usize {
        self.current_target.get()
    }

    /// Suppress the default action (link navigation).
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop the click from reaching further ancestors.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Dispatch a click on `target` within the tree rooted at `root`.
///
/// Handlers run innermost first. Returns the event so callers can check
/// whether the default action was prevented. A target outside the tree
/// runs no handlers.
pub fn dispatch_click(root: &Element, target: usize, mouse: Option<MouseEvent>) -> ClickEvent {
    let event = ClickEvent::new(target, mouse);
    let Some(path) = root.path_to(target) else {
        tracing::trace!(target, "click outside element tree");
        return event;
    };

    for element in path.iter().rev() {
        if let Some(handler) = &element.on_click {
            event.current_target.set(element.index);
            handler(&event);
            if event.is_propagation_stopped() {
                break;
            }
        }
    }
    event
}

// =============================================================================
// TESTS
// =============================================================================
