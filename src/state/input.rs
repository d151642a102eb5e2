//! Input Module - Event conversion and routing
//!
//! Bridges crossterm's event system with our mouse and keyboard modules.
//!
//! # API
//!
//! - `convert_mouse_event` - Convert crossterm MouseEvent to our MouseEvent
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `poll_event` - Non-blocking event check with timeout
//! - `route_event` - Keys to the focused element, clicks through the tree
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Example
//!
//! ```ignore
//! loop {
//!     let tree = tokenizer.render()?;
//!     let frame = renderer::render(&tree, 0);
//!     if let Some(event) = poll_event(Duration::from_millis(16))? {
//!         route_event(event, &tree, &frame);
//!     }
//! }
//! ```

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use crossterm::execute;

use super::keyboard::{self, KeyState, KeyboardEvent, Modifiers};
use super::mouse::{dispatch_click, ClickEvent, MouseAction, MouseButton, MouseEvent};
use crate::primitives::Element;
use crate::renderer::Frame;

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Unified event type for our framework
#[derive(Debug, Clone)]
pub enum InputEvent {
    Mouse(MouseEvent),
    Key(KeyboardEvent),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// No event or unhandled event type
    None,
}

/// What routing did with an event.
#[derive(Debug)]
pub enum Routed {
    /// Key dispatched; inspect `is_default_prevented` on it.
    Key { event: KeyboardEvent, consumed: bool },
    /// Click dispatched through the element tree.
    Click(ClickEvent),
    Resize(u16, u16),
    Ignored,
}

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert crossterm MouseEvent to our MouseEvent
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> MouseEvent {
    let (action, button) = match event.kind {
        MouseEventKind::Down(btn) => (MouseAction::Down, convert_mouse_button(btn)),
        MouseEventKind::Up(btn) => (MouseAction::Up, convert_mouse_button(btn)),
        MouseEventKind::Drag(btn) => (MouseAction::Drag, convert_mouse_button(btn)),
        MouseEventKind::Moved => (MouseAction::Move, MouseButton::None),
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => (MouseAction::Scroll, MouseButton::None),
    };

    MouseEvent {
        action,
        button,
        x: event.column,
        y: event.row,
        modifiers: convert_modifiers(event.modifiers),
    }
}

/// Convert crossterm MouseButton to our MouseButton
fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        KeyCode::Insert => "Insert".to_string(),
        _ => String::new(),
    };

    let mut modifiers = convert_modifiers(event.modifiers);
    if event.code == KeyCode::BackTab {
        modifiers.shift = true;
    }

    let mut converted = KeyboardEvent::with_modifiers(key, modifiers);
    converted.state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };
    converted
}

// =============================================================================
// MODIFIER CONVERSION
// =============================================================================

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::META) || mods.contains(KeyModifiers::SUPER),
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    Ok(convert_event(read()?))
}

/// Convert any crossterm event.
pub fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Mouse(mouse) => InputEvent::Mouse(convert_mouse_event(mouse)),
        CrosstermEvent::Key(key) => InputEvent::Key(convert_key_event(key)),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Route an event.
///
/// Keys go to the focused element's handlers. A left press is hit-tested
/// against `frame` and dispatched as a click through `root`.
pub fn route_event(event: InputEvent, root: &Element, frame: &Frame) -> Routed {
    match event {
        InputEvent::Key(mut key) => {
            let consumed = keyboard::dispatch(&mut key);
            Routed::Key { event: key, consumed }
        }
        InputEvent::Mouse(mouse) if mouse.is_click() => match frame.hit_test(mouse.x, mouse.y) {
            Some(target) => {
                tracing::trace!(target, x = mouse.x, y = mouse.y, "click routed");
                Routed::Click(dispatch_click(root, target, Some(mouse)))
            }
            None => Routed::Ignored,
        },
        InputEvent::Resize(w, h) => Routed::Resize(w, h),
        InputEvent::Mouse(_) | InputEvent::None => Routed::Ignored,
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reset_registry;
    use crate::primitives::{ElementKind, TokenizerInput, TokenizerInputProps};
    use crate::renderer;
    use crate::state::focus;
    use crossterm::event::KeyEventState;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() {
        reset_registry();
        focus::reset_focus_state();
        keyboard::reset_keyboard_state();
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_convert_key_event() {
        let event = convert_key_event(key(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(event.key, "Backspace");
        assert!(event.is_press());

        let event = convert_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(event.key, "c");
        assert!(event.modifiers.ctrl);

        let event = convert_key_event(key(KeyCode::BackTab, KeyModifiers::NONE));
        assert_eq!(event.key, "Tab");
        assert!(event.modifiers.shift);
    }

    #[test]
    fn test_convert_mouse_event() {
        let event = convert_mouse_event(CrosstermMouseEvent {
            kind: MouseEventKind::Down(CrosstermMouseButton::Left),
            column: 7,
            row: 2,
            modifiers: KeyModifiers::NONE,
        });
        assert!(event.is_click());
        assert_eq!((event.x, event.y), (7, 2));

        let event = convert_mouse_event(CrosstermMouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(event.action, MouseAction::Scroll);
    }

    #[test]
    fn test_route_click_on_close_button() {
        setup();
        let removed = Rc::new(RefCell::new(Vec::new()));
        let removed_clone = removed.clone();
        let tokenizer = TokenizerInput::new(TokenizerInputProps {
            selected: vec![json!({"label": "A"})],
            on_remove: Some(Rc::new(move |entry: &Value| removed_clone.borrow_mut().push(entry.clone()))),
            ..Default::default()
        });
        let tree = tokenizer.render().unwrap();
        let frame = renderer::render(&tree, 0);

        let close = tree.find_by_class("close-button")[0].index;
        let region = frame.hits.iter().find(|h| h.index == close).unwrap();
        let mouse = MouseEvent::new(MouseAction::Down, MouseButton::Left, region.x, 0);

        let routed = route_event(InputEvent::Mouse(mouse), &tree, &frame);
        assert!(matches!(routed, Routed::Click(ref e) if e.target == close));
        assert_eq!(*removed.borrow(), vec![json!({"label": "A"})]);
        assert!(tokenizer.is_focused());
    }

    #[test]
    fn test_route_key_to_focused_field() {
        setup();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let changes_clone = changes.clone();
        let tokenizer = TokenizerInput::<Value>::new(TokenizerInputProps {
            on_change: Some(Rc::new(move |text: &str| changes_clone.borrow_mut().push(text.to_string()))),
            ..Default::default()
        });
        tokenizer.focus();
        let tree = tokenizer.render().unwrap();
        let frame = renderer::render(&tree, 0);

        let routed = route_event(InputEvent::Key(KeyboardEvent::new("z")), &tree, &frame);
        assert!(matches!(routed, Routed::Key { consumed: false, .. }));
        assert_eq!(*changes.borrow(), vec!["z".to_string()]);
    }

    #[test]
    fn test_route_ignores_moves_and_misses() {
        setup();
        let root = Element::new(0, ElementKind::Container).text("x");
        let frame = renderer::render(&root, 0);

        let moved = MouseEvent::new(MouseAction::Move, MouseButton::None, 0, 0);
        assert!(matches!(route_event(InputEvent::Mouse(moved), &root, &frame), Routed::Ignored));

        let miss = MouseEvent::new(MouseAction::Down, MouseButton::Left, 40, 5);
        assert!(matches!(route_event(InputEvent::Mouse(miss), &root, &frame), Routed::Ignored));
    }
}
