//! Text field - the auto-growing single-line field embedded in the
//! tokenizer.
//!
//! The field is controlled: it never stores text. [`default_edit`]
//! computes what a key press would turn the current value into, and the
//! owning component reports that as a change request.

use unicode_width::UnicodeWidthStr;

use crate::state::keyboard::KeyboardEvent;

/// Extra cells kept after the content so the cursor has room.
const CURSOR_ROOM: usize = 1;

/// Minimum field width in cells.
pub const MIN_WIDTH: usize = 1;

/// Width of the field in cells: the longer of value and placeholder,
/// plus room for the cursor.
pub fn field_width(value: &str, placeholder: Option<&str>) -> usize {
    let value_width = value.width();
    let placeholder_width = placeholder.map_or(0, UnicodeWidthStr::width);
    (value_width.max(placeholder_width) + CURSOR_ROOM).max(MIN_WIDTH)
}

/// The text a key press produces when its default action runs.
///
/// Printable characters append, Backspace drops the last character.
/// Returns `None` when the key does not edit (navigation keys, command
/// chords, Backspace on empty text).
pub fn default_edit(value: &str, event: &KeyboardEvent) -> Option<String> {
    if event.modifiers.is_command() {
        return None;
    }

    if event.key == "Backspace" {
        let mut chars = value.chars();
        chars.next_back()?;
        return Some(chars.as_str().to_string());
    }

    let mut chars = event.key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => {
            let mut next = String::with_capacity(value.len() + c.len_utf8());
            next.push_str(value);
            next.push(c);
            Some(next)
        }
        _ => None,
    }
}
