//! Token Primitive - One selected value.
//!
//! A token renders either as a removable chip with a close affordance or
//! as a read-only label (a link when `href` is set). It never removes
//! itself from anything; the close affordance only calls `on_remove`.
//!
//! # Example
//!
//! ```ignore
//! use spark_tokenizer::primitives::{token, TokenProps};
//!
//! let element = token(TokenProps {
//!     content: "Alice".into(),
//!     on_remove: Some(Rc::new(|| println!("remove Alice"))),
//!     ..Default::default()
//! });
//! ```

use crate::engine::{
    allocate_index, get_id, get_index, pop_parent_context, push_parent_context, release_index,
    set_focusable, set_tab_index,
};
use crate::state::mouse::ClickEvent;
use crate::types::ClassList;
use super::element::{Element, ElementKind};
use super::types::TokenProps;

/// Glyph drawn for the close affordance.
pub const CLOSE_GLYPH: &str = "×";

/// The two ways a token can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenVariant {
    Removable,
    ReadOnly,
}

impl TokenVariant {
    /// Removable iff a remove handler is present and the token is enabled.
    pub fn of(has_remove: bool, disabled: bool) -> Self {
        if has_remove && !disabled {
            Self::Removable
        } else {
            Self::ReadOnly
        }
    }
}

/// Render a token.
pub fn token(props: TokenProps) -> Element {
    let index = props.index.unwrap_or_else(|| allocate_index(None));

    match TokenVariant::of(props.on_remove.is_some(), props.disabled) {
        TokenVariant::Removable => render_removable(index, props),
        TokenVariant::ReadOnly => render_read_only(index, props),
    }
}

/// Registry ID of a token's close affordance.
fn close_id(index: usize) -> String {
    format!("{}:close", get_id(index).unwrap_or_else(|| index.to_string()))
}

fn render_removable(index: usize, props: TokenProps) -> Element {
    set_focusable(index, true);
    set_tab_index(index, props.tab_index);

    push_parent_context(index);
    let close_index = allocate_index(Some(close_id(index).as_str()));
    pop_parent_context();

    let classes = ClassList::new(&["token", "token-removeable"])
        .with("token-selected", props.selected)
        .extend_raw(props.class_name.as_deref());

    let mut close = Element::new(close_index, ElementKind::Button)
        .classes(ClassList::new(&["close-button"]))
        .role("button")
        .style(props.styles.token_close)
        .text(CLOSE_GLYPH);
    if let Some(on_remove) = props.on_remove {
        close = close.on_click(move |_: &ClickEvent| {
            tracing::debug!(token = index, "token remove requested");
            on_remove();
        });
    }

    Element::new(index, ElementKind::Container)
        .classes(classes)
        .style(props.styles.token)
        .tab_index(props.tab_index)
        .attrs(props.attrs)
        .text(props.content)
        .child(close)
}

fn render_read_only(index: usize, props: TokenProps) -> Element {
    set_focusable(index, false);

    // A token that was removable on a previous render may still own a
    // close affordance.
    if let Some(stale) = get_index(&close_id(index)) {
        release_index(stale);
    }

    let classes = ClassList::new(&["token"])
        .with("token-disabled", props.disabled)
        .extend_raw(props.class_name.as_deref());

    let kind = match props.href {
        Some(href) => ElementKind::Link { href },
        None => ElementKind::Container,
    };

    Element::new(index, kind)
        .classes(classes)
        .style(props.styles.token)
        .disabled(props.disabled)
        .text(props.content)
}

// =============================================================================
// TESTS
// =============================================================================
