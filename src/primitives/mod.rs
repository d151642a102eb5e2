//! Primitives - Component building blocks.
//!
//! - [`token`] - One selected value, removable or read-only
//! - [`TokenizerInput`] - Tokens plus an embedded text field
//! - [`menu_item`] - Activatable entry of a result menu
//!
//! # Architecture
//!
//! Each render produces an [`Element`] tree. Elements are indices in the
//! engine registry, so focus and keyboard routing address them the same
//! way across renders. Handlers are closures created fresh per render.
//!
//! Props are plain values owned by the caller. A component never writes
//! back into them; it asks for changes through the handlers it was given.

mod types;
mod element;
mod label;
mod token;
mod tokenizer_input;
mod menu_item;
pub mod text_field;

pub use types::*;
pub use element::{ClickHandler, Element, ElementKind};
pub use label::{option_label, LabelKey, DEFAULT_LABEL_KEY};
pub use token::{token, TokenVariant, CLOSE_GLYPH};
pub use tokenizer_input::TokenizerInput;
pub use menu_item::{menu_item, ItemFlags};
