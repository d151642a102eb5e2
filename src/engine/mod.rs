//! Element Engine - Index registry for rendered elements.
//!
//! Elements are NOT objects the engine owns. They are indices:
//!
//! ```text
//! Index 0: Tokenizer container (parent=-, focusable, tab=-1)
//! Index 1: Text field          (parent=0, focusable, tab=0)
//! Index 2: Token "A"           (parent=0, focusable, tab=0)
//! Index 3: Token "A" close     (parent=2)
//! ```
//!
//! Focus, keyboard and click dispatch all address elements by index.

mod registry;

pub use registry::*;
