//! Element tree - what components render to.
//!
//! An [`Element`] is a description: index, kind, classes, style, text and
//! children, plus an optional click handler. Components build a fresh tree
//! on every render; the renderer draws it and the mouse module dispatches
//! clicks through it.

use std::fmt;
use std::rc::Rc;

use crate::state::mouse::ClickEvent;
use crate::types::{ClassList, Style};

/// Click handler attached to an element.
pub type ClickHandler = Rc<dyn Fn(&ClickEvent)>;

/// What an element is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Generic block (tokenizer container, token).
    Container,
    /// Hyperlink with a target.
    Link { href: String },
    /// Inline clickable span (close affordance, menu entry link).
    Button,
    /// Entry in a menu list.
    ListItem,
    /// Single-line text field.
    TextField {
        value: String,
        placeholder: Option<String>,
        /// Width in cells, grown to fit its content.
        width: usize,
    },
}

/// A rendered element.
#[derive(Clone)]
pub struct Element {
    pub index: usize,
    pub kind: ElementKind,
    pub classes: ClassList,
    pub style: Style,
    pub tab_index: Option<i32>,
    pub role: Option<&'static str>,
    pub disabled: bool,
    /// Text content drawn before any children.
    pub text: Option<String>,
    /// Pass-through attributes supplied by the owner.
    pub attrs: Vec<(String, String)>,
    pub on_click: Option<ClickHandler>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(index: usize, kind: ElementKind) -> Self {
        Self {
            index,
            kind,
            classes: ClassList::default(),
            style: Style::default(),
            tab_index: None,
            role: None,
            disabled: false,
            text: None,
            attrs: Vec::new(),
            on_click: None,
            children: Vec::new(),
        }
    }

    pub fn classes(mut self, classes: ClassList) -> Self {
        self.classes = classes;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    pub fn role(mut self, role: &'static str) -> Self {
        self.role = Some(role);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn attrs(mut self, attrs: Vec<(String, String)>) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn on_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ClickEvent) + 'static,
    {
        self.on_click = Some(Rc::new(handler));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Find the element with `index` in this subtree.
    pub fn find(&self, index: usize) -> Option<&Element> {
        self.path_to(index).and_then(|path| path.last().copied())
    }

    /// Path from this element down to `index`, inclusive at both ends.
    pub fn path_to(&self, index: usize) -> Option<Vec<&Element>> {
        if self.index == index {
            return Some(vec![self]);
        }
        for child in &self.children {
            if let Some(mut path) = child.path_to(index) {
                path.insert(0, self);
                return Some(path);
            }
        }
        None
    }

    /// All elements in this subtree carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(&mut |element| {
            if element.classes.contains(class) {
                found.push(element);
            }
        });
        found
    }

    /// Visit every element in document order.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Element)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("index", &self.index)
            .field("kind", &self.kind)
            .field("classes", &self.classes.to_string())
            .field("tab_index", &self.tab_index)
            .field("role", &self.role)
            .field("disabled", &self.disabled)
            .field("text", &self.text)
            .field("clickable", &self.on_click.is_some())
            .field("children", &self.children)
            .finish()
    }
}
