//! Single-line renderer.
//!
//! Layout is inline: an element draws its own text, then its children
//! separated by one cell. Tokens are bracketed, text fields are padded to
//! their width. Every element records the span of cells it covers so mouse
//! clicks can be mapped back to it.

use std::io::Write;

use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor};
use unicode_width::UnicodeWidthStr;

use crate::error::Result;
use crate::primitives::{Element, ElementKind};
use crate::types::{Attr, Rgba, Style};

// =============================================================================
// Types
// =============================================================================

/// A run of text drawn with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

/// Cells covered by one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub index: usize,
}

impl HitRegion {
    fn contains(&self, x: u16, y: u16) -> bool {
        y == self.y && x >= self.x && x < self.x.saturating_add(self.width)
    }
}

/// One rendered row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub row: u16,
    pub spans: Vec<Span>,
    /// Pre-order; children follow their parent.
    pub hits: Vec<HitRegion>,
}

impl Frame {
    /// Plain text of the row, without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn width(&self) -> u16 {
        self.spans.iter().map(|s| string_width(&s.text)).sum()
    }

    /// Deepest element covering `(x, y)`.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<usize> {
        self.hits.iter().rev().find(|h| h.contains(x, y)).map(|h| h.index)
    }

    /// Columns covered by `index`, if it was drawn.
    pub fn region_of(&self, index: usize) -> Option<HitRegion> {
        self.hits.iter().find(|h| h.index == index).copied()
    }

    /// Emit the row at column 0 of `self.row`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        queue!(
            out,
            crossterm::cursor::MoveTo(0, self.row),
            crossterm::terminal::Clear(crossterm::terminal::ClearType::CurrentLine)
        )?;
        for span in &self.spans {
            write_span(out, span)?;
        }
        queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
        out.flush()?;
        Ok(())
    }
}

// =============================================================================
// Styling
// =============================================================================

/// Attributes implied by an element's classes and kind.
pub fn class_attrs(element: &Element) -> Attr {
    let mut attrs = Attr::NONE;
    let classes = &element.classes;
    if classes.contains("focus") {
        attrs |= Attr::BOLD;
    }
    if classes.contains("token-selected") || classes.contains("active") {
        attrs |= Attr::INVERSE;
    }
    if classes.contains("token-disabled") || classes.contains("disabled") || element.disabled {
        attrs |= Attr::DIM;
    }
    if matches!(element.kind, ElementKind::Link { .. }) {
        attrs |= Attr::UNDERLINE;
    }
    attrs
}

fn resolve_style(parent: Style, element: &Element) -> Style {
    let own = Style { attrs: class_attrs(element), ..Style::default() };
    parent.merge(own).merge(element.style)
}

fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else {
        Color::Rgb {
            r: color.r.clamp(0, 255) as u8,
            g: color.g.clamp(0, 255) as u8,
            b: color.b.clamp(0, 255) as u8,
        }
    }
}

fn write_span<W: Write>(out: &mut W, span: &Span) -> Result<()> {
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    if let Some(fg) = span.style.fg {
        queue!(out, SetForegroundColor(to_color(fg)))?;
    }
    if let Some(bg) = span.style.bg {
        queue!(out, SetBackgroundColor(to_color(bg)))?;
    }
    let attrs = span.style.attrs;
    for (flag, attribute) in [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::INVERSE, Attribute::Reverse),
        (Attr::STRIKETHROUGH, Attribute::CrossedOut),
    ] {
        if attrs.contains(flag) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    queue!(out, Print(&span.text))?;
    Ok(())
}

// =============================================================================
// Layout
// =============================================================================

/// Display width in terminal cells. CJK and emoji count as two.
pub fn string_width(text: &str) -> u16 {
    text.width().min(u16::MAX as usize) as u16
}

struct LineBuilder {
    row: u16,
    cursor: u16,
    spans: Vec<Span>,
    hits: Vec<HitRegion>,
}

impl LineBuilder {
    fn push(&mut self, text: impl Into<String>, style: Style) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.cursor = self.cursor.saturating_add(string_width(&text));
        self.spans.push(Span { text, style });
    }

    fn element(&mut self, element: &Element, parent: Style) {
        let style = resolve_style(parent, element);
        let start = self.cursor;
        let slot = self.hits.len();
        self.hits.push(HitRegion { x: start, y: self.row, width: 0, index: element.index });

        let bracketed = element.classes.contains("token");
        if bracketed {
            self.push("[", style);
        }

        match &element.kind {
            ElementKind::TextField { value, placeholder, width } => {
                let (shown, field_style) = if value.is_empty() {
                    let dim = Style { attrs: style.attrs | Attr::DIM, ..style };
                    (placeholder.clone().unwrap_or_default(), dim)
                } else {
                    (value.clone(), style)
                };
                let pad = width.saturating_sub(shown.width());
                self.push(shown, field_style);
                self.push(" ".repeat(pad), style);
            }
            _ => {
                if let Some(text) = &element.text {
                    self.push(text.clone(), style);
                }
            }
        }

        let mut first = element.text.is_none();
        for child in &element.children {
            if !first {
                self.push(" ", style);
            }
            first = false;
            self.element(child, style);
        }

        if bracketed {
            self.push("]", style);
        }
        self.hits[slot].width = self.cursor - start;
    }
}

/// Lay `root` out on `row`.
pub fn render(root: &Element, row: u16) -> Frame {
    let mut builder = LineBuilder { row, cursor: 0, spans: Vec::new(), hits: Vec::new() };
    builder.element(root, Style::default());
    Frame { row, spans: builder.spans, hits: builder.hits }
}

// =============================================================================
// Tests
// =============================================================================
