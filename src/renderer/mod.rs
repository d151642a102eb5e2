//! Renderer - Element trees to styled terminal lines.
//!
//! - [`render`] lays a tree out on one row and records hit regions
//! - [`Frame::hit_test`] maps a cell back to the deepest element
//! - [`Frame::write_to`] emits the row through crossterm

mod line;

pub use line::{class_attrs, render, string_width, Frame, HitRegion, Span};
