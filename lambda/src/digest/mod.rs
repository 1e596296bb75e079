//! Digest assembly and rendering

pub mod render;

pub use render::{EMPTY_SECTION_NOTE, escape_html, render, render_html, render_text};
