//! Rendering of note bodies with link labels.

mod renderer;
mod wikilink;

pub use renderer::{LinkRenderer, RenderMode, RenderOutput, RenderedLink};
pub use wikilink::{WikiLink, find_wikilinks};
