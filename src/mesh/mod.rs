//! CPU-side glyph mesh buffers.
//!
//! This module provides:
//! - [`SourceMesh`] - The flat glyph mesh produced by text shaping
//! - [`CombinedMesh`] - All stacked layers plus the main layer, ready for one draw call
//! - [`StackVertex`] - Interleaved vertex matching the stacked-text shader
//! - [`VertexBufferLayout`] - Attribute layout of [`StackVertex`]

mod combined;
mod layout;
mod source;

pub use combined::{CombinedMesh, LayerKind, LayerRange, StackVertex};
pub use layout::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};
pub use source::SourceMesh;
