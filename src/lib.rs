//! Text Stack - stacked glyph layers in a single draw call
//!
//! Takes the flat glyph mesh of a piece of text and builds one combined mesh
//! containing several offset, colored copies of it (the "stacks") behind the
//! original text, optionally bending every glyph along a shaping curve first.
//!
//! # Features
//! - Back-to-front layer assembly with per-layer color gradients and offsets
//! - Per-vertex `(dilate, softness)` edge parameters for a distance-field shader
//! - Curve bending that keeps glyph shapes rigid
//! - Change detection so rebuilds happen only when inputs change
//! - RON effect configuration

pub mod color;
pub mod config;
pub mod curve;
pub mod effect;
pub mod error;
pub mod glyph;
pub mod mesh;
pub mod stack;

pub use color::Gradient;
pub use config::{CurveSettings, EffectConfig};
pub use curve::{BendSettings, Curve, CurveBender, KeyframeCurve};
pub use effect::{ShapedText, StackedTextEffect, UpdateOutcome};
pub use error::{ConfigError, StackError, StackResult};
pub use glyph::{CharacterInfo, GlyphLayout};
pub use mesh::{CombinedMesh, SourceMesh, StackVertex};
pub use stack::{MainLayer, StackConfig, StackMeshBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
