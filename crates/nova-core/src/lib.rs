//! Core shared types for Nova's change-distilling pipeline.
//!
//! Byte spans as produced by the front end, the inclusive [`SourceRange`]
//! carried by tree entities, and a [`LineIndex`] for human-readable locations.

mod text;

pub use text::{LineCol, LineIndex, SourceRange, Span, TextRange, TextSize};
