//! Lightweight Java front end: lexer, spanned AST, and an error-tolerant
//! recursive-descent parser.
//!
//! The goal is a small, deterministic syntax layer that downstream crates can
//! lower into their own structures. It is not a full-fidelity syntax tree:
//! lambda bodies, anonymous class bodies, switch expressions and array
//! initializers are kept as opaque spans.

pub mod ast;
mod lexer;
mod parser;

pub use parser::{parse, parse_block, Parse};
