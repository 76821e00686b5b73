//! Java syntax front end.
//!
//! [`java::parse`] turns a compilation unit into a spanned AST whose nodes
//! record half-open byte ranges into the original text. The parser never
//! fails; unrecognized statements and expressions surface as explicit
//! error nodes so that consumers decide how strict to be.

pub mod java;

pub use java::{ast, parse, parse_block, Parse};
