//! Method body distiller.
//!
//! Converts the body of one Java method into a labeled ordered tree of
//! [`SourceCodeEntity`] nodes, ready for tree differencing. Every node records
//! its semantic [`EntityType`], a textual value and the inclusive source range
//! it was derived from.
//!
//! ```
//! let source = "class Foo { void run() { while (i < n) { step(); } } }";
//! let tree = nova_distill::distill_method(source, "run").unwrap();
//! assert_eq!(tree.tree_string(), "run { (i < n) { step(); } }");
//! ```

mod config;
mod convert;
mod entity;
mod error;
mod render;
mod tree;

pub use config::{init_tracing, ConversionOptions, DistillConfig, LoggingConfig};
pub use convert::{convert_method_body, convert_method_body_with, BodyConverter};
pub use entity::{EntityType, SourceCodeEntity};
pub use error::{ConfigError, ConvertError, DistillError};
pub use tree::{Node, NodeId, Tree};

use nova_core::SourceRange;

/// Parses `source` and distills the first method or constructor named `method_name`.
///
/// The root is a [`EntityType::Method`] node whose value is the method name and
/// whose range covers the whole declaration.
pub fn distill_method(source: &str, method_name: &str) -> Result<Tree, DistillError> {
    distill_method_with(source, method_name, &DistillConfig::default())
}

pub fn distill_method_with(
    source: &str,
    method_name: &str,
    config: &DistillConfig,
) -> Result<Tree, DistillError> {
    let parse = nova_syntax::parse(source);
    let method = parse
        .compilation_unit()
        .find_method(method_name)
        .ok_or_else(|| DistillError::MethodNotFound {
            name: method_name.to_owned(),
        })?;

    let range = SourceRange::from_span(method.range).unwrap_or_default();
    let mut tree = Tree::new(SourceCodeEntity::new(
        method.name.clone(),
        EntityType::Method,
        range,
    ));
    let root = tree.root_id();
    convert_method_body_with(&mut tree, root, method, source, &config.conversion)?;

    tracing::debug!(
        target: "nova.distill",
        method = method_name,
        nodes = tree.len(),
        "distilled method"
    );
    Ok(tree)
}
