//! Method body to generic tree conversion.
//!
//! Statements map onto [`EntityType`]s one rule per [`Stmt`] variant.
//! Blocks are flattened into their parent and empty statements are dropped.
//! Expressions are never decomposed: each one becomes the text value of the
//! statement-level node that owns it.

use nova_core::{LineIndex, SourceRange, Span};
use nova_syntax::ast::{self, Expr, Stmt};

use crate::config::ConversionOptions;
use crate::entity::{EntityType, SourceCodeEntity};
use crate::error::ConvertError;
use crate::render::{Renderer, Unrenderable};
use crate::tree::{NodeId, Tree};

/// Converts the body of `method` into children of `root`.
///
/// A method without a body (abstract, native, interface) leaves `root` untouched.
pub fn convert_method_body(
    tree: &mut Tree,
    root: NodeId,
    method: &ast::MethodDecl,
    source: &str,
) -> Result<(), ConvertError> {
    convert_method_body_with(tree, root, method, source, &ConversionOptions::default())
}

pub fn convert_method_body_with(
    tree: &mut Tree,
    root: NodeId,
    method: &ast::MethodDecl,
    source: &str,
    options: &ConversionOptions,
) -> Result<(), ConvertError> {
    let Some(body) = &method.body else {
        tracing::debug!(target: "nova.distill", method = %method.name, "method has no body");
        return Ok(());
    };
    BodyConverter::new(tree, source, options).convert_block(root, body)
}

pub struct BodyConverter<'a> {
    tree: &'a mut Tree,
    source: &'a str,
    renderer: Renderer<'a>,
    options: ConversionOptions,
}

impl<'a> BodyConverter<'a> {
    pub fn new(tree: &'a mut Tree, source: &'a str, options: &ConversionOptions) -> Self {
        Self {
            tree,
            source,
            renderer: Renderer::new(source),
            options: *options,
        }
    }

    /// Appends the statements of `block` under `parent`.
    ///
    /// On error every node created by this call is removed again.
    pub fn convert_block(&mut self, parent: NodeId, block: &ast::Block) -> Result<(), ConvertError> {
        let checkpoint = self.tree.len();
        match self.convert_statements(parent, &block.statements) {
            Ok(()) => {
                tracing::debug!(
                    target: "nova.distill",
                    statements = block.statements.len(),
                    nodes = self.tree.len() - checkpoint,
                    "converted block"
                );
                Ok(())
            }
            Err(err) => {
                tracing::warn!(target: "nova.distill", error = %err, "rejected method body");
                self.tree.truncate(checkpoint);
                Err(err)
            }
        }
    }

    fn convert_statements(&mut self, parent: NodeId, stmts: &[Stmt]) -> Result<(), ConvertError> {
        for stmt in stmts {
            self.convert_stmt(parent, stmt)?;
        }
        Ok(())
    }

    fn convert_stmt(&mut self, parent: NodeId, stmt: &Stmt) -> Result<(), ConvertError> {
        tracing::trace!(target: "nova.distill", kind = stmt.kind_name(), range = ?stmt.range(), "statement");
        match stmt {
            Stmt::LocalVar(local) => {
                self.verbatim(parent, EntityType::VariableDeclarationStatement, local.range)?;
            }
            Stmt::LocalType(local) => {
                self.verbatim(parent, EntityType::TypeDeclarationStatement, local.range)?;
            }
            // Only statement expressions have a rule; `a + b;` is rejected.
            Stmt::Expr(expr_stmt) => {
                let ty = self.statement_expression_type(&expr_stmt.expr)?;
                self.verbatim(parent, ty, expr_stmt.range)?;
            }
            Stmt::ConstructorCall(call) => {
                self.verbatim(parent, EntityType::ConstructorInvocation, call.range)?;
            }
            Stmt::Assert(assert) => {
                let mut value = self.render(&assert.condition)?;
                if let Some(message) = &assert.message {
                    value.push(':');
                    value.push_str(&self.render(message)?);
                }
                self.add_node(parent, EntityType::AssertStatement, value, assert.range)?;
            }
            Stmt::Break(jump) => {
                let value = jump.label.as_ref().map(|label| label.name.clone()).unwrap_or_default();
                self.add_node(parent, EntityType::BreakStatement, value, jump.range)?;
            }
            Stmt::Continue(jump) => {
                let value = jump.label.as_ref().map(|label| label.name.clone()).unwrap_or_default();
                self.add_node(parent, EntityType::ContinueStatement, value, jump.range)?;
            }
            Stmt::Return(ret) => {
                let value = match &ret.expr {
                    Some(expr) => self.tail_text(expr, ret.range)?,
                    None => String::new(),
                };
                self.add_node(parent, EntityType::ReturnStatement, value, ret.range)?;
            }
            Stmt::Throw(throw) => {
                let value = self.tail_text(&throw.expr, throw.range)?;
                self.add_node(parent, EntityType::ThrowStatement, value, throw.range)?;
            }
            // THEN and ELSE carry the condition and the range of the whole `if`.
            Stmt::If(stmt) => {
                let condition = self.render(&stmt.condition)?;
                let node = self.add_node(parent, EntityType::IfStatement, condition.clone(), stmt.range)?;
                let then = self.add_node(node, EntityType::ThenStatement, condition.clone(), stmt.range)?;
                self.convert_stmt(then, &stmt.then_branch)?;
                if let Some(else_branch) = &stmt.else_branch {
                    let otherwise = self.add_node(node, EntityType::ElseStatement, condition, stmt.range)?;
                    self.convert_stmt(otherwise, else_branch)?;
                }
            }
            Stmt::While(stmt) => {
                let condition = self.render(&stmt.condition)?;
                let node = self.add_node(parent, EntityType::WhileStatement, condition, stmt.range)?;
                self.convert_stmt(node, &stmt.body)?;
            }
            Stmt::Do(stmt) => {
                let condition = self.render(&stmt.condition)?;
                let node = self.add_node(parent, EntityType::DoStatement, condition, stmt.range)?;
                self.convert_stmt(node, &stmt.body)?;
            }
            Stmt::For(stmt) => {
                let condition = match &stmt.condition {
                    Some(condition) => self.render(condition)?,
                    None => String::new(),
                };
                let node = self.add_node(parent, EntityType::ForStatement, condition, stmt.range)?;
                self.convert_stmt(node, &stmt.body)?;
            }
            Stmt::Foreach(stmt) => {
                let iterable = self.render(&stmt.iterable)?;
                let header = format!("{} {}:{}", stmt.var.ty.text, stmt.var.name, iterable);
                let node = self.add_node(parent, EntityType::ForeachStatement, header, stmt.range)?;
                self.convert_stmt(node, &stmt.body)?;
            }
            Stmt::Switch(stmt) => self.convert_switch(parent, stmt)?,
            Stmt::Synchronized(stmt) => {
                let lock = self.render(&stmt.lock)?;
                let node = self.add_node(parent, EntityType::SynchronizedStatement, lock, stmt.range)?;
                self.convert_statements(node, &stmt.body.statements)?;
            }
            Stmt::Try(stmt) => self.convert_try(parent, stmt)?,
            Stmt::Labeled(stmt) => {
                let node = self.add_node(
                    parent,
                    EntityType::LabeledStatement,
                    stmt.label.name.clone(),
                    stmt.range,
                )?;
                self.convert_stmt(node, &stmt.body)?;
            }
            // Blocks have no entity type; their statements belong to the enclosing node.
            Stmt::Block(block) => self.convert_statements(parent, &block.statements)?,
            // `;` carries nothing to compare.
            Stmt::Empty(_) => {}
            Stmt::Error(span) => return Err(self.unsupported(stmt.kind_name(), *span)),
        }
        Ok(())
    }

    /// `SWITCH_STATEMENT` with one `SWITCH_CASE` per label, each group's
    /// statements following its labels as siblings.
    fn convert_switch(&mut self, parent: NodeId, stmt: &ast::SwitchStmt) -> Result<(), ConvertError> {
        let selector = self.render(&stmt.selector)?;
        let node = self.add_node(parent, EntityType::SwitchStatement, selector, stmt.range)?;
        for group in &stmt.groups {
            for label in &group.labels {
                let value = match label {
                    ast::SwitchLabel::Case { values, .. } => self
                        .renderer
                        .render_list(values, ", ")
                        .map_err(|err| self.unrenderable(err))?,
                    ast::SwitchLabel::Default { .. } => "default".to_owned(),
                };
                self.add_node(node, EntityType::SwitchCase, value, label.range())?;
            }
            self.convert_statements(node, &group.statements)?;
        }
        Ok(())
    }

    /// `TRY_STATEMENT` with `BODY`, then `CATCH_CLAUSES` and `FINALLY` when present.
    fn convert_try(&mut self, parent: NodeId, stmt: &ast::TryStmt) -> Result<(), ConvertError> {
        // Resources are copied verbatim, one per declaration or variable.
        let mut resources = Vec::with_capacity(stmt.resources.len());
        for &span in &stmt.resources {
            resources.push(self.slice(span)?);
        }
        let node = self.add_node(parent, EntityType::TryStatement, resources.join("; "), stmt.range)?;

        let body = self.add_node(node, EntityType::Body, String::new(), stmt.body.range)?;
        self.convert_statements(body, &stmt.body.statements)?;

        if let (Some(first), Some(last)) = (stmt.catches.first(), stmt.catches.last()) {
            let clauses = self.add_node(
                node,
                EntityType::CatchClauses,
                String::new(),
                first.range.cover(last.range),
            )?;
            for catch in &stmt.catches {
                let types: Vec<&str> = catch.types.iter().map(|ty| ty.text.as_str()).collect();
                let clause = self.add_node(clauses, EntityType::CatchClause, types.join(" | "), catch.range)?;
                self.convert_statements(clause, &catch.body.statements)?;
            }
        }

        if let Some(finally) = &stmt.finally {
            let node = self.add_node(node, EntityType::Finally, String::new(), finally.range)?;
            self.convert_statements(node, &finally.statements)?;
        }
        Ok(())
    }

    /// Entity type for an expression used as a statement.
    fn statement_expression_type(&self, expr: &Expr) -> Result<EntityType, ConvertError> {
        match expr {
            Expr::Assign(_) => Ok(EntityType::Assignment),
            Expr::Unary(unary)
                if matches!(
                    unary.op,
                    ast::UnaryOp::PreIncrement | ast::UnaryOp::PreDecrement
                ) =>
            {
                Ok(EntityType::PrefixExpression)
            }
            Expr::Postfix(_) => Ok(EntityType::PostfixExpression),
            Expr::New(_) => Ok(EntityType::ClassInstanceCreation),
            Expr::MethodCall(_) => Ok(EntityType::MethodInvocation),
            other => Err(self.unsupported(other.kind_name(), other.range())),
        }
    }

    fn render(&self, expr: &Expr) -> Result<String, ConvertError> {
        self.renderer.render(expr).map_err(|err| self.unrenderable(err))
    }

    /// Source text from the start of `expr` through the end of `stmt`.
    fn tail_text(&self, expr: &Expr, stmt: Span) -> Result<String, ConvertError> {
        if let Expr::Missing(span) = expr {
            return Err(self.unsupported(expr.kind_name(), *span));
        }
        self.slice(Span::new(expr.range().start, stmt.end))
    }

    fn slice(&self, span: Span) -> Result<String, ConvertError> {
        span.slice(self.source)
            .map(str::to_owned)
            .ok_or_else(|| self.malformed(span))
    }

    /// Creates a node whose value is exactly the source text of `span`.
    fn verbatim(&mut self, parent: NodeId, ty: EntityType, span: Span) -> Result<NodeId, ConvertError> {
        let value = self.slice(span)?;
        self.add_node(parent, ty, value, span)
    }

    /// Creates a node under `parent`. Composite nodes receive their children
    /// afterwards through the returned id.
    fn add_node(
        &mut self,
        parent: NodeId,
        ty: EntityType,
        value: String,
        span: Span,
    ) -> Result<NodeId, ConvertError> {
        let range = SourceRange::from_span(span).ok_or_else(|| self.malformed(span))?;
        if self.options.verify_ranges {
            self.verify(ty, &value, range)?;
        }
        Ok(self.tree.create_child(parent, SourceCodeEntity::new(value, ty, range)))
    }

    fn verify(&self, ty: EntityType, value: &str, range: SourceRange) -> Result<(), ConvertError> {
        let Some(actual) = range.slice(self.source) else {
            return Err(self.malformed(range.to_span()));
        };
        if ty.is_verbatim() && actual != value {
            return Err(ConvertError::RangeMismatch {
                entity: ty,
                expected: value.to_owned(),
                actual: actual.to_owned(),
            });
        }
        Ok(())
    }

    fn malformed(&self, span: Span) -> ConvertError {
        ConvertError::MalformedRange {
            start: span.start,
            end: span.end,
            len: self.source.len(),
        }
    }

    fn unrenderable(&self, err: Unrenderable) -> ConvertError {
        self.unsupported(err.kind, err.span)
    }

    fn unsupported(&self, kind: &'static str, span: Span) -> ConvertError {
        let location = LineIndex::new(self.source).line_col(span.start);
        ConvertError::Unsupported {
            kind,
            span,
            location,
        }
    }
}
