//! Normalized rendering of expressions used as node values.
//!
//! Operator expressions are fully parenthesized with single spaces between
//! operands and operators, e.g. `(i < list.size())` or `(! done)`. Constructs
//! whose inner structure is not tracked by the AST (lambdas, method
//! references, array creation, anonymous class bodies, switch expressions,
//! class literals, case patterns) are copied from the source verbatim.

use nova_core::Span;
use nova_syntax::ast::Expr;

/// An expression that cannot be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unrenderable {
    pub(crate) kind: &'static str,
    pub(crate) span: Span,
}

pub(crate) struct Renderer<'a> {
    source: &'a str,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub(crate) fn render(&self, expr: &Expr) -> Result<String, Unrenderable> {
        let mut out = String::new();
        self.write(expr, &mut out)?;
        Ok(out)
    }

    /// Renders `exprs` separated by `sep`.
    pub(crate) fn render_list(&self, exprs: &[Expr], sep: &str) -> Result<String, Unrenderable> {
        let mut out = String::new();
        self.write_list(exprs, sep, &mut out)?;
        Ok(out)
    }

    fn write_list(&self, exprs: &[Expr], sep: &str, out: &mut String) -> Result<(), Unrenderable> {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            self.write(expr, out)?;
        }
        Ok(())
    }

    fn verbatim(&self, expr: &Expr, out: &mut String) -> Result<(), Unrenderable> {
        let span = expr.range();
        let text = span.slice(self.source).ok_or(Unrenderable {
            kind: expr.kind_name(),
            span,
        })?;
        out.push_str(text);
        Ok(())
    }

    fn write(&self, expr: &Expr, out: &mut String) -> Result<(), Unrenderable> {
        match expr {
            Expr::Name(name) => out.push_str(&name.name),
            Expr::Literal(lit) => out.push_str(&lit.value),
            Expr::This(_) => out.push_str("this"),
            Expr::Super(_) => out.push_str("super"),
            Expr::FieldAccess(access) => {
                self.write(&access.receiver, out)?;
                out.push('.');
                out.push_str(&access.name);
            }
            Expr::ArrayAccess(access) => {
                self.write(&access.array, out)?;
                out.push('[');
                self.write(&access.index, out)?;
                out.push(']');
            }
            Expr::MethodCall(call) => {
                if let Some(receiver) = &call.receiver {
                    self.write(receiver, out)?;
                    out.push('.');
                }
                out.push_str(&call.name);
                out.push('(');
                self.write_list(&call.args, ", ", out)?;
                out.push(')');
            }
            Expr::New(new) if new.body.is_some() => self.verbatim(expr, out)?,
            Expr::New(new) => {
                if let Some(qualifier) = &new.qualifier {
                    self.write(qualifier, out)?;
                    out.push('.');
                }
                out.push_str("new ");
                out.push_str(&new.ty.text);
                out.push('(');
                self.write_list(&new.args, ", ", out)?;
                out.push(')');
            }
            Expr::Unary(unary) => {
                out.push('(');
                out.push_str(unary.op.as_str());
                out.push(' ');
                self.write(&unary.operand, out)?;
                out.push(')');
            }
            Expr::Postfix(postfix) => {
                out.push('(');
                self.write(&postfix.operand, out)?;
                out.push(' ');
                out.push_str(postfix.op.as_str());
                out.push(')');
            }
            Expr::Binary(binary) => {
                out.push('(');
                self.write(&binary.lhs, out)?;
                out.push(' ');
                out.push_str(binary.op.as_str());
                out.push(' ');
                self.write(&binary.rhs, out)?;
                out.push(')');
            }
            Expr::InstanceOf(inst) => {
                out.push('(');
                self.write(&inst.expr, out)?;
                out.push_str(" instanceof ");
                out.push_str(&inst.ty.text);
                if let Some(binding) = &inst.binding {
                    out.push(' ');
                    out.push_str(binding);
                }
                out.push(')');
            }
            Expr::Conditional(cond) => {
                out.push('(');
                self.write(&cond.condition, out)?;
                out.push_str(" ? ");
                self.write(&cond.then_expr, out)?;
                out.push_str(" : ");
                self.write(&cond.else_expr, out)?;
                out.push(')');
            }
            Expr::Assign(assign) => {
                out.push('(');
                self.write(&assign.lhs, out)?;
                out.push(' ');
                out.push_str(assign.op.as_str());
                out.push(' ');
                self.write(&assign.rhs, out)?;
                out.push(')');
            }
            Expr::Cast(cast) => {
                out.push_str("((");
                out.push_str(&cast.ty.text);
                out.push_str(") ");
                self.write(&cast.expr, out)?;
                out.push(')');
            }
            Expr::Paren(paren) => {
                if renders_parenthesized(&paren.inner) {
                    self.write(&paren.inner, out)?;
                } else {
                    out.push('(');
                    self.write(&paren.inner, out)?;
                    out.push(')');
                }
            }
            Expr::NewArray(_)
            | Expr::ArrayInit(_)
            | Expr::Lambda(_)
            | Expr::MethodRef(_)
            | Expr::ClassLiteral(_)
            | Expr::Switch(_)
            | Expr::Pattern(_) => self.verbatim(expr, out)?,
            Expr::Missing(span) => {
                return Err(Unrenderable {
                    kind: expr.kind_name(),
                    span: *span,
                })
            }
        }
        Ok(())
    }
}

/// Whether rendering `expr` already yields an outer pair of parentheses.
fn renders_parenthesized(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Unary(_)
            | Expr::Postfix(_)
            | Expr::Binary(_)
            | Expr::InstanceOf(_)
            | Expr::Conditional(_)
            | Expr::Assign(_)
            | Expr::Cast(_)
            | Expr::Paren(_)
    )
}
