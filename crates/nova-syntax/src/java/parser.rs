use nova_core::Span;

use super::ast;
use super::lexer::{Lexer, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    compilation_unit: ast::CompilationUnit,
}

impl Parse {
    #[must_use]
    pub fn compilation_unit(&self) -> &ast::CompilationUnit {
        &self.compilation_unit
    }

    #[must_use]
    pub fn into_compilation_unit(self) -> ast::CompilationUnit {
        self.compilation_unit
    }
}

/// Parse a Java compilation unit.
///
/// Parsing never fails: tokens that cannot be understood inside a method body
/// become [`ast::Stmt::Error`] / [`ast::Expr::Missing`] nodes, and unknown
/// tokens at type or member level are skipped.
#[must_use]
pub fn parse(text: &str) -> Parse {
    let tokens = Lexer::new(text, 0).collect();
    let mut parser = Parser::new(tokens);
    let compilation_unit = parser.parse_compilation_unit(text.len());
    tracing::trace!(
        types = compilation_unit.types.len(),
        len = text.len(),
        "parsed compilation unit"
    );
    Parse { compilation_unit }
}

/// Parse a Java block statement (`{ ... }`).
///
/// `offset` specifies the byte offset of `text` within the original file so
/// returned spans are file-relative.
#[must_use]
pub fn parse_block(text: &str, offset: usize) -> ast::Block {
    let tokens = Lexer::new(text, offset).collect();
    let mut parser = Parser::new(tokens);
    parser.parse_block()
}

/// Every Java reserved keyword plus the `true`/`false`/`null` literals.
const KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "void",
    "volatile",
    "while",
];

const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

fn is_primitive(text: &str) -> bool {
    PRIMITIVE_TYPES.contains(&text)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_n(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn peek_kind_n(&self, n: usize) -> Option<TokenKind> {
        self.peek_n(n).map(|t| t.kind)
    }

    fn at_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek()
            .is_some_and(|token| token.kind == TokenKind::Ident && token.text == keyword)
    }

    fn keyword_at(&self, n: usize, keyword: &str) -> bool {
        self.peek_n(n)
            .is_some_and(|token| token.kind == TokenKind::Ident && token.text == keyword)
    }

    /// At an identifier that is not a reserved keyword.
    fn at_plain_ident(&self) -> bool {
        self.peek()
            .is_some_and(|token| token.kind == TokenKind::Ident && !is_keyword(&token.text))
    }

    /// `true` if token `n` ahead exists and starts exactly where token `n - 1` ends.
    fn adjacent(&self, n: usize) -> bool {
        match (self.peek_n(n - 1), self.peek_n(n)) {
            (Some(prev), Some(next)) => prev.range.end == next.range.start,
            _ => false,
        }
    }

    fn bump(&mut self) -> Option<Token> {
        if self.is_eof() {
            return None;
        }
        let tok = self.tokens[self.pos].clone();
        self.pos += 1;
        Some(tok)
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at_kind(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Start offset of the next token, or the end of the last one at EOF.
    fn here(&self) -> usize {
        self.peek().map_or_else(|| self.prev_end(), |t| t.range.start)
    }

    /// End offset of the most recently consumed token.
    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            return self.tokens.first().map_or(0, |t| t.range.start);
        }
        self.tokens[self.pos - 1].range.end
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    fn missing(&self) -> ast::Expr {
        let here = self.here();
        ast::Expr::Missing(Span::new(here, here))
    }

    // ---------------------------------------------------------------------
    // Compilation units
    // ---------------------------------------------------------------------

    fn parse_compilation_unit(&mut self, len: usize) -> ast::CompilationUnit {
        let package = if self.at_keyword("package") {
            self.bump();
            let (name, _) = self.parse_qualified_name();
            self.eat(TokenKind::Semi);
            Some(name)
        } else {
            None
        };

        while self.at_keyword("import") {
            while !self.is_eof() && !self.at_kind(TokenKind::Semi) {
                self.bump();
            }
            self.eat(TokenKind::Semi);
        }

        let mut types = Vec::new();
        while !self.is_eof() {
            if let Some(decl) = self.parse_type_decl() {
                types.push(decl);
            } else {
                self.bump();
            }
        }

        ast::CompilationUnit {
            package,
            types,
            range: Span::new(0, len),
        }
    }

    fn parse_qualified_name(&mut self) -> (String, Span) {
        let start = self.here();
        let mut parts = Vec::new();
        if self.at_kind(TokenKind::Ident) {
            parts.push(self.bump().map(|t| t.text).unwrap_or_default());
        }
        while self.at_kind(TokenKind::Dot) && self.peek_kind_n(1) == Some(TokenKind::Ident) {
            self.bump();
            parts.push(self.bump().map(|t| t.text).unwrap_or_default());
        }
        (parts.join("."), self.span_from(start))
    }

    /// Recognizes the keyword introducing a type declaration at the cursor.
    fn peek_type_kind(&self) -> Option<(ast::TypeKind, usize)> {
        if self.at_kind(TokenKind::At) && self.keyword_at(1, "interface") {
            return Some((ast::TypeKind::Annotation, 2));
        }
        let tok = self.peek()?;
        if tok.kind != TokenKind::Ident {
            return None;
        }
        match tok.text.as_str() {
            "class" => Some((ast::TypeKind::Class, 1)),
            "interface" => Some((ast::TypeKind::Interface, 1)),
            "enum" => Some((ast::TypeKind::Enum, 1)),
            "record" if self.peek_kind_n(1) == Some(TokenKind::Ident) => {
                Some((ast::TypeKind::Record, 1))
            }
            _ => None,
        }
    }

    fn parse_type_decl(&mut self) -> Option<ast::TypeDecl> {
        let start_pos = self.pos;
        let start = self.peek()?.range.start;

        self.skip_modifiers_and_annotations();

        let Some((kind, keyword_len)) = self.peek_type_kind() else {
            self.pos = start_pos;
            return None;
        };
        self.bump_n(keyword_len);

        let (name, name_range) = match self.peek() {
            Some(tok) if tok.kind == TokenKind::Ident => {
                let tok = self.bump()?;
                (tok.text, tok.range)
            }
            _ => (String::new(), Span::new(self.here(), self.here())),
        };

        let members = self.parse_type_body(&name, kind == ast::TypeKind::Enum);
        Some(ast::TypeDecl {
            kind,
            name,
            name_range,
            members,
            range: self.span_from(start),
        })
    }

    fn skip_modifiers_and_annotations(&mut self) {
        loop {
            if self.at_kind(TokenKind::At) {
                if self.keyword_at(1, "interface") {
                    break;
                }
                self.skip_annotation();
                continue;
            }

            if self.at_keyword("non")
                && self.peek_kind_n(1) == Some(TokenKind::Minus)
                && self.keyword_at(2, "sealed")
            {
                self.bump_n(3);
                continue;
            }

            if self.peek().is_some_and(|tok| {
                tok.kind == TokenKind::Ident
                    && matches!(
                        tok.text.as_str(),
                        "public"
                            | "protected"
                            | "private"
                            | "static"
                            | "final"
                            | "abstract"
                            | "default"
                            | "synchronized"
                            | "native"
                            | "transient"
                            | "volatile"
                            | "sealed"
                            | "strictfp"
                    )
            }) {
                if self.at_keyword("static") && self.peek_kind_n(1) == Some(TokenKind::LBrace) {
                    break;
                }
                // `default:` / `default ->` belongs to a switch, not a member.
                if self.at_keyword("default")
                    && matches!(
                        self.peek_kind_n(1),
                        Some(TokenKind::Colon | TokenKind::Arrow)
                    )
                {
                    break;
                }
                self.bump();
                continue;
            }

            break;
        }
    }

    fn skip_annotation(&mut self) {
        self.eat(TokenKind::At);
        if self.at_kind(TokenKind::Ident) {
            self.parse_qualified_name();
        }
        if self.at_kind(TokenKind::LParen) {
            self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
        }
    }

    fn parse_type_body(&mut self, type_name: &str, is_enum: bool) -> Vec<ast::MemberDecl> {
        // Skip the header (type parameters, record components, extends/implements).
        while !self.is_eof() && !self.at_kind(TokenKind::LBrace) {
            if self.at_kind(TokenKind::LParen) {
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
                continue;
            }
            self.bump();
        }
        if !self.eat(TokenKind::LBrace) {
            return Vec::new();
        }

        if is_enum {
            self.skip_enum_constants();
        }

        let mut members = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RBrace) {
            if let Some(member) = self.parse_member_decl(type_name) {
                members.push(member);
            } else {
                self.bump();
            }
        }
        self.eat(TokenKind::RBrace);
        members
    }

    fn skip_enum_constants(&mut self) {
        loop {
            if self.eat(TokenKind::Semi) || self.at_kind(TokenKind::RBrace) || self.is_eof() {
                break;
            }

            self.skip_modifiers_and_annotations();
            if !self.at_kind(TokenKind::Ident) {
                break;
            }
            self.bump();

            if self.at_kind(TokenKind::LParen) {
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
            }
            if self.at_kind(TokenKind::LBrace) {
                self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
            }
            self.eat(TokenKind::Comma);
        }
    }

    fn parse_member_decl(&mut self, enclosing_type: &str) -> Option<ast::MemberDecl> {
        let start = self.peek()?.range.start;
        self.skip_modifiers_and_annotations();

        // Generic method/constructor type parameters: `<T extends ...>`
        if self.at_kind(TokenKind::Lt) {
            self.skip_balanced(TokenKind::Lt, TokenKind::Gt);
        }

        if self.at_keyword("static") && self.peek_kind_n(1) == Some(TokenKind::LBrace) {
            self.bump();
            let body = self.parse_block();
            return Some(ast::MemberDecl::Initializer(ast::InitializerDecl {
                is_static: true,
                body,
                range: self.span_from(start),
            }));
        }

        if self.at_kind(TokenKind::LBrace) {
            let body = self.parse_block();
            return Some(ast::MemberDecl::Initializer(ast::InitializerDecl {
                is_static: false,
                body,
                range: self.span_from(start),
            }));
        }

        if self.peek_type_kind().is_some() {
            return self.parse_type_decl().map(ast::MemberDecl::Type);
        }

        // Constructors, including compact record constructors.
        let is_constructor = self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::Ident && t.text == enclosing_type)
            && matches!(
                self.peek_kind_n(1),
                Some(TokenKind::LParen | TokenKind::LBrace)
            );
        if is_constructor {
            let name = self.bump()?;
            let params = if self.at_kind(TokenKind::LParen) {
                self.parse_param_list()
            } else {
                Vec::new()
            };
            self.skip_throws_clause();
            let body = self.at_kind(TokenKind::LBrace).then(|| self.parse_block());
            return Some(ast::MemberDecl::Method(ast::MethodDecl {
                return_ty: None,
                name: name.text,
                name_range: name.range,
                params,
                body,
                range: self.span_from(start),
            }));
        }

        let return_ty = self.parse_type_ref()?;
        if !self.at_kind(TokenKind::Ident) {
            return None;
        }
        let name = self.bump()?;

        if self.at_kind(TokenKind::LParen) {
            let params = self.parse_param_list();
            // Legacy array dimensions after the parameter list: `int foo()[]`.
            while self.at_kind(TokenKind::LBracket) {
                self.skip_balanced(TokenKind::LBracket, TokenKind::RBracket);
            }
            self.skip_throws_clause();
            if self.eat_keyword("default") {
                // Annotation type element default value: `int value() default 1;`
                self.skip_until_top_level(&[TokenKind::Semi]);
            }
            let body = if self.at_kind(TokenKind::LBrace) {
                Some(self.parse_block())
            } else {
                self.eat(TokenKind::Semi);
                None
            };
            return Some(ast::MemberDecl::Method(ast::MethodDecl {
                return_ty: Some(return_ty),
                name: name.text,
                name_range: name.range,
                params,
                body,
                range: self.span_from(start),
            }));
        }

        self.skip_until_top_level(&[TokenKind::Semi]);
        self.eat(TokenKind::Semi);
        Some(ast::MemberDecl::Field(ast::FieldDecl {
            ty: return_ty,
            name: name.text,
            range: self.span_from(start),
        }))
    }

    fn skip_throws_clause(&mut self) {
        if !self.eat_keyword("throws") {
            return;
        }
        while !self.is_eof() && !self.at_kind(TokenKind::LBrace) && !self.at_kind(TokenKind::Semi) {
            self.bump();
        }
    }

    fn parse_param_list(&mut self) -> Vec<ast::ParamDecl> {
        self.eat(TokenKind::LParen);
        let mut params = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RParen) {
            self.skip_variable_modifiers_and_annotations();
            let Some(param) = self.parse_param() else {
                self.bump();
                continue;
            };
            params.push(param);
            self.eat(TokenKind::Comma);
        }
        self.eat(TokenKind::RParen);
        params
    }

    fn parse_param(&mut self) -> Option<ast::ParamDecl> {
        let mut ty = self.parse_type_ref()?;
        if self.at_kind(TokenKind::Ellipsis) {
            let dots = self.bump()?;
            ty.text.push_str(&dots.text);
            ty.range = Span::new(ty.range.start, dots.range.end);
        }
        if !self.at_kind(TokenKind::Ident) {
            return None;
        }
        let name = self.bump()?;
        while self.at_kind(TokenKind::LBracket) && self.peek_kind_n(1) == Some(TokenKind::RBracket) {
            self.bump_n(2);
        }
        Some(ast::ParamDecl {
            range: self.span_from(ty.range.start),
            ty,
            name: name.text,
            name_range: name.range,
        })
    }

    fn skip_variable_modifiers_and_annotations(&mut self) {
        loop {
            if self.at_kind(TokenKind::At) && !self.keyword_at(1, "interface") {
                self.skip_annotation();
                continue;
            }
            if self.eat_keyword("final") {
                continue;
            }
            break;
        }
    }

    // ---------------------------------------------------------------------
    // Types
    // ---------------------------------------------------------------------

    /// Parses `Name<Args>.Inner<Args>[]...`. Restores the cursor and returns
    /// `None` if the tokens do not form a type.
    fn parse_type_ref(&mut self) -> Option<ast::TypeRef> {
        let start_pos = self.pos;
        while self.at_kind(TokenKind::At) && !self.keyword_at(1, "interface") {
            self.skip_annotation();
        }

        let first = match self.peek() {
            Some(tok) if tok.kind == TokenKind::Ident && (!is_keyword(&tok.text) || is_primitive(&tok.text)) => {
                self.bump()?
            }
            _ => {
                self.pos = start_pos;
                return None;
            }
        };
        let start = first.range.start;
        let mut text = first.text;

        loop {
            if self.at_kind(TokenKind::Lt) {
                if !self.parse_type_args(&mut text) {
                    self.pos = start_pos;
                    return None;
                }
                continue;
            }
            if self.at_kind(TokenKind::Dot)
                && self
                    .peek_n(1)
                    .is_some_and(|t| t.kind == TokenKind::Ident && !is_keyword(&t.text))
            {
                self.bump();
                text.push('.');
                text.push_str(&self.bump()?.text);
                continue;
            }
            break;
        }

        while self.at_kind(TokenKind::LBracket) && self.peek_kind_n(1) == Some(TokenKind::RBracket) {
            self.bump_n(2);
            text.push_str("[]");
        }

        Some(ast::TypeRef {
            text,
            range: self.span_from(start),
        })
    }

    /// Consumes a `<...>` type argument list, appending its tokens to `text`.
    /// Returns `false` (leaving the cursor wherever it stopped) on tokens that
    /// cannot appear in type arguments.
    fn parse_type_args(&mut self, text: &mut String) -> bool {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => depth = depth.saturating_sub(1),
                TokenKind::Ident
                | TokenKind::Dot
                | TokenKind::Comma
                | TokenKind::Question
                | TokenKind::Amp
                | TokenKind::LBracket
                | TokenKind::RBracket
                | TokenKind::At => {}
                _ => return false,
            }
            if tok.kind == TokenKind::Comma {
                text.push(',');
            } else if tok.kind == TokenKind::Ident && matches!(tok.text.as_str(), "extends" | "super") {
                text.push(' ');
                text.push_str(&tok.text);
                text.push(' ');
            } else {
                text.push_str(&tok.text);
            }
            self.bump();
            if depth == 0 {
                return true;
            }
        }
        false
    }

    fn skip_type_args(&mut self) {
        let mut scratch = String::new();
        let start_pos = self.pos;
        if !self.parse_type_args(&mut scratch) {
            self.pos = start_pos;
        }
    }

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------

    fn parse_block(&mut self) -> ast::Block {
        let start = self.here();
        self.eat(TokenKind::LBrace);
        let mut statements = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RBrace) {
            statements.push(self.parse_stmt());
        }
        self.eat(TokenKind::RBrace);
        ast::Block {
            statements,
            range: self.span_from(start),
        }
    }

    /// Parses one statement. Always consumes at least one token unless at EOF.
    fn parse_stmt(&mut self) -> ast::Stmt {
        let Some((start, kind, keyword)) = self
            .peek()
            .map(|tok| (tok.range.start, tok.kind, tok.text.clone()))
        else {
            let end = self.prev_end();
            return ast::Stmt::Error(Span::new(end, end));
        };

        match kind {
            TokenKind::Semi => {
                self.bump();
                return ast::Stmt::Empty(self.span_from(start));
            }
            TokenKind::LBrace => return ast::Stmt::Block(self.parse_block()),
            // A leading annotation can only start a local declaration.
            TokenKind::At => return self.parse_local_decl_or_expr_stmt(start),
            TokenKind::Ident => {}
            _ => return self.parse_expr_stmt(start),
        }

        match keyword.as_str() {
            "if" => return self.parse_if(start),
            "while" => return self.parse_while(start),
            "do" => return self.parse_do(start),
            "for" => return self.parse_for(start),
            "switch" if self.peek_kind_n(1) == Some(TokenKind::LParen) => {
                return self.parse_switch(start)
            }
            "try" => return self.parse_try(start),
            "synchronized" if self.peek_kind_n(1) == Some(TokenKind::LParen) => {
                return self.parse_synchronized(start)
            }
            "return" => return self.parse_return(start),
            "break" | "continue" => return self.parse_jump(start, keyword == "break"),
            "throw" => return self.parse_throw(start),
            "assert" => return self.parse_assert(start),
            _ => {}
        }

        if self.at_plain_ident() && self.peek_kind_n(1) == Some(TokenKind::Colon) {
            return self.parse_labeled(start);
        }

        self.parse_local_decl_or_expr_stmt(start)
    }

    /// Local type or variable declaration, modifiers and annotations included;
    /// anything else is an expression statement.
    fn parse_local_decl_or_expr_stmt(&mut self, start: usize) -> ast::Stmt {
        if let Some(stmt) = self.try_parse_local_type_stmt(start) {
            return stmt;
        }

        if let Some(mut local) = self.try_parse_local_var_decl() {
            self.eat(TokenKind::Semi);
            local.range = self.span_from(start);
            return ast::Stmt::LocalVar(local);
        }

        self.parse_expr_stmt(start)
    }

    fn parse_expr_stmt(&mut self, start: usize) -> ast::Stmt {
        let Some(expr) = self.parse_expr() else {
            let tok = self.bump();
            return ast::Stmt::Error(tok.map_or(Span::new(start, start), |t| t.range));
        };
        self.eat(TokenKind::Semi);
        let range = self.span_from(start);

        match expr {
            ast::Expr::MethodCall(call) if matches!(call.name.as_str(), "this" | "super") => {
                let kind = if call.name == "this" {
                    ast::ConstructorCallKind::This
                } else {
                    ast::ConstructorCallKind::Super
                };
                ast::Stmt::ConstructorCall(ast::ConstructorCallStmt {
                    kind,
                    qualifier: call.receiver,
                    args: call.args,
                    range,
                })
            }
            expr => ast::Stmt::Expr(ast::ExprStmt { expr, range }),
        }
    }

    fn parse_paren_condition(&mut self) -> ast::Expr {
        self.eat(TokenKind::LParen);
        let expr = self.parse_expr().unwrap_or_else(|| self.missing());
        self.eat(TokenKind::RParen);
        expr
    }

    fn parse_if(&mut self, start: usize) -> ast::Stmt {
        self.bump();
        let condition = self.parse_paren_condition();
        let then_branch = Box::new(self.parse_stmt());
        let else_branch = self.eat_keyword("else").then(|| Box::new(self.parse_stmt()));
        ast::Stmt::If(ast::IfStmt {
            condition,
            then_branch,
            else_branch,
            range: self.span_from(start),
        })
    }

    fn parse_while(&mut self, start: usize) -> ast::Stmt {
        self.bump();
        let condition = self.parse_paren_condition();
        let body = Box::new(self.parse_stmt());
        ast::Stmt::While(ast::WhileStmt {
            condition,
            body,
            range: self.span_from(start),
        })
    }

    fn parse_do(&mut self, start: usize) -> ast::Stmt {
        self.bump();
        let body = Box::new(self.parse_stmt());
        self.eat_keyword("while");
        let condition = self.parse_paren_condition();
        self.eat(TokenKind::Semi);
        ast::Stmt::Do(ast::DoStmt {
            body,
            condition,
            range: self.span_from(start),
        })
    }

    fn parse_for(&mut self, start: usize) -> ast::Stmt {
        self.bump();
        self.eat(TokenKind::LParen);

        if let Some(var) = self.try_parse_foreach_header() {
            let iterable = self.parse_expr().unwrap_or_else(|| self.missing());
            self.eat(TokenKind::RParen);
            let body = Box::new(self.parse_stmt());
            return ast::Stmt::Foreach(ast::ForeachStmt {
                var,
                iterable,
                body,
                range: self.span_from(start),
            });
        }

        let init = if self.at_kind(TokenKind::Semi) {
            None
        } else if let Some(local) = self.try_parse_local_var_decl() {
            Some(ast::ForInit::LocalVar(local))
        } else {
            Some(ast::ForInit::Exprs(self.parse_expr_list(TokenKind::Semi)))
        };
        self.eat(TokenKind::Semi);

        let condition = if self.at_kind(TokenKind::Semi) {
            None
        } else {
            self.parse_expr()
        };
        self.eat(TokenKind::Semi);

        let update = self.parse_expr_list(TokenKind::RParen);
        self.eat(TokenKind::RParen);

        let body = Box::new(self.parse_stmt());
        ast::Stmt::For(ast::ForStmt {
            init,
            condition,
            update,
            body,
            range: self.span_from(start),
        })
    }

    /// `Type name :` inside `for (`; consumes through the colon on success.
    fn try_parse_foreach_header(&mut self) -> Option<ast::ParamDecl> {
        let start_pos = self.pos;
        self.skip_variable_modifiers_and_annotations();
        let var = self.parse_param();
        match var {
            Some(var) if self.eat(TokenKind::Colon) => Some(var),
            _ => {
                self.pos = start_pos;
                None
            }
        }
    }

    fn parse_expr_list(&mut self, terminator: TokenKind) -> Vec<ast::Expr> {
        let mut exprs = Vec::new();
        while !self.is_eof() && !self.at_kind(terminator) {
            match self.parse_expr() {
                Some(expr) => exprs.push(expr),
                None => {
                    exprs.push(self.missing());
                    self.bump();
                }
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        exprs
    }

    fn parse_switch(&mut self, start: usize) -> ast::Stmt {
        self.bump();
        let selector = self.parse_paren_condition();
        self.eat(TokenKind::LBrace);

        let mut groups = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RBrace) {
            groups.push(self.parse_switch_group());
        }
        self.eat(TokenKind::RBrace);

        ast::Stmt::Switch(ast::SwitchStmt {
            selector,
            groups,
            range: self.span_from(start),
        })
    }

    fn at_switch_label(&self) -> bool {
        self.at_keyword("case")
            || (self.at_keyword("default")
                && matches!(
                    self.peek_kind_n(1),
                    Some(TokenKind::Colon | TokenKind::Arrow)
                ))
    }

    fn parse_switch_group(&mut self) -> ast::SwitchGroup {
        let start = self.here();
        let mut labels = Vec::new();
        let mut is_arrow = false;

        while self.at_switch_label() {
            let label_start = self.here();
            let label = if self.eat_keyword("default") {
                None
            } else {
                self.bump();
                Some(self.parse_case_values())
            };
            if self.eat(TokenKind::Arrow) {
                is_arrow = true;
            } else {
                self.eat(TokenKind::Colon);
            }
            let range = self.span_from(label_start);
            labels.push(match label {
                Some(values) => ast::SwitchLabel::Case { values, range },
                None => ast::SwitchLabel::Default { range },
            });
            if is_arrow {
                break;
            }
        }

        let mut statements = Vec::new();
        if is_arrow {
            statements.push(self.parse_stmt());
        } else {
            while !self.is_eof() && !self.at_kind(TokenKind::RBrace) && !self.at_switch_label() {
                statements.push(self.parse_stmt());
            }
        }

        ast::SwitchGroup {
            labels,
            statements,
            is_arrow,
            range: self.span_from(start),
        }
    }

    fn parse_case_values(&mut self) -> Vec<ast::Expr> {
        let mut values = Vec::new();
        loop {
            let value_pos = self.pos;
            let value_start = self.here();
            let value = if self.eat_keyword("default") {
                // `case null, default ->`
                Some(ast::Expr::Pattern(self.span_from(value_start)))
            } else {
                self.parse_conditional()
            };
            let ends_cleanly = matches!(
                self.peek_kind_n(0),
                Some(TokenKind::Comma | TokenKind::Colon | TokenKind::Arrow)
            );
            match value {
                Some(value) if ends_cleanly => values.push(value),
                _ => {
                    // Type/record patterns and guards: keep the label text verbatim.
                    self.pos = value_pos;
                    self.skip_until_top_level(&[TokenKind::Comma, TokenKind::Colon, TokenKind::Arrow]);
                    values.push(ast::Expr::Pattern(self.span_from(value_start)));
                }
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        values
    }

    fn parse_synchronized(&mut self, start: usize) -> ast::Stmt {
        self.bump();
        let lock = self.parse_paren_condition();
        let body = self.parse_block();
        ast::Stmt::Synchronized(ast::SynchronizedStmt {
            lock,
            body,
            range: self.span_from(start),
        })
    }

    fn parse_try(&mut self, start: usize) -> ast::Stmt {
        self.bump();

        let mut resources = Vec::new();
        if self.eat(TokenKind::LParen) {
            while !self.is_eof() && !self.at_kind(TokenKind::RParen) {
                let resource_start = self.here();
                self.skip_until_top_level(&[TokenKind::Semi, TokenKind::RParen]);
                if self.prev_end() > resource_start {
                    resources.push(self.span_from(resource_start));
                }
                self.eat(TokenKind::Semi);
            }
            self.eat(TokenKind::RParen);
        }

        let body = self.parse_block();

        let mut catches = Vec::new();
        while self.at_keyword("catch") {
            let catch_start = self.here();
            self.bump();
            self.eat(TokenKind::LParen);
            self.skip_variable_modifiers_and_annotations();
            let mut types = Vec::new();
            if let Some(ty) = self.parse_type_ref() {
                types.push(ty);
            }
            while self.eat(TokenKind::Pipe) {
                if let Some(ty) = self.parse_type_ref() {
                    types.push(ty);
                }
            }
            let name = if self.at_kind(TokenKind::Ident) {
                self.bump().map(|t| t.text).unwrap_or_default()
            } else {
                String::new()
            };
            self.eat(TokenKind::RParen);
            let body = self.parse_block();
            catches.push(ast::CatchClause {
                types,
                name,
                body,
                range: self.span_from(catch_start),
            });
        }

        let finally = self.eat_keyword("finally").then(|| self.parse_block());

        ast::Stmt::Try(ast::TryStmt {
            resources,
            body,
            catches,
            finally,
            range: self.span_from(start),
        })
    }

    fn parse_return(&mut self, start: usize) -> ast::Stmt {
        self.bump();
        let expr = if self.at_kind(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr().unwrap_or_else(|| self.missing()))
        };
        self.eat(TokenKind::Semi);
        ast::Stmt::Return(ast::ReturnStmt {
            expr,
            range: self.span_from(start),
        })
    }

    fn parse_jump(&mut self, start: usize, is_break: bool) -> ast::Stmt {
        self.bump();
        let label = if self.at_plain_ident() {
            self.bump().map(|tok| ast::Label {
                name: tok.text,
                range: tok.range,
            })
        } else {
            None
        };
        self.eat(TokenKind::Semi);
        let stmt = ast::JumpStmt {
            label,
            range: self.span_from(start),
        };
        if is_break {
            ast::Stmt::Break(stmt)
        } else {
            ast::Stmt::Continue(stmt)
        }
    }

    fn parse_throw(&mut self, start: usize) -> ast::Stmt {
        self.bump();
        let expr = self.parse_expr().unwrap_or_else(|| self.missing());
        self.eat(TokenKind::Semi);
        ast::Stmt::Throw(ast::ThrowStmt {
            expr,
            range: self.span_from(start),
        })
    }

    fn parse_assert(&mut self, start: usize) -> ast::Stmt {
        self.bump();
        let condition = self.parse_expr().unwrap_or_else(|| self.missing());
        let message = self
            .eat(TokenKind::Colon)
            .then(|| self.parse_expr().unwrap_or_else(|| self.missing()));
        self.eat(TokenKind::Semi);
        ast::Stmt::Assert(ast::AssertStmt {
            condition,
            message,
            range: self.span_from(start),
        })
    }

    fn parse_labeled(&mut self, start: usize) -> ast::Stmt {
        let Some(tok) = self.bump() else {
            return ast::Stmt::Error(Span::new(start, start));
        };
        self.eat(TokenKind::Colon);
        let body = Box::new(self.parse_stmt());
        ast::Stmt::Labeled(ast::LabeledStmt {
            label: ast::Label {
                name: tok.text,
                range: tok.range,
            },
            body,
            range: self.span_from(start),
        })
    }

    fn try_parse_local_type_stmt(&mut self, start: usize) -> Option<ast::Stmt> {
        let start_pos = self.pos;
        self.skip_modifiers_and_annotations();
        let Some((kind, keyword_len)) = self.peek_type_kind() else {
            self.pos = start_pos;
            return None;
        };
        self.bump_n(keyword_len);
        let name = if self.at_kind(TokenKind::Ident) {
            self.bump().map(|t| t.text).unwrap_or_default()
        } else {
            String::new()
        };
        while !self.is_eof() && !self.at_kind(TokenKind::LBrace) {
            if self.at_kind(TokenKind::LParen) {
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
                continue;
            }
            self.bump();
        }
        self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
        Some(ast::Stmt::LocalType(ast::LocalTypeStmt {
            kind,
            name,
            range: self.span_from(start),
        }))
    }

    /// Parses `[final] Type name [= init], ...` without the terminating `;`.
    /// Restores the cursor and returns `None` if the tokens are not a declaration.
    fn try_parse_local_var_decl(&mut self) -> Option<ast::LocalVarStmt> {
        let start_pos = self.pos;
        let start = self.here();

        self.skip_variable_modifiers_and_annotations();
        let Some(ty) = self.parse_type_ref() else {
            self.pos = start_pos;
            return None;
        };

        let looks_like_declarator = self.at_plain_ident()
            && matches!(
                self.peek_kind_n(1),
                Some(
                    TokenKind::Eq
                        | TokenKind::Semi
                        | TokenKind::Comma
                        | TokenKind::LBracket
                        | TokenKind::Colon
                        | TokenKind::RParen
                )
            );
        if !looks_like_declarator {
            self.pos = start_pos;
            return None;
        }

        let mut declarators = Vec::new();
        while self.at_kind(TokenKind::Ident) {
            let Some(name) = self.bump() else {
                break;
            };
            while self.at_kind(TokenKind::LBracket) && self.peek_kind_n(1) == Some(TokenKind::RBracket) {
                self.bump_n(2);
            }
            let initializer = if self.eat(TokenKind::Eq) {
                Some(self.parse_var_initializer())
            } else {
                None
            };
            declarators.push(ast::VarDeclarator {
                range: self.span_from(name.range.start),
                name: name.text,
                name_range: name.range,
                initializer,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        Some(ast::LocalVarStmt {
            ty,
            declarators,
            range: self.span_from(start),
        })
    }

    fn parse_var_initializer(&mut self) -> ast::Expr {
        if self.at_kind(TokenKind::LBrace) {
            let start = self.here();
            self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
            return ast::Expr::ArrayInit(self.span_from(start));
        }
        self.parse_expr().unwrap_or_else(|| self.missing())
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    fn parse_expr(&mut self) -> Option<ast::Expr> {
        if self.at_lambda() {
            return Some(self.parse_lambda());
        }

        let lhs = self.parse_conditional()?;
        if let Some((op, len)) = self.peek_assign_op() {
            self.bump_n(len);
            let rhs = if self.at_kind(TokenKind::LBrace) {
                self.parse_var_initializer()
            } else {
                self.parse_expr().unwrap_or_else(|| self.missing())
            };
            return Some(ast::Expr::Assign(ast::AssignExpr {
                op,
                range: self.span_from(lhs.range().start),
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }));
        }
        Some(lhs)
    }

    fn at_lambda(&self) -> bool {
        if self.at_plain_ident() && self.peek_kind_n(1) == Some(TokenKind::Arrow) {
            return true;
        }
        if !self.at_kind(TokenKind::LParen) {
            return false;
        }
        let mut depth = 0usize;
        let mut idx = self.pos;
        while let Some(tok) = self.tokens.get(idx) {
            match tok.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self
                            .tokens
                            .get(idx + 1)
                            .is_some_and(|t| t.kind == TokenKind::Arrow);
                    }
                }
                TokenKind::Semi | TokenKind::LBrace | TokenKind::RBrace => return false,
                _ => {}
            }
            idx += 1;
        }
        false
    }

    fn parse_lambda(&mut self) -> ast::Expr {
        let start = self.here();
        if self.at_kind(TokenKind::LParen) {
            self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
        } else {
            self.bump();
        }
        self.eat(TokenKind::Arrow);
        if self.at_kind(TokenKind::LBrace) {
            self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
        } else if self.parse_expr().is_none() {
            return self.missing();
        }
        ast::Expr::Lambda(self.span_from(start))
    }

    fn peek_assign_op(&self) -> Option<(ast::AssignOp, usize)> {
        use ast::AssignOp;
        let op = match self.peek_kind_n(0)? {
            TokenKind::Eq => (AssignOp::Assign, 1),
            TokenKind::PlusEq => (AssignOp::Add, 1),
            TokenKind::MinusEq => (AssignOp::Sub, 1),
            TokenKind::StarEq => (AssignOp::Mul, 1),
            TokenKind::SlashEq => (AssignOp::Div, 1),
            TokenKind::PercentEq => (AssignOp::Rem, 1),
            TokenKind::AmpEq => (AssignOp::BitAnd, 1),
            TokenKind::PipeEq => (AssignOp::BitOr, 1),
            TokenKind::CaretEq => (AssignOp::BitXor, 1),
            TokenKind::LtLtEq => (AssignOp::Shl, 1),
            TokenKind::Gt => match (self.peek_kind_n(1), self.peek_kind_n(2)) {
                (Some(TokenKind::Gt), Some(TokenKind::GtEq)) if self.adjacent(1) && self.adjacent(2) => {
                    (AssignOp::UShr, 3)
                }
                (Some(TokenKind::GtEq), _) if self.adjacent(1) => (AssignOp::Shr, 2),
                _ => return None,
            },
            _ => return None,
        };
        Some(op)
    }

    fn peek_binary_op(&self) -> Option<(ast::BinaryOp, usize)> {
        use ast::BinaryOp;
        let op = match self.peek_kind_n(0)? {
            TokenKind::PipePipe => (BinaryOp::Or, 1),
            TokenKind::AmpAmp => (BinaryOp::And, 1),
            TokenKind::Pipe => (BinaryOp::BitOr, 1),
            TokenKind::Caret => (BinaryOp::BitXor, 1),
            TokenKind::Amp => (BinaryOp::BitAnd, 1),
            TokenKind::EqEq => (BinaryOp::Eq, 1),
            TokenKind::BangEq => (BinaryOp::Ne, 1),
            TokenKind::Lt => (BinaryOp::Lt, 1),
            TokenKind::LtEq => (BinaryOp::Le, 1),
            TokenKind::GtEq => (BinaryOp::Ge, 1),
            TokenKind::LtLt => (BinaryOp::Shl, 1),
            TokenKind::Plus => (BinaryOp::Add, 1),
            TokenKind::Minus => (BinaryOp::Sub, 1),
            TokenKind::Star => (BinaryOp::Mul, 1),
            TokenKind::Slash => (BinaryOp::Div, 1),
            TokenKind::Percent => (BinaryOp::Rem, 1),
            TokenKind::Gt => {
                let second = self.adjacent(1).then(|| self.peek_kind_n(1)).flatten();
                let third = self.adjacent(2).then(|| self.peek_kind_n(2)).flatten();
                match (second, third) {
                    (Some(TokenKind::Gt), Some(TokenKind::Gt)) => (BinaryOp::UShr, 3),
                    // `>>>=` and `>>=` are assignments.
                    (Some(TokenKind::Gt), Some(TokenKind::GtEq)) | (Some(TokenKind::GtEq), _) => {
                        return None
                    }
                    (Some(TokenKind::Gt), _) => (BinaryOp::Shr, 2),
                    _ => (BinaryOp::Gt, 1),
                }
            }
            _ => return None,
        };
        Some(op)
    }

    fn parse_conditional(&mut self) -> Option<ast::Expr> {
        let condition = self.parse_binary(0)?;
        if !self.eat(TokenKind::Question) {
            return Some(condition);
        }
        let then_expr = self.parse_expr().unwrap_or_else(|| self.missing());
        self.eat(TokenKind::Colon);
        let else_expr = if self.at_lambda() {
            self.parse_lambda()
        } else {
            self.parse_conditional().unwrap_or_else(|| self.missing())
        };
        Some(ast::Expr::Conditional(ast::ConditionalExpr {
            range: self.span_from(condition.range().start),
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }))
    }

    fn parse_binary(&mut self, min_prec: u8) -> Option<ast::Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            if self.at_keyword("instanceof") {
                if ast::INSTANCEOF_PRECEDENCE < min_prec {
                    break;
                }
                self.bump();
                self.eat_keyword("final");
                let ty = self.parse_type_ref().unwrap_or_else(|| ast::TypeRef {
                    text: String::new(),
                    range: Span::new(self.here(), self.here()),
                });
                if self.at_kind(TokenKind::LParen) {
                    // Record pattern components.
                    self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
                }
                let binding = if self.at_plain_ident() {
                    self.bump().map(|t| t.text)
                } else {
                    None
                };
                lhs = ast::Expr::InstanceOf(ast::InstanceOfExpr {
                    range: self.span_from(lhs.range().start),
                    expr: Box::new(lhs),
                    ty,
                    binding,
                });
                continue;
            }

            let Some((op, len)) = self.peek_binary_op() else {
                break;
            };
            if op.precedence() < min_prec {
                break;
            }
            self.bump_n(len);
            let rhs = self
                .parse_binary(op.precedence() + 1)
                .unwrap_or_else(|| self.missing());
            lhs = ast::Expr::Binary(ast::BinaryExpr {
                op,
                range: self.span_from(lhs.range().start),
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }
        Some(lhs)
    }

    fn parse_unary(&mut self) -> Option<ast::Expr> {
        let start = self.here();
        let op = match self.peek_kind_n(0)? {
            TokenKind::Plus => Some(ast::UnaryOp::Plus),
            TokenKind::Minus => Some(ast::UnaryOp::Minus),
            TokenKind::Bang => Some(ast::UnaryOp::Not),
            TokenKind::Tilde => Some(ast::UnaryOp::Complement),
            TokenKind::PlusPlus => Some(ast::UnaryOp::PreIncrement),
            TokenKind::MinusMinus => Some(ast::UnaryOp::PreDecrement),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let operand = self.parse_unary().unwrap_or_else(|| self.missing());
            return Some(ast::Expr::Unary(ast::UnaryExpr {
                op,
                operand: Box::new(operand),
                range: self.span_from(start),
            }));
        }

        if self.at_kind(TokenKind::LParen) {
            if let Some(cast) = self.try_parse_cast() {
                return Some(cast);
            }
        }

        self.parse_postfix()
    }

    fn try_parse_cast(&mut self) -> Option<ast::Expr> {
        let start_pos = self.pos;
        let start = self.here();
        self.bump();

        let Some(mut ty) = self.parse_type_ref() else {
            self.pos = start_pos;
            return None;
        };
        // Intersection casts: `(A & B) x`.
        while self.at_kind(TokenKind::Amp) {
            self.bump();
            match self.parse_type_ref() {
                Some(extra) => {
                    ty.text.push('&');
                    ty.text.push_str(&extra.text);
                    ty.range = ty.range.cover(extra.range);
                }
                None => {
                    self.pos = start_pos;
                    return None;
                }
            }
        }
        if !self.eat(TokenKind::RParen) {
            self.pos = start_pos;
            return None;
        }

        let primitive = is_primitive(ty.text.trim_end_matches("[]"));
        let operand_follows = self.peek().is_some_and(|tok| match tok.kind {
            TokenKind::Ident => {
                !is_keyword(&tok.text)
                    || matches!(
                        tok.text.as_str(),
                        "this" | "super" | "new" | "true" | "false" | "null" | "switch"
                    )
            }
            TokenKind::LParen | TokenKind::Bang | TokenKind::Tilde => true,
            kind => kind.is_literal(),
        });
        let signed_operand = matches!(
            self.peek_kind_n(0),
            Some(TokenKind::Plus | TokenKind::Minus | TokenKind::PlusPlus | TokenKind::MinusMinus)
        );
        if !(operand_follows || (primitive && signed_operand)) {
            self.pos = start_pos;
            return None;
        }

        let expr = if self.at_lambda() {
            self.parse_lambda()
        } else {
            self.parse_unary().unwrap_or_else(|| self.missing())
        };
        Some(ast::Expr::Cast(ast::CastExpr {
            ty,
            expr: Box::new(expr),
            range: self.span_from(start),
        }))
    }

    fn parse_postfix(&mut self) -> Option<ast::Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            let start = expr.range().start;
            match self.peek_kind_n(0) {
                Some(TokenKind::Dot) => {
                    self.bump();
                    if self.at_kind(TokenKind::Lt) {
                        // Explicit type arguments: `Collections.<T>emptyList()`.
                        self.skip_type_args();
                    }
                    let Some(name) = self.peek().filter(|t| t.kind == TokenKind::Ident).cloned() else {
                        break;
                    };
                    match name.text.as_str() {
                        "new" => {
                            expr = self.parse_new(Some(expr), start);
                        }
                        "class" => {
                            self.bump();
                            expr = ast::Expr::ClassLiteral(self.span_from(start));
                        }
                        _ => {
                            self.bump();
                            if self.at_kind(TokenKind::LParen) {
                                let args = self.parse_args();
                                expr = ast::Expr::MethodCall(ast::MethodCallExpr {
                                    receiver: Some(Box::new(expr)),
                                    name: name.text,
                                    name_range: name.range,
                                    args,
                                    range: self.span_from(start),
                                });
                            } else {
                                expr = ast::Expr::FieldAccess(ast::FieldAccessExpr {
                                    receiver: Box::new(expr),
                                    name: name.text,
                                    name_range: name.range,
                                    range: self.span_from(start),
                                });
                            }
                        }
                    }
                }
                Some(TokenKind::LBracket) => {
                    if self.peek_kind_n(1) == Some(TokenKind::RBracket) {
                        // Array type in `String[].class` / `int[]::new`.
                        while self.at_kind(TokenKind::LBracket)
                            && self.peek_kind_n(1) == Some(TokenKind::RBracket)
                        {
                            self.bump_n(2);
                        }
                        if self.at_kind(TokenKind::Dot) && self.keyword_at(1, "class") {
                            self.bump_n(2);
                            expr = ast::Expr::ClassLiteral(self.span_from(start));
                        }
                        continue;
                    }
                    self.bump();
                    let index = self.parse_expr().unwrap_or_else(|| self.missing());
                    self.eat(TokenKind::RBracket);
                    expr = ast::Expr::ArrayAccess(ast::ArrayAccessExpr {
                        array: Box::new(expr),
                        index: Box::new(index),
                        range: self.span_from(start),
                    });
                }
                Some(TokenKind::ColonColon) => {
                    self.bump();
                    if self.at_kind(TokenKind::Lt) {
                        self.skip_type_args();
                    }
                    if self.at_kind(TokenKind::Ident) {
                        self.bump();
                    }
                    expr = ast::Expr::MethodRef(self.span_from(start));
                }
                Some(TokenKind::Lt) if matches!(expr, ast::Expr::Name(_) | ast::Expr::FieldAccess(_)) => {
                    // Generic type before a method reference: `List<String>::size`.
                    let pos = self.pos;
                    self.skip_type_args();
                    if self.pos == pos || !self.at_kind(TokenKind::ColonColon) {
                        self.pos = pos;
                        break;
                    }
                }
                Some(TokenKind::PlusPlus) | Some(TokenKind::MinusMinus) => {
                    let op = if self.at_kind(TokenKind::PlusPlus) {
                        ast::PostfixOp::Increment
                    } else {
                        ast::PostfixOp::Decrement
                    };
                    self.bump();
                    expr = ast::Expr::Postfix(ast::PostfixExpr {
                        op,
                        operand: Box::new(expr),
                        range: self.span_from(start),
                    });
                }
                _ => break,
            }
        }
        Some(expr)
    }

    fn parse_primary(&mut self) -> Option<ast::Expr> {
        let tok = self.peek()?.clone();
        let start = tok.range.start;
        let literal = |kind| {
            ast::Expr::Literal(ast::LiteralExpr {
                kind,
                value: tok.text.clone(),
                range: tok.range,
            })
        };

        let expr = match tok.kind {
            TokenKind::IntLiteral => literal(ast::LiteralKind::Int),
            TokenKind::FloatLiteral => literal(ast::LiteralKind::Float),
            TokenKind::CharLiteral => literal(ast::LiteralKind::Char),
            TokenKind::StringLiteral => literal(ast::LiteralKind::String),
            TokenKind::TextBlock => literal(ast::LiteralKind::TextBlock),
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr().unwrap_or_else(|| self.missing());
                self.eat(TokenKind::RParen);
                return Some(ast::Expr::Paren(ast::ParenExpr {
                    inner: Box::new(inner),
                    range: self.span_from(start),
                }));
            }
            TokenKind::LBrace => {
                self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
                return Some(ast::Expr::ArrayInit(self.span_from(start)));
            }
            TokenKind::Lt => {
                // Explicit constructor type arguments: `<T>this(..)`.
                self.skip_type_args();
                return self.parse_primary();
            }
            TokenKind::Ident => match tok.text.as_str() {
                "true" | "false" => literal(ast::LiteralKind::Bool),
                "null" => literal(ast::LiteralKind::Null),
                "this" | "super" => {
                    self.bump();
                    if self.at_kind(TokenKind::LParen) {
                        let args = self.parse_args();
                        return Some(ast::Expr::MethodCall(ast::MethodCallExpr {
                            receiver: None,
                            name: tok.text.clone(),
                            name_range: tok.range,
                            args,
                            range: self.span_from(start),
                        }));
                    }
                    return Some(if tok.text == "this" {
                        ast::Expr::This(tok.range)
                    } else {
                        ast::Expr::Super(tok.range)
                    });
                }
                "new" => return Some(self.parse_new(None, start)),
                "switch" => {
                    self.bump();
                    if self.at_kind(TokenKind::LParen) {
                        self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
                    }
                    self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
                    return Some(ast::Expr::Switch(self.span_from(start)));
                }
                text if is_primitive(text) => {
                    // Only reachable as `int.class`, `int[].class` or `int[]::new`.
                    self.bump();
                    while self.at_kind(TokenKind::LBracket) && self.peek_kind_n(1) == Some(TokenKind::RBracket) {
                        self.bump_n(2);
                    }
                    if self.at_kind(TokenKind::Dot) && self.keyword_at(1, "class") {
                        self.bump_n(2);
                        return Some(ast::Expr::ClassLiteral(self.span_from(start)));
                    }
                    return Some(ast::Expr::Name(ast::NameExpr {
                        name: tok.text.clone(),
                        range: self.span_from(start),
                    }));
                }
                text if is_keyword(text) => return None,
                _ if self.peek_kind_n(1) == Some(TokenKind::LParen) => {
                    self.bump();
                    let args = self.parse_args();
                    return Some(ast::Expr::MethodCall(ast::MethodCallExpr {
                        receiver: None,
                        name: tok.text.clone(),
                        name_range: tok.range,
                        args,
                        range: self.span_from(start),
                    }));
                }
                _ => ast::Expr::Name(ast::NameExpr {
                    name: tok.text.clone(),
                    range: tok.range,
                }),
            },
            _ => return None,
        };
        self.bump();
        Some(expr)
    }

    /// Parses `new ...` at the cursor; `qualifier` is the enclosing instance of
    /// `outer.new Inner()`.
    fn parse_new(&mut self, qualifier: Option<ast::Expr>, start: usize) -> ast::Expr {
        self.eat_keyword("new");
        if self.at_kind(TokenKind::Lt) {
            self.skip_type_args();
        }
        let ty = self.parse_type_ref().unwrap_or_else(|| ast::TypeRef {
            text: String::new(),
            range: Span::new(self.here(), self.here()),
        });

        let is_array = self.at_kind(TokenKind::LBracket)
            || (ty.text.ends_with("[]") && self.at_kind(TokenKind::LBrace));
        if is_array {
            while self.at_kind(TokenKind::LBracket) {
                self.skip_balanced(TokenKind::LBracket, TokenKind::RBracket);
            }
            if self.at_kind(TokenKind::LBrace) {
                self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
            }
            return ast::Expr::NewArray(self.span_from(start));
        }

        let args = if self.at_kind(TokenKind::LParen) {
            self.parse_args()
        } else {
            Vec::new()
        };
        let body = if self.at_kind(TokenKind::LBrace) {
            let body_start = self.here();
            self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
            Some(self.span_from(body_start))
        } else {
            None
        };
        ast::Expr::New(ast::NewExpr {
            qualifier: qualifier.map(Box::new),
            ty,
            args,
            body,
            range: self.span_from(start),
        })
    }

    fn parse_args(&mut self) -> Vec<ast::Expr> {
        self.eat(TokenKind::LParen);
        let mut args = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RParen) {
            match self.parse_expr() {
                Some(expr) => args.push(expr),
                None => {
                    args.push(self.missing());
                    self.bump();
                }
            }
            if !self.eat(TokenKind::Comma) && !self.at_kind(TokenKind::RParen) {
                // Recover from junk inside the argument list.
                self.skip_until_top_level(&[TokenKind::Comma, TokenKind::RParen]);
                self.eat(TokenKind::Comma);
            }
        }
        self.eat(TokenKind::RParen);
        args
    }

    // ---------------------------------------------------------------------
    // Token skipping
    // ---------------------------------------------------------------------

    fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) {
        if !self.at_kind(open) {
            return;
        }
        self.bump();
        let mut depth = 1usize;
        while !self.is_eof() && depth > 0 {
            match self.peek_kind_n(0) {
                Some(k) if k == open => depth += 1,
                Some(k) if k == close => depth -= 1,
                _ => {}
            }
            self.bump();
        }
    }

    /// Advances until one of `stops` appears outside any bracket nesting, or
    /// until an unmatched closing bracket.
    fn skip_until_top_level(&mut self, stops: &[TokenKind]) {
        let mut depth = 0usize;
        while let Some(kind) = self.peek_kind_n(0) {
            if depth == 0 && stops.contains(&kind) {
                break;
            }
            match kind {
                TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.bump();
        }
    }
}
