//! Spanned Java AST for compilation units and method bodies.
//!
//! Every node records the half-open byte [`Span`] of the source it was parsed
//! from. Spans are file-relative.

use nova_core::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub package: Option<String>,
    pub types: Vec<TypeDecl>,
    pub range: Span,
}

impl CompilationUnit {
    /// Finds the first method or constructor named `name`, searching nested
    /// types depth-first in declaration order.
    pub fn find_method(&self, name: &str) -> Option<&MethodDecl> {
        self.types.iter().find_map(|ty| ty.find_method(name))
    }

    /// All methods and constructors in declaration order, nested types included.
    pub fn methods(&self) -> Vec<&MethodDecl> {
        let mut out = Vec::new();
        for ty in &self.types {
            ty.collect_methods(&mut out);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    pub name_range: Span,
    pub members: Vec<MemberDecl>,
    pub range: Span,
}

impl TypeDecl {
    pub fn find_method(&self, name: &str) -> Option<&MethodDecl> {
        self.members.iter().find_map(|member| match member {
            MemberDecl::Method(method) if method.name == name => Some(method),
            MemberDecl::Type(nested) => nested.find_method(name),
            _ => None,
        })
    }

    fn collect_methods<'a>(&'a self, out: &mut Vec<&'a MethodDecl>) {
        for member in &self.members {
            match member {
                MemberDecl::Method(method) => out.push(method),
                MemberDecl::Type(nested) => nested.collect_methods(out),
                MemberDecl::Field(_) | MemberDecl::Initializer(_) => {}
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDecl {
    Field(FieldDecl),
    Method(MethodDecl),
    Initializer(InitializerDecl),
    Type(TypeDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Token texts concatenated without whitespace, e.g. `Map<String,Integer>[]`.
    pub text: String,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub ty: TypeRef,
    pub name: String,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub ty: TypeRef,
    pub name: String,
    pub name_range: Span,
    pub range: Span,
}

/// A method or constructor. Constructors have no return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub return_ty: Option<TypeRef>,
    pub name: String,
    pub name_range: Span,
    pub params: Vec<ParamDecl>,
    pub body: Option<Block>,
    pub range: Span,
}

impl MethodDecl {
    pub fn is_constructor(&self) -> bool {
        self.return_ty.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializerDecl {
    pub is_static: bool,
    pub body: Block,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    LocalVar(LocalVarStmt),
    LocalType(LocalTypeStmt),
    Expr(ExprStmt),
    ConstructorCall(ConstructorCallStmt),
    Assert(AssertStmt),
    Break(JumpStmt),
    Continue(JumpStmt),
    Return(ReturnStmt),
    Throw(ThrowStmt),
    If(IfStmt),
    While(WhileStmt),
    Do(DoStmt),
    For(ForStmt),
    Foreach(ForeachStmt),
    Switch(SwitchStmt),
    Synchronized(SynchronizedStmt),
    Try(TryStmt),
    Labeled(LabeledStmt),
    Block(Block),
    Empty(Span),
    /// Tokens the parser could not make sense of.
    Error(Span),
}

impl Stmt {
    pub fn range(&self) -> Span {
        match self {
            Stmt::LocalVar(stmt) => stmt.range,
            Stmt::LocalType(stmt) => stmt.range,
            Stmt::Expr(stmt) => stmt.range,
            Stmt::ConstructorCall(stmt) => stmt.range,
            Stmt::Assert(stmt) => stmt.range,
            Stmt::Break(stmt) | Stmt::Continue(stmt) => stmt.range,
            Stmt::Return(stmt) => stmt.range,
            Stmt::Throw(stmt) => stmt.range,
            Stmt::If(stmt) => stmt.range,
            Stmt::While(stmt) => stmt.range,
            Stmt::Do(stmt) => stmt.range,
            Stmt::For(stmt) => stmt.range,
            Stmt::Foreach(stmt) => stmt.range,
            Stmt::Switch(stmt) => stmt.range,
            Stmt::Synchronized(stmt) => stmt.range,
            Stmt::Try(stmt) => stmt.range,
            Stmt::Labeled(stmt) => stmt.range,
            Stmt::Block(block) => block.range,
            Stmt::Empty(range) | Stmt::Error(range) => *range,
        }
    }

    /// Short human-readable name of the statement kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::LocalVar(_) => "local variable declaration",
            Stmt::LocalType(_) => "local type declaration",
            Stmt::Expr(_) => "expression statement",
            Stmt::ConstructorCall(_) => "explicit constructor call",
            Stmt::Assert(_) => "assert statement",
            Stmt::Break(_) => "break statement",
            Stmt::Continue(_) => "continue statement",
            Stmt::Return(_) => "return statement",
            Stmt::Throw(_) => "throw statement",
            Stmt::If(_) => "if statement",
            Stmt::While(_) => "while statement",
            Stmt::Do(_) => "do statement",
            Stmt::For(_) => "for statement",
            Stmt::Foreach(_) => "enhanced for statement",
            Stmt::Switch(_) => "switch statement",
            Stmt::Synchronized(_) => "synchronized statement",
            Stmt::Try(_) => "try statement",
            Stmt::Labeled(_) => "labeled statement",
            Stmt::Block(_) => "block",
            Stmt::Empty(_) => "empty statement",
            Stmt::Error(_) => "unparsed statement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVarStmt {
    pub ty: TypeRef,
    pub declarators: Vec<VarDeclarator>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDeclarator {
    pub name: String,
    pub name_range: Span,
    pub initializer: Option<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTypeStmt {
    pub kind: TypeKind,
    pub name: String,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub range: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructorCallKind {
    This,
    Super,
}

/// `this(..)`, `super(..)` or `outer.super(..)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorCallStmt {
    pub kind: ConstructorCallKind,
    pub qualifier: Option<Box<Expr>>,
    pub args: Vec<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertStmt {
    pub condition: Expr,
    pub message: Option<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub range: Span,
}

/// `break` or `continue` with an optional label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpStmt {
    pub label: Option<Label>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStmt {
    pub expr: Option<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrowStmt {
    pub expr: Expr,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoStmt {
    pub body: Box<Stmt>,
    pub condition: Expr,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForInit {
    LocalVar(LocalVarStmt),
    Exprs(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForStmt {
    pub init: Option<ForInit>,
    pub condition: Option<Expr>,
    pub update: Vec<Expr>,
    pub body: Box<Stmt>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeachStmt {
    pub var: ParamDecl,
    pub iterable: Expr,
    pub body: Box<Stmt>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchStmt {
    pub selector: Expr,
    pub groups: Vec<SwitchGroup>,
    pub range: Span,
}

/// Consecutive labels followed by the statements they guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchGroup {
    pub labels: Vec<SwitchLabel>,
    pub statements: Vec<Stmt>,
    /// `case X -> ...` rather than `case X: ...`.
    pub is_arrow: bool,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchLabel {
    Case { values: Vec<Expr>, range: Span },
    Default { range: Span },
}

impl SwitchLabel {
    pub fn range(&self) -> Span {
        match self {
            SwitchLabel::Case { range, .. } | SwitchLabel::Default { range } => *range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynchronizedStmt {
    pub lock: Expr,
    pub body: Block,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryStmt {
    /// Resource specifications of a try-with-resources, one span per resource.
    pub resources: Vec<Span>,
    pub body: Block,
    pub catches: Vec<CatchClause>,
    pub finally: Option<Block>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchClause {
    /// Caught types; more than one for multi-catch (`A | B`).
    pub types: Vec<TypeRef>,
    pub name: String,
    pub body: Block,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledStmt {
    pub label: Label,
    pub body: Box<Stmt>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Name(NameExpr),
    Literal(LiteralExpr),
    This(Span),
    Super(Span),
    FieldAccess(FieldAccessExpr),
    ArrayAccess(ArrayAccessExpr),
    MethodCall(MethodCallExpr),
    New(NewExpr),
    Unary(UnaryExpr),
    Postfix(PostfixExpr),
    Binary(BinaryExpr),
    InstanceOf(InstanceOfExpr),
    Conditional(ConditionalExpr),
    Assign(AssignExpr),
    Cast(CastExpr),
    Paren(ParenExpr),
    /// Array creation (`new int[3]`, `new T[] { .. }`).
    NewArray(Span),
    /// Bare array initializer (`{ 1, 2 }`) in a declaration.
    ArrayInit(Span),
    Lambda(Span),
    MethodRef(Span),
    ClassLiteral(Span),
    Switch(Span),
    /// Type or record pattern in a `case` label, guard included.
    Pattern(Span),
    Missing(Span),
}

impl Expr {
    pub fn range(&self) -> Span {
        match self {
            Expr::Name(expr) => expr.range,
            Expr::Literal(expr) => expr.range,
            Expr::FieldAccess(expr) => expr.range,
            Expr::ArrayAccess(expr) => expr.range,
            Expr::MethodCall(expr) => expr.range,
            Expr::New(expr) => expr.range,
            Expr::Unary(expr) => expr.range,
            Expr::Postfix(expr) => expr.range,
            Expr::Binary(expr) => expr.range,
            Expr::InstanceOf(expr) => expr.range,
            Expr::Conditional(expr) => expr.range,
            Expr::Assign(expr) => expr.range,
            Expr::Cast(expr) => expr.range,
            Expr::Paren(expr) => expr.range,
            Expr::This(range)
            | Expr::Super(range)
            | Expr::NewArray(range)
            | Expr::ArrayInit(range)
            | Expr::Lambda(range)
            | Expr::MethodRef(range)
            | Expr::ClassLiteral(range)
            | Expr::Switch(range)
            | Expr::Pattern(range)
            | Expr::Missing(range) => *range,
        }
    }

    /// Short human-readable name of the expression kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Name(_) => "name",
            Expr::Literal(_) => "literal",
            Expr::This(_) => "this",
            Expr::Super(_) => "super",
            Expr::FieldAccess(_) => "field access",
            Expr::ArrayAccess(_) => "array access",
            Expr::MethodCall(_) => "method call",
            Expr::New(_) => "class instance creation",
            Expr::Unary(_) => "unary expression",
            Expr::Postfix(_) => "postfix expression",
            Expr::Binary(_) => "binary expression",
            Expr::InstanceOf(_) => "instanceof expression",
            Expr::Conditional(_) => "conditional expression",
            Expr::Assign(_) => "assignment",
            Expr::Cast(_) => "cast expression",
            Expr::Paren(_) => "parenthesized expression",
            Expr::NewArray(_) => "array creation",
            Expr::ArrayInit(_) => "array initializer",
            Expr::Lambda(_) => "lambda expression",
            Expr::MethodRef(_) => "method reference",
            Expr::ClassLiteral(_) => "class literal",
            Expr::Switch(_) => "switch expression",
            Expr::Pattern(_) => "pattern",
            Expr::Missing(_) => "missing expression",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameExpr {
    pub name: String,
    pub range: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Int,
    Float,
    Char,
    String,
    TextBlock,
    Bool,
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralExpr {
    pub kind: LiteralKind,
    /// Source text of the literal, quotes included.
    pub value: String,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessExpr {
    pub receiver: Box<Expr>,
    pub name: String,
    pub name_range: Span,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayAccessExpr {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCallExpr {
    /// `None` for unqualified calls (`foo()`, `this(..)`).
    pub receiver: Option<Box<Expr>>,
    pub name: String,
    pub name_range: Span,
    pub args: Vec<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpr {
    /// Enclosing instance of a qualified allocation (`outer.new Inner()`).
    pub qualifier: Option<Box<Expr>>,
    pub ty: TypeRef,
    pub args: Vec<Expr>,
    /// Anonymous class body, if any.
    pub body: Option<Span>,
    pub range: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    Complement,
    PreIncrement,
    PreDecrement,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::Complement => "~",
            UnaryOp::PreIncrement => "++",
            UnaryOp::PreDecrement => "--",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

impl PostfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PostfixOp::Increment => "++",
            PostfixOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostfixExpr {
    pub op: PostfixOp,
    pub operand: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }

    /// Binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::BitOr => 3,
            BinaryOp::BitXor => 4,
            BinaryOp::BitAnd => 5,
            BinaryOp::Eq | BinaryOp::Ne => 6,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => 7,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 8,
            BinaryOp::Add | BinaryOp::Sub => 9,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 10,
        }
    }
}

/// Precedence of `instanceof`, shared with the relational operators.
pub const INSTANCEOF_PRECEDENCE: u8 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceOfExpr {
    pub expr: Box<Expr>,
    pub ty: TypeRef,
    /// Pattern binding (`x instanceof Foo f`).
    pub binding: Option<String>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalExpr {
    pub condition: Box<Expr>,
    pub then_expr: Box<Expr>,
    pub else_expr: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::UShr => ">>>=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignExpr {
    pub op: AssignOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastExpr {
    pub ty: TypeRef,
    pub expr: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParenExpr {
    pub inner: Box<Expr>,
    pub range: Span,
}
