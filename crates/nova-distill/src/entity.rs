use std::fmt;

use nova_core::SourceRange;
use serde::{Deserialize, Serialize};

/// Semantic label attached to every node of a distilled tree.
///
/// Leaf types carry a textual value and never receive children from the body
/// converter; composite types group the statements nested inside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    // Structural groups.
    Method,
    Body,
    IfStatement,
    ThenStatement,
    ElseStatement,
    ForStatement,
    ForeachStatement,
    WhileStatement,
    DoStatement,
    SwitchStatement,
    TryStatement,
    CatchClauses,
    CatchClause,
    Finally,
    SynchronizedStatement,
    LabeledStatement,

    // Leaves.
    Assignment,
    PostfixExpression,
    PrefixExpression,
    ClassInstanceCreation,
    MethodInvocation,
    ConstructorInvocation,
    VariableDeclarationStatement,
    TypeDeclarationStatement,
    ReturnStatement,
    BreakStatement,
    ContinueStatement,
    ThrowStatement,
    AssertStatement,
    SwitchCase,
}

impl EntityType {
    pub const ALL: [EntityType; 30] = [
        EntityType::Method,
        EntityType::Body,
        EntityType::IfStatement,
        EntityType::ThenStatement,
        EntityType::ElseStatement,
        EntityType::ForStatement,
        EntityType::ForeachStatement,
        EntityType::WhileStatement,
        EntityType::DoStatement,
        EntityType::SwitchStatement,
        EntityType::TryStatement,
        EntityType::CatchClauses,
        EntityType::CatchClause,
        EntityType::Finally,
        EntityType::SynchronizedStatement,
        EntityType::LabeledStatement,
        EntityType::Assignment,
        EntityType::PostfixExpression,
        EntityType::PrefixExpression,
        EntityType::ClassInstanceCreation,
        EntityType::MethodInvocation,
        EntityType::ConstructorInvocation,
        EntityType::VariableDeclarationStatement,
        EntityType::TypeDeclarationStatement,
        EntityType::ReturnStatement,
        EntityType::BreakStatement,
        EntityType::ContinueStatement,
        EntityType::ThrowStatement,
        EntityType::AssertStatement,
        EntityType::SwitchCase,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            EntityType::Method => "METHOD",
            EntityType::Body => "BODY",
            EntityType::IfStatement => "IF_STATEMENT",
            EntityType::ThenStatement => "THEN_STATEMENT",
            EntityType::ElseStatement => "ELSE_STATEMENT",
            EntityType::ForStatement => "FOR_STATEMENT",
            EntityType::ForeachStatement => "FOREACH_STATEMENT",
            EntityType::WhileStatement => "WHILE_STATEMENT",
            EntityType::DoStatement => "DO_STATEMENT",
            EntityType::SwitchStatement => "SWITCH_STATEMENT",
            EntityType::TryStatement => "TRY_STATEMENT",
            EntityType::CatchClauses => "CATCH_CLAUSES",
            EntityType::CatchClause => "CATCH_CLAUSE",
            EntityType::Finally => "FINALLY",
            EntityType::SynchronizedStatement => "SYNCHRONIZED_STATEMENT",
            EntityType::LabeledStatement => "LABELED_STATEMENT",
            EntityType::Assignment => "ASSIGNMENT",
            EntityType::PostfixExpression => "POSTFIX_EXPRESSION",
            EntityType::PrefixExpression => "PREFIX_EXPRESSION",
            EntityType::ClassInstanceCreation => "CLASS_INSTANCE_CREATION",
            EntityType::MethodInvocation => "METHOD_INVOCATION",
            EntityType::ConstructorInvocation => "CONSTRUCTOR_INVOCATION",
            EntityType::VariableDeclarationStatement => "VARIABLE_DECLARATION_STATEMENT",
            EntityType::TypeDeclarationStatement => "TYPE_DECLARATION_STATEMENT",
            EntityType::ReturnStatement => "RETURN_STATEMENT",
            EntityType::BreakStatement => "BREAK_STATEMENT",
            EntityType::ContinueStatement => "CONTINUE_STATEMENT",
            EntityType::ThrowStatement => "THROW_STATEMENT",
            EntityType::AssertStatement => "ASSERT_STATEMENT",
            EntityType::SwitchCase => "SWITCH_CASE",
        }
    }

    /// `true` for structural types whose children are the nested statements.
    pub const fn is_composite(self) -> bool {
        matches!(
            self,
            EntityType::Method
                | EntityType::Body
                | EntityType::IfStatement
                | EntityType::ThenStatement
                | EntityType::ElseStatement
                | EntityType::ForStatement
                | EntityType::ForeachStatement
                | EntityType::WhileStatement
                | EntityType::DoStatement
                | EntityType::SwitchStatement
                | EntityType::TryStatement
                | EntityType::CatchClauses
                | EntityType::CatchClause
                | EntityType::Finally
                | EntityType::SynchronizedStatement
                | EntityType::LabeledStatement
        )
    }

    pub const fn is_leaf(self) -> bool {
        !self.is_composite()
    }

    /// Leaf types whose value is exactly the source text of their range.
    pub const fn is_verbatim(self) -> bool {
        matches!(
            self,
            EntityType::Assignment
                | EntityType::PrefixExpression
                | EntityType::PostfixExpression
                | EntityType::MethodInvocation
                | EntityType::ClassInstanceCreation
                | EntityType::ConstructorInvocation
                | EntityType::VariableDeclarationStatement
                | EntityType::TypeDeclarationStatement
        )
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A labeled, located fragment of a method body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceCodeEntity {
    value: String,
    #[serde(rename = "type")]
    entity_type: EntityType,
    range: SourceRange,
}

impl SourceCodeEntity {
    pub fn new(value: impl Into<String>, entity_type: EntityType, range: SourceRange) -> Self {
        Self {
            value: value.into(),
            entity_type,
            range,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn source_range(&self) -> SourceRange {
        self.range
    }

    /// First byte of the entity, inclusive.
    pub fn start_position(&self) -> usize {
        self.range.start
    }

    /// Last byte of the entity, inclusive.
    pub fn end_position(&self) -> usize {
        self.range.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_serde_representation() {
        for ty in EntityType::ALL {
            let json = serde_json::to_string(&ty).expect("serialize");
            assert_eq!(json, format!("\"{}\"", ty.name()));
            assert_eq!(ty.to_string(), ty.name());
        }
    }

    #[test]
    fn every_type_is_exactly_one_of_leaf_or_composite() {
        let composites = EntityType::ALL.iter().filter(|ty| ty.is_composite()).count();
        let leaves = EntityType::ALL.iter().filter(|ty| ty.is_leaf()).count();
        assert_eq!(composites, 16);
        assert_eq!(leaves, 14);
        assert!(EntityType::ALL
            .iter()
            .filter(|ty| ty.is_verbatim())
            .all(|ty| ty.is_leaf()));
    }

    #[test]
    fn entity_positions_are_inclusive() {
        let entity = SourceCodeEntity::new("b ++;", EntityType::PostfixExpression, SourceRange::new(4, 8));
        assert_eq!(entity.start_position(), 4);
        assert_eq!(entity.end_position(), 8);
        assert_eq!(entity.value(), "b ++;");
        assert_eq!(entity.entity_type(), EntityType::PostfixExpression);
    }
}
