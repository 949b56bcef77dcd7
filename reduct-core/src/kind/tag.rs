//! Tags of the built-in expression kinds.

pub const NULL: &str = "Null";
pub const LIST: &str = "List.List";
pub const STRING: &str = "String.String";
pub const SYMBOL: &str = "Symbol";
pub const NUMBER: &str = "Math.Number";
pub const INTERNAL_NUMBER: &str = "Math.InternalNumber";
pub const ADDITION: &str = "Math.Arithmetic.Addition";

pub const COMPARE: &str = "Relation.Compare";
pub const EQUALS: &str = "Relation.Comparison.Equals";
pub const DIFFERENT: &str = "Relation.Comparison.Different";
pub const LESS: &str = "Relation.Comparison.Less";
pub const GREATER: &str = "Relation.Comparison.Greater";

pub const CHILD: &str = "Expression.Child";
pub const CARDINALITY: &str = "Expression.Cardinality";
pub const TAG: &str = "Expression.Tag";
pub const REPLACE_TAG: &str = "Expression.ReplaceTag";
pub const APPEND: &str = "Expression.Append";
pub const PREPEND: &str = "Expression.Prepend";
pub const INSERT: &str = "Expression.Insert";
pub const DELETE: &str = "Expression.Delete";
pub const PROTECT: &str = "Expression.Protect";
pub const GROUP: &str = "Expression.Group";
pub const SERIALIZE: &str = "Expression.Serialize";
pub const DESERIALIZE: &str = "Expression.Deserialize";
pub const CREATE_EXPRESSION: &str = "Expression.CreateExpression";
pub const CREATE_EXPRESSION_TREE: &str = "Expression.CreateExpressionTree";
pub const REDUCE: &str = "Expression.Reduce";
pub const PARENTHESES: &str = "Expression.Parentheses";
pub const LAST_RESULT: &str = "Expression.LastResult";
pub const REFERENCE: &str = "Expression.Reference";

/// The internal holder of a top-level expression. Never registered.
pub const HANDLER: &str = "Expression.Handler";
