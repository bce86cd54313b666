//! AST foundation types and node structures.

mod expression;
mod query;
mod span;

// Re-export span types
pub use span::{Span, Spanned, cover};

pub use expression::{
    ArithmeticOperator, BuiltinCall, ComparisonOperator, ConstantValue, Expression, FunctionCall,
    Literal, LogicalOperator, TypeTest,
};
pub use query::{
    ComputedVariable, FromClause, InputQuery, OrderByItem, SelectClause, SelectStatement,
};
