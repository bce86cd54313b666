//! Expression classification.
//!
//! Every select clause and expression maps to exactly one [`ExprKind`].
//! This module is the only place where node kinds are mapped to labels; the
//! matches are exhaustive so a new AST variant cannot compile until it is
//! classified here.

use crate::ast::{Expression, SelectClause};
use std::fmt;

/// Closed set of structural labels used by the constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Wildcard,
    ColumnReference,
    ComputedVariable,
    ReadVariable,
    RowConstruction,
    TypeCheck,
    Comparison,
    BooleanOp,
    FunctionCall,
    Constant,
    Unclassified,
}

impl ExprKind {
    /// Returns a human-readable name for this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Wildcard => "wildcard",
            Self::ColumnReference => "column reference",
            Self::ComputedVariable => "computed variable",
            Self::ReadVariable => "variable read",
            Self::RowConstruction => "row construction",
            Self::TypeCheck => "type check",
            Self::Comparison => "comparison",
            Self::BooleanOp => "boolean operator",
            Self::FunctionCall => "function call",
            Self::Constant => "constant",
            Self::Unclassified => "unclassified expression",
        }
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies a select clause.
pub fn classify_clause(clause: &SelectClause) -> ExprKind {
    match clause {
        SelectClause::Wildcard(_) => ExprKind::Wildcard,
        SelectClause::ColumnReference(..) => ExprKind::ColumnReference,
        SelectClause::ComputedVariable(_) => ExprKind::ComputedVariable,
    }
}

/// Classifies an expression.
pub fn classify_expression(expr: &Expression) -> ExprKind {
    match expr {
        Expression::ReadVariable(..) => ExprKind::ReadVariable,
        Expression::Within(..) => ExprKind::RowConstruction,
        Expression::IsType(..) => ExprKind::TypeCheck,
        Expression::Comparison(..) => ExprKind::Comparison,
        Expression::Logical(..) | Expression::Not(..) => ExprKind::BooleanOp,
        Expression::FunctionCall(_) => ExprKind::FunctionCall,
        Expression::Constant(..) => ExprKind::Constant,
        Expression::Arithmetic(..) | Expression::Negation(..) | Expression::BuiltinCall(_) => {
            ExprKind::Unclassified
        }
    }
}
