//! Expression AST nodes for SQL select queries.
//!
//! The expression set is closed: every form the parser can produce has a
//! variant here, and the classifier in [`crate::classify`] matches over all
//! of them.

use crate::ast::{SelectClause, Span};
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// Expression - Top-level expression type
// ============================================================================

/// Represents any scalar or row expression in a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Variable (column) read, e.g. `x` or `a.b`.
    ReadVariable(SmolStr, Span),

    /// Row construction from a list of select clauses: `{a, b AS c}`.
    Within(Vec<SelectClause>, Span),

    /// Type test: `expr IS [NOT] NULL|TRUE|FALSE|STRING|...`.
    IsType(Box<Expression>, TypeTest, bool, Span),

    /// Comparison: `lhs = rhs`, `lhs < rhs`, ...
    Comparison(ComparisonOperator, Box<Expression>, Box<Expression>, Span),

    /// Binary boolean operator: `AND`, `OR`.
    Logical(LogicalOperator, Box<Expression>, Box<Expression>, Span),

    /// Boolean negation: `NOT expr`.
    Not(Box<Expression>, Span),

    /// User function application with result extraction: `f({x})[y]`.
    FunctionCall(FunctionCall),

    /// Literal constant.
    Constant(Literal, Span),

    /// Arithmetic: `lhs + rhs`, `lhs * rhs`, ...
    Arithmetic(ArithmeticOperator, Box<Expression>, Box<Expression>, Span),

    /// Unary minus on a non-literal operand.
    Negation(Box<Expression>, Span),

    /// Builtin function call: `sum(a, b)`, `lower(x)`.
    BuiltinCall(BuiltinCall),
}

impl Expression {
    /// Returns the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expression::ReadVariable(_, span) => span.clone(),
            Expression::Within(_, span) => span.clone(),
            Expression::IsType(_, _, _, span) => span.clone(),
            Expression::Comparison(_, _, _, span) => span.clone(),
            Expression::Logical(_, _, _, span) => span.clone(),
            Expression::Not(_, span) => span.clone(),
            Expression::FunctionCall(call) => call.span.clone(),
            Expression::Constant(_, span) => span.clone(),
            Expression::Arithmetic(_, _, _, span) => span.clone(),
            Expression::Negation(_, span) => span.clone(),
            Expression::BuiltinCall(call) => call.span.clone(),
        }
    }

    /// Returns true if this expression always evaluates to `TRUE`.
    ///
    /// An omitted HAVING clause is represented by the literal `TRUE` with an
    /// empty span.
    pub fn is_constant_true(&self) -> bool {
        self.constant_value() == Some(ConstantValue::Boolean(true))
    }

    /// Evaluates a column-free expression.
    ///
    /// Literals, `NOT`, `AND`/`OR`, comparisons and `IS` tests are folded
    /// with SQL's three-valued logic. Returns `None` as soon as a column is
    /// read, a function is called or arithmetic is involved.
    pub fn constant_value(&self) -> Option<ConstantValue> {
        match self {
            Expression::Constant(literal, _) => ConstantValue::from_literal(literal),
            Expression::Not(operand, _) => match operand.constant_value()?.truth()? {
                Some(value) => Some(ConstantValue::Boolean(!value)),
                None => Some(ConstantValue::Null),
            },
            Expression::Logical(op, lhs, rhs, _) => {
                let lhs = lhs.constant_value()?.truth()?;
                let rhs = rhs.constant_value()?.truth()?;
                let result = match op {
                    LogicalOperator::And => match (lhs, rhs) {
                        (Some(false), _) | (_, Some(false)) => Some(false),
                        (Some(true), Some(true)) => Some(true),
                        _ => None,
                    },
                    LogicalOperator::Or => match (lhs, rhs) {
                        (Some(true), _) | (_, Some(true)) => Some(true),
                        (Some(false), Some(false)) => Some(false),
                        _ => None,
                    },
                };
                Some(result.map_or(ConstantValue::Null, ConstantValue::Boolean))
            }
            Expression::Comparison(op, lhs, rhs, _) => {
                ConstantValue::compare(*op, &lhs.constant_value()?, &rhs.constant_value()?)
            }
            Expression::IsType(operand, test, negated, _) => {
                let value = operand.constant_value()?;
                let matches = match test {
                    TypeTest::Null => value == ConstantValue::Null,
                    TypeTest::True => value == ConstantValue::Boolean(true),
                    TypeTest::False => value == ConstantValue::Boolean(false),
                    TypeTest::String => matches!(value, ConstantValue::String(_)),
                    TypeTest::Number => {
                        matches!(value, ConstantValue::Integer(_) | ConstantValue::Float(_))
                    }
                    TypeTest::Integer => matches!(value, ConstantValue::Integer(_)),
                    TypeTest::Timestamp => false,
                };
                Some(ConstantValue::Boolean(matches != *negated))
            }
            Expression::ReadVariable(..)
            | Expression::Within(..)
            | Expression::FunctionCall(_)
            | Expression::Arithmetic(..)
            | Expression::Negation(..)
            | Expression::BuiltinCall(_) => None,
        }
    }

    /// The implicit `TRUE` used where a clause is omitted.
    pub fn implicit_true(at: usize) -> Self {
        Expression::Constant(Literal::Boolean(true), at..at)
    }
}

// ============================================================================
// Literals
// ============================================================================

/// Literal values. Numeric literals keep their original text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Boolean(bool),
    Null,
    Integer(SmolStr),
    Float(SmolStr),
    String(SmolStr),
}

/// Result of folding a constant expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(SmolStr),
}

impl ConstantValue {
    fn from_literal(literal: &Literal) -> Option<Self> {
        match literal {
            Literal::Null => Some(ConstantValue::Null),
            Literal::Boolean(value) => Some(ConstantValue::Boolean(*value)),
            Literal::Integer(text) => match text.parse::<i64>() {
                Ok(value) => Some(ConstantValue::Integer(value)),
                Err(_) => text.parse::<f64>().ok().map(ConstantValue::Float),
            },
            Literal::Float(text) => text.parse::<f64>().ok().map(ConstantValue::Float),
            Literal::String(text) => Some(ConstantValue::String(text.clone())),
        }
    }

    /// Boolean truth, with `Some(None)` for NULL.
    fn truth(&self) -> Option<Option<bool>> {
        match self {
            ConstantValue::Boolean(value) => Some(Some(*value)),
            ConstantValue::Null => Some(None),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            ConstantValue::Integer(value) => Some(*value as f64),
            ConstantValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    fn compare(op: ComparisonOperator, lhs: &Self, rhs: &Self) -> Option<Self> {
        let ordering = match (lhs, rhs) {
            (ConstantValue::Null, _) | (_, ConstantValue::Null) => {
                return Some(ConstantValue::Null);
            }
            (ConstantValue::Boolean(a), ConstantValue::Boolean(b)) => a.cmp(b),
            (ConstantValue::Integer(a), ConstantValue::Integer(b)) => a.cmp(b),
            (ConstantValue::String(a), ConstantValue::String(b)) => a.cmp(b),
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?)?,
        };
        let result = match op {
            ComparisonOperator::Eq => ordering == Ordering::Equal,
            ComparisonOperator::NotEq => ordering != Ordering::Equal,
            ComparisonOperator::Lt => ordering == Ordering::Less,
            ComparisonOperator::LtEq => ordering != Ordering::Greater,
            ComparisonOperator::Gt => ordering == Ordering::Greater,
            ComparisonOperator::GtEq => ordering != Ordering::Less,
        };
        Some(ConstantValue::Boolean(result))
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::NotEq => "!=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::LtEq => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::GtEq => ">=",
        };
        f.write_str(op)
    }
}

/// Binary boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

/// Target of an `IS [NOT] ...` test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTest {
    Null,
    True,
    False,
    String,
    Number,
    Integer,
    Timestamp,
}

// ============================================================================
// Calls
// ============================================================================

/// Application of a user-defined function, e.g. `classify({x, y})[score]`.
///
/// The extract part is what distinguishes it from a [`BuiltinCall`].
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: SmolStr,
    pub arguments: Vec<Expression>,
    pub extract: Box<Expression>,
    pub span: Span,
}

/// Call to a builtin function, e.g. `sum(a, b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinCall {
    pub name: SmolStr,
    pub arguments: Vec<Expression>,
    pub span: Span,
}
