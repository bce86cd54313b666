//! Query structure: select lists, FROM, GROUP BY/HAVING and the
//! [`InputQuery`] value stored in configuration fields.

use crate::ast::{Expression, Span, Spanned};
use smol_str::SmolStr;
use std::sync::Arc;

// ============================================================================
// Select clauses
// ============================================================================

/// One entry of a SELECT list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectClause {
    /// `*`
    Wildcard(Span),

    /// A bare column name without an alias.
    ColumnReference(SmolStr, Span),

    /// An aliased computed expression: `expr AS alias`.
    ComputedVariable(ComputedVariable),
}

impl SelectClause {
    /// Returns the span covering the whole clause, alias included.
    pub fn span(&self) -> Span {
        match self {
            SelectClause::Wildcard(span) => span.clone(),
            SelectClause::ColumnReference(_, span) => span.clone(),
            SelectClause::ComputedVariable(var) => var.span.clone(),
        }
    }

    /// Returns the alias when this clause is a computed variable.
    pub fn alias(&self) -> Option<&str> {
        match self {
            SelectClause::ComputedVariable(var) => Some(var.alias.node.as_str()),
            SelectClause::Wildcard(_) | SelectClause::ColumnReference(..) => None,
        }
    }
}

/// A computed select entry.
///
/// Unaliased non-column expressions get their own surface text as alias.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedVariable {
    pub alias: Spanned<SmolStr>,
    pub expression: Expression,
    pub span: Span,
}

// ============================================================================
// Statement
// ============================================================================

/// FROM clause naming a single table.
#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub table: Spanned<SmolStr>,
    pub alias: Option<Spanned<SmolStr>>,
    pub span: Span,
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub expression: Expression,
    pub descending: bool,
    pub span: Span,
}

/// A parsed SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub select: Vec<SelectClause>,
    pub from: Option<FromClause>,
    pub where_clause: Option<Expression>,
    pub group_by: Vec<Expression>,
    /// Constant `TRUE` when the query has no HAVING clause.
    pub having: Expression,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub span: Span,
}

// ============================================================================
// InputQuery
// ============================================================================

/// A query as held by a configuration field.
///
/// The statement is `None` when the configured text was empty. The original
/// source is kept so that every node span can be turned back into its
/// surface text.
#[derive(Debug, Clone, PartialEq)]
pub struct InputQuery {
    source: Arc<str>,
    stm: Option<SelectStatement>,
}

impl InputQuery {
    /// Creates a query from its source text and parsed statement.
    pub fn new(source: impl Into<Arc<str>>, stm: Option<SelectStatement>) -> Self {
        Self {
            source: source.into(),
            stm,
        }
    }

    /// A query with no statement.
    pub fn empty() -> Self {
        Self::new("", None)
    }

    /// Parses `source` into a query.
    pub fn from_sql(source: &str) -> Result<Self, crate::parser::ParseError> {
        crate::parser::parse_query(source)
    }

    /// Returns the original query text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the parsed statement, if any.
    pub fn statement(&self) -> Option<&SelectStatement> {
        self.stm.as_ref()
    }

    /// Returns the source text covered by `span`, or `""` if out of range.
    pub fn surface(&self, span: &Span) -> &str {
        self.source.get(span.clone()).unwrap_or("")
    }

    /// Select clauses in declaration order; empty without a statement.
    pub fn select_clauses(&self) -> &[SelectClause] {
        self.stm
            .as_ref()
            .map(|stm| stm.select.as_slice())
            .unwrap_or_default()
    }

    /// The FROM clause, if present.
    pub fn from_clause(&self) -> Option<&FromClause> {
        self.stm.as_ref().and_then(|stm| stm.from.as_ref())
    }

    /// Surface text of the FROM clause, if present.
    pub fn from_surface(&self) -> Option<&str> {
        self.from_clause().map(|from| self.surface(&from.span))
    }

    /// GROUP BY expressions in declaration order.
    pub fn group_by(&self) -> &[Expression] {
        self.stm
            .as_ref()
            .map(|stm| stm.group_by.as_slice())
            .unwrap_or_default()
    }

    /// The HAVING expression; `None` only without a statement.
    pub fn having(&self) -> Option<&Expression> {
        self.stm.as_ref().map(|stm| &stm.having)
    }
}

impl Default for InputQuery {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Literal;

    fn statement(select: Vec<SelectClause>) -> SelectStatement {
        SelectStatement {
            select,
            from: Some(FromClause {
                table: Spanned::new("t".into(), 14..15),
                alias: None,
                span: 9..15,
            }),
            where_clause: None,
            group_by: Vec::new(),
            having: Expression::implicit_true(15),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            span: 0..15,
        }
    }

    #[test]
    fn empty_query_navigation() {
        let query = InputQuery::empty();
        assert!(query.statement().is_none());
        assert!(query.select_clauses().is_empty());
        assert!(query.group_by().is_empty());
        assert!(query.from_clause().is_none());
        assert!(query.having().is_none());
    }

    #[test]
    fn surface_slices_source() {
        let stm = statement(vec![SelectClause::Wildcard(7..8)]);
        let query = InputQuery::new("SELECT * FROM t", Some(stm));
        assert_eq!(query.surface(&(7..8)), "*");
        assert_eq!(query.from_surface(), Some("FROM t"));
        assert_eq!(query.surface(&(40..50)), "");
    }

    #[test]
    fn alias_only_for_computed_variables() {
        let computed = SelectClause::ComputedVariable(ComputedVariable {
            alias: Spanned::new("x".into(), 5..6),
            expression: Expression::Constant(Literal::Integer("1".into()), 0..1),
            span: 0..6,
        });
        assert_eq!(computed.alias(), Some("x"));
        assert_eq!(SelectClause::Wildcard(0..1).alias(), None);
        assert_eq!(SelectClause::ColumnReference("x".into(), 0..1).alias(), None);
    }
}
