//! SELECT statement parsing.
//!
//! Grammar:
//!
//! ```text
//! statement  := SELECT clauses [FROM table] [WHERE expr]
//!               [GROUP BY expr, ...] [HAVING expr]
//!               [ORDER BY expr [ASC|DESC], ...] [LIMIT n] [OFFSET n] [;]
//! clause     := '*' | expr [[AS] name]
//! table      := name ['.' name]* [[AS] name]
//! ```

use crate::ast::{
    ComputedVariable, Expression, FromClause, OrderByItem, SelectClause, SelectStatement, Span,
    Spanned,
};
use crate::lexer::token::{Token, TokenKind};
use crate::parser::base::{ParseResult, TokenStream};
use smol_str::SmolStr;

/// Recursive-descent parser for a single SELECT statement.
///
/// Expression methods live in [`crate::parser::expression`].
pub struct QueryParser<'a> {
    pub(super) stream: TokenStream<'a>,
    pub(super) source: &'a str,
}

impl<'a> QueryParser<'a> {
    /// Creates a parser over an EOF-terminated token slice.
    pub fn new(tokens: &'a [Token], source: &'a str) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            source,
        }
    }

    /// Parses the whole input. Returns `None` for blank input.
    pub fn parse_statement(&mut self) -> ParseResult<Option<SelectStatement>> {
        if self.stream.check(&TokenKind::Eof) {
            return Ok(None);
        }

        let start = self.stream.expect(TokenKind::Select)?.start;
        let select = self.parse_select_list()?;

        let from = if self.stream.consume(&TokenKind::From) {
            Some(self.parse_from_clause()?)
        } else {
            None
        };

        let where_clause = if self.stream.consume(&TokenKind::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let mut group_by = Vec::new();
        if self.stream.consume(&TokenKind::Group) {
            self.stream.expect(TokenKind::By)?;
            group_by = self.parse_expression_list()?;
        }

        let having = if self.stream.consume(&TokenKind::Having) {
            self.parse_expression()?
        } else {
            Expression::implicit_true(self.stream.previous_span().end)
        };

        let mut order_by = Vec::new();
        if self.stream.consume(&TokenKind::Order) {
            self.stream.expect(TokenKind::By)?;
            order_by = self.parse_order_by_list()?;
        }

        let limit = if self.stream.consume(&TokenKind::Limit) {
            Some(self.parse_count("LIMIT")?)
        } else {
            None
        };

        let offset = if self.stream.consume(&TokenKind::Offset) {
            Some(self.parse_count("OFFSET")?)
        } else {
            None
        };

        let end = self.stream.previous_span().end;
        self.stream.consume(&TokenKind::Semicolon);

        if !self.stream.check(&TokenKind::Eof) {
            return Err(self.stream.error_here_with_code(
                format!(
                    "unexpected trailing tokens after query, found {}",
                    self.stream.current().kind
                ),
                "syntax::trailing_tokens",
            ));
        }

        Ok(Some(SelectStatement {
            select,
            from,
            where_clause,
            group_by,
            having,
            order_by,
            limit,
            offset,
            span: start..end,
        }))
    }

    /// Parses one or more comma-separated select clauses.
    pub(super) fn parse_select_list(&mut self) -> ParseResult<Vec<SelectClause>> {
        let mut clauses = vec![self.parse_select_clause()?];
        while self.stream.consume(&TokenKind::Comma) {
            clauses.push(self.parse_select_clause()?);
        }
        Ok(clauses)
    }

    fn parse_select_clause(&mut self) -> ParseResult<SelectClause> {
        let start = self.stream.current().span.start;

        if self.stream.check(&TokenKind::Star) {
            let span = self.stream.current().span.clone();
            self.stream.advance();
            return Ok(SelectClause::Wildcard(span));
        }

        let expression = self.parse_expression()?;

        let alias = if self.stream.consume(&TokenKind::As) {
            Some(self.parse_name()?)
        } else if self.stream.current().kind.is_name() {
            // Implicit alias: `expr name`
            Some(self.parse_name()?)
        } else {
            None
        };

        let clause = match (alias, expression) {
            (Some(alias), expression) => {
                let span = start..alias.span.end;
                SelectClause::ComputedVariable(ComputedVariable {
                    alias,
                    expression,
                    span,
                })
            }
            (None, Expression::ReadVariable(name, span)) => {
                let end = span.end.max(self.stream.previous_span().end);
                SelectClause::ColumnReference(name, start..end)
            }
            (None, expression) => {
                let span = start..expression.span().end.max(self.stream.previous_span().end);
                let alias = Spanned::new(SmolStr::new(&self.source[span.clone()]), span.clone());
                SelectClause::ComputedVariable(ComputedVariable {
                    alias,
                    expression,
                    span,
                })
            }
        };

        Ok(clause)
    }

    fn parse_from_clause(&mut self) -> ParseResult<FromClause> {
        let start = self.stream.previous_span().start;
        let table = self.parse_qualified_name()?;

        let alias = if self.stream.consume(&TokenKind::As) || self.stream.current().kind.is_name()
        {
            Some(self.parse_name()?)
        } else {
            None
        };

        let end = alias.as_ref().map_or(table.span.end, |a| a.span.end);
        Ok(FromClause {
            table,
            alias,
            span: start..end,
        })
    }

    fn parse_order_by_list(&mut self) -> ParseResult<Vec<OrderByItem>> {
        let mut items = Vec::new();
        loop {
            let expression = self.parse_expression()?;
            let mut span = expression.span();
            let descending = if self.stream.consume(&TokenKind::Desc) {
                span.end = self.stream.previous_span().end;
                true
            } else {
                if self.stream.consume(&TokenKind::Asc) {
                    span.end = self.stream.previous_span().end;
                }
                false
            };
            items.push(OrderByItem {
                expression,
                descending,
                span,
            });
            if !self.stream.consume(&TokenKind::Comma) {
                return Ok(items);
            }
        }
    }

    fn parse_count(&mut self, clause: &str) -> ParseResult<u64> {
        if let TokenKind::Integer(text) = &self.stream.current().kind {
            if let Ok(value) = text.parse::<u64>() {
                self.stream.advance();
                return Ok(value);
            }
        }
        Err(self.stream.error_here_with_code(
            format!("{clause} expects a non-negative integer"),
            "syntax::invalid_count",
        ))
    }

    /// Parses a single (possibly quoted) name.
    pub(super) fn parse_name(&mut self) -> ParseResult<Spanned<SmolStr>> {
        let token = self.stream.current();
        match &token.kind {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => {
                let name = Spanned::new(name.clone(), token.span.clone());
                self.stream.advance();
                Ok(name)
            }
            other => Err(self.stream.error_here_with_code(
                format!("expected name, found {other}"),
                "syntax::expected_name",
            )),
        }
    }

    /// Parses `name ('.' name)*` into one dotted name.
    pub(super) fn parse_qualified_name(&mut self) -> ParseResult<Spanned<SmolStr>> {
        let first = self.parse_name()?;
        let mut text = first.node.to_string();
        let mut span: Span = first.span;
        while self.stream.check(&TokenKind::Dot) {
            self.stream.advance();
            let part = self.parse_name()?;
            text.push('.');
            text.push_str(&part.node);
            span.end = part.span.end;
        }
        Ok(Spanned::new(SmolStr::new(text), span))
    }
}
