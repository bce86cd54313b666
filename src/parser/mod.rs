//! Parser for the SQL select queries embedded in configs.
//!
//! Consumes the token stream produced by the lexer and builds an
//! [`InputQuery`]. The parser stops at the first syntax error; config
//! loading rejects the query outright, so there is nothing to recover for.

mod base;
mod expression;
mod select;

pub use base::ParseError;
pub use select::QueryParser;

use crate::ast::InputQuery;
use crate::diag::{Diag, SourceFile, convert_diagnostics_to_reports};
use crate::lexer::Lexer;
use miette::Report;

/// Result of parsing a query with rendered diagnostics.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed query, or `None` if parsing failed.
    pub ast: Option<InputQuery>,
    /// All collected diagnostics rendered as miette reports.
    pub diagnostics: Vec<Report>,
}

/// Parses `source`, rendering any diagnostics against it.
pub fn parse(source: &str) -> ParseResult {
    let (ast, diagnostics) = match parse_with_diagnostics(source) {
        Ok(query) => (Some(query), Vec::new()),
        Err(diags) => (None, diags),
    };

    ParseResult {
        ast,
        diagnostics: convert_diagnostics_to_reports(&diagnostics, &SourceFile::new(source)),
    }
}

/// Parses `source` into a query, returning the first error.
///
/// Blank input yields a query without a statement.
pub fn parse_query(source: &str) -> Result<InputQuery, ParseError> {
    parse_with_diagnostics(source).map_err(|mut diags| Box::new(diags.remove(0)))
}

/// Returns either the query or a non-empty list of diagnostics.
fn parse_with_diagnostics(source: &str) -> Result<InputQuery, Vec<Diag>> {
    let lexed = Lexer::new(source).tokenize();
    if !lexed.diagnostics.is_empty() {
        return Err(lexed.diagnostics);
    }

    let mut parser = QueryParser::new(&lexed.tokens, source);
    match parser.parse_statement() {
        Ok(stm) => {
            tracing::trace!(
                clauses = stm.as_ref().map_or(0, |s| s.select.len()),
                "parsed select query"
            );
            Ok(InputQuery::new(source, stm))
        }
        Err(diag) => Err(vec![*diag]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_success_has_no_diagnostics() {
        let result = parse("SELECT a FROM t");
        assert!(result.ast.is_some());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn lexer_errors_are_all_reported() {
        let result = parse("SELECT # FROM @");
        assert!(result.ast.is_none());
        assert_eq!(result.diagnostics.len(), 2);
    }

    #[test]
    fn parse_error_is_rendered() {
        let result = parse("SELECT a FROM");
        assert!(result.ast.is_none());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].to_string(),
            "expected name, found end of input"
        );
    }

    #[test]
    fn parse_query_returns_first_error() {
        let err = parse_query("SELECT # FROM @").unwrap_err();
        assert_eq!(err.primary_span(), Some(&(7..8)));
    }

    #[test]
    fn source_is_kept() {
        let query = parse_query("SELECT a FROM t").unwrap();
        assert_eq!(query.source(), "SELECT a FROM t");
    }
}
