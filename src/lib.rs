//! Structural validation of SQL queries embedded in entity configs.
//!
//! Entity configs often carry SQL queries whose *shape* matters before the
//! entity can be built: a training procedure needs a FROM clause, a
//! classifier wants `features` and `label` columns, an import refuses
//! GROUP BY. This crate parses such queries, classifies their select lists
//! and checks them against composable constraints, reporting the first
//! violation with the offending query fragment.
//!
//! # Example
//!
//! ```
//! use sql_config_validator::{Constraint, InputQuery, PlainColumnSelect};
//!
//! let query = InputQuery::from_sql("SELECT a, sum(a, b) AS s FROM t").unwrap();
//! let err = PlainColumnSelect
//!     .check(Some(&query), "trainingData")
//!     .unwrap_err();
//!
//! assert_eq!(err.surface(), Some("sum(a, b) AS s"));
//! assert_eq!(
//!     err.to_string(),
//!     "trainingData only accepts wildcard and column names at sum(a, b) AS s"
//! );
//! ```

pub mod ast;
pub mod classify;
pub mod config;
pub mod constraint;
pub mod diag;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod validator;

// Re-export the query model.
pub use ast::{ConstantValue, Expression, InputQuery, SelectClause, SelectStatement, Span, Spanned};

pub use classify::{ExprKind, classify_clause, classify_expression};
pub use config::{Applicability, EntityConfig, Field, ModelFileUrl, QueryField};
pub use constraint::{
    Constraint, FeaturesLabelSelect, FunctionModelConfig, FunctionModelConsistency,
    MustContainFrom, NoGroupByHaving, PlainColumnSelect, ScoreLabelSelect,
    contains_named_sub_select,
};
pub use diag::{Diag, DiagLabel, LabelRole, SourceFile};
pub use error::ConfigValidationError;
pub use lexer::token::{Token, TokenKind};
pub use lexer::{Lexer, LexerResult, tokenize};
pub use parser::{ParseError, ParseResult, parse, parse_query};
pub use validator::{
    ValidatedConfig, ValidationAttempt, ValidationResult, ValidationState, Validator, chain,
    validate_config, validate_function, validate_query,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_accessible() {
        let query = parse_query("SELECT * FROM t").unwrap();
        assert_eq!(classify_clause(&query.select_clauses()[0]), ExprKind::Wildcard);
        let _span: Span = 0..5;
        let _spanned = Spanned::new("t", 14..15);
    }
}
