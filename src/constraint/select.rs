//! Constraints on the select list.

use crate::ast::{InputQuery, SelectClause};
use crate::classify::{ExprKind, classify_clause, classify_expression};
use crate::constraint::Constraint;
use crate::error::ConfigValidationError;

/// Inner expression kinds a computed variable may have and still count as a
/// plain column selection.
///
/// Adding an expression kind to the query language means deciding here
/// whether it is plain; otherwise configs using it are rejected.
pub const COMPUTED_INNER_ALLOW_LIST: &[ExprKind] = &[
    ExprKind::ReadVariable,    // x AS y
    ExprKind::RowConstruction, // {x, y}
    ExprKind::TypeCheck,       // x IS NOT NULL
    ExprKind::Comparison,      // x = 'true'
    ExprKind::BooleanOp,       // NOT x
    ExprKind::FunctionCall,    // function(args)[extract]
    ExprKind::Constant,        // 1.0
];

fn is_plain_column(clause: &SelectClause) -> bool {
    match (classify_clause(clause), clause) {
        (ExprKind::Wildcard | ExprKind::ColumnReference, _) => true,
        (ExprKind::ComputedVariable, SelectClause::ComputedVariable(var)) => {
            COMPUTED_INNER_ALLOW_LIST.contains(&classify_expression(&var.expression))
        }
        _ => false,
    }
}

/// Accepts wildcards, column names and simple computed forms, but rejects
/// operations on columns such as `sum(a, b)`.
///
/// Clauses are checked in order and only the first offender is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainColumnSelect;

impl Constraint for PlainColumnSelect {
    fn name(&self) -> &'static str {
        "plain_column_select"
    }

    fn check_query(&self, query: &InputQuery, field: &str) -> Result<(), ConfigValidationError> {
        match query
            .select_clauses()
            .iter()
            .find(|clause| !is_plain_column(clause))
        {
            Some(clause) => {
                let span = clause.span();
                let surface = query.surface(&span);
                Err(ConfigValidationError::new(
                    field,
                    self.name(),
                    format!("{field} only accepts wildcard and column names at {surface}"),
                )
                .at(surface, span))
            }
            None => Ok(()),
        }
    }
}

/// Returns true if some select clause is a computed variable aliased
/// exactly `name` (case-sensitive).
pub fn contains_named_sub_select(query: &InputQuery, name: &str) -> bool {
    query
        .select_clauses()
        .iter()
        .any(|clause| clause.alias() == Some(name))
}

/// Requires a row named `features` and a scalar named `label`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeaturesLabelSelect;

impl Constraint for FeaturesLabelSelect {
    fn name(&self) -> &'static str {
        "features_label_select"
    }

    fn check_query(&self, query: &InputQuery, field: &str) -> Result<(), ConfigValidationError> {
        if contains_named_sub_select(query, "features") && contains_named_sub_select(query, "label")
        {
            return Ok(());
        }
        Err(ConfigValidationError::new(
            field,
            self.name(),
            format!("{field} expects a row named 'features' and a scalar named 'label'"),
        ))
    }
}

/// Requires a scalar named `score` and a scalar named `label`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreLabelSelect;

impl Constraint for ScoreLabelSelect {
    fn name(&self) -> &'static str {
        "score_label_select"
    }

    fn check_query(&self, query: &InputQuery, field: &str) -> Result<(), ConfigValidationError> {
        if contains_named_sub_select(query, "score") && contains_named_sub_select(query, "label") {
            return Ok(());
        }
        Err(ConfigValidationError::new(
            field,
            self.name(),
            format!("{field} expects a scalar named 'score' and a scalar named 'label'"),
        ))
    }
}
